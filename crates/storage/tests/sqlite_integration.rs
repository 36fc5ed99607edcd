use chrono::Duration;
use drill_core::model::{CompletionDraft, CompletionRecord};
use drill_core::time::fixed_now;
use storage::repository::{CompletionRepository, StorageError};
use storage::sqlite::SqliteRepository;

fn record(participant: &str, score: u32, minutes: i64) -> CompletionRecord {
    CompletionDraft {
        participant: participant.to_string(),
        team: "Blue".to_string(),
        score,
        total: 5,
    }
    .validate(fixed_now() + Duration::minutes(minutes))
    .unwrap()
}

#[tokio::test]
async fn sqlite_roundtrips_completion() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_completion?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let original = record("Ada", 4, 0);
    let id = repo.append_completion(&original).await.expect("append");
    let fetched = repo.get_completion(id).await.expect("fetch");

    assert_eq!(fetched, original);
    assert_eq!(fetched.timestamp_label(), "2023-11-14 22:13:20");
}

#[tokio::test]
async fn sqlite_lists_recent_first() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_recent?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.append_completion(&record("Ada", 5, 0)).await.unwrap();
    repo.append_completion(&record("Grace", 3, 10)).await.unwrap();
    repo.append_completion(&record("Alan", 2, 5)).await.unwrap();

    let rows = repo.list_recent(2).await.expect("list");
    let names: Vec<_> = rows.iter().map(|r| r.record.participant()).collect();
    assert_eq!(names, vec!["Grace", "Alan"]);
}

#[tokio::test]
async fn sqlite_missing_completion_is_not_found() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_missing?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    // Migrations are idempotent.
    repo.migrate().await.expect("migrate twice");

    let err = repo.get_completion(99).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}
