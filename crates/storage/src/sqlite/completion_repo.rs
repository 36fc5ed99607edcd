use drill_core::model::CompletionRecord;

use super::SqliteRepository;
use super::mapping::map_completion_row;
use crate::repository::{CompletionRepository, CompletionRow, StorageError};

#[async_trait::async_trait]
impl CompletionRepository for SqliteRepository {
    async fn append_completion(&self, record: &CompletionRecord) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO completions (participant, team, score, total, completed_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(record.participant())
        .bind(record.team())
        .bind(i64::from(record.score()))
        .bind(i64::from(record.total()))
        .bind(record.completed_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn get_completion(&self, id: i64) -> Result<CompletionRecord, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, participant, team, score, total, completed_at
                FROM completions
                WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        map_completion_row(&row).map(|row| row.record)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<CompletionRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, participant, team, score, total, completed_at
                FROM completions
                ORDER BY completed_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_completion_row(&row)?);
        }
        Ok(out)
    }
}
