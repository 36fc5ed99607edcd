use chrono::{DateTime, Utc};
use drill_core::model::CompletionRecord;
use sqlx::Row;

use crate::repository::{CompletionRow, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn map_completion_row(row: &sqlx::sqlite::SqliteRow) -> Result<CompletionRow, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    let participant: String = row.try_get("participant").map_err(ser)?;
    let team: String = row.try_get("team").map_err(ser)?;
    let score = u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?;
    let total = u32_from_i64("total", row.try_get::<i64, _>("total").map_err(ser)?)?;
    let completed_at: DateTime<Utc> = row.try_get("completed_at").map_err(ser)?;

    let record = CompletionRecord::from_persisted(participant, team, score, total, completed_at)
        .map_err(ser)?;
    Ok(CompletionRow::new(id, record))
}
