use chrono::{DateTime, Utc};

use drill_core::model::CompletionRecord;
use storage::repository::CompletionRow;

/// Presentation-agnostic list item for a stored completion.
///
/// Timestamps are left unformatted; the UI decides how to show them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionListItem {
    pub id: i64,
    pub participant: String,
    pub team: String,
    pub score: u32,
    pub total: u32,
    pub completed_at: DateTime<Utc>,
}

impl CompletionListItem {
    #[must_use]
    pub fn from_row(row: &CompletionRow) -> Self {
        let record = &row.record;
        Self {
            id: row.id,
            participant: record.participant().to_string(),
            team: record.team().to_string(),
            score: record.score(),
            total: record.total(),
            completed_at: record.completed_at(),
        }
    }
}

/// Confirmation that the completion sink accepted a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReceipt {
    pub id: i64,
    pub record: CompletionRecord,
}
