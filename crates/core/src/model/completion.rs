use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::time::format_timestamp;

/// Longest participant or team name accepted for a completion record.
pub const MAX_NAME_LEN: usize = 80;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompletionValidationError {
    #[error("participant name cannot be empty")]
    EmptyParticipant,

    #[error("team name cannot be empty")]
    EmptyTeam,

    #[error("{field} is longer than {MAX_NAME_LEN} characters")]
    NameTooLong { field: &'static str },

    #[error("score {score} exceeds total {total}")]
    ScoreOutOfRange { score: u32, total: u32 },
}

/// Unvalidated input for a completion record, as typed by the participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionDraft {
    pub participant: String,
    pub team: String,
    pub score: u32,
    pub total: u32,
}

impl CompletionDraft {
    /// Trim and check names, then stamp the record with `now`.
    ///
    /// # Errors
    ///
    /// Returns `CompletionValidationError` for blank or overlong names, or a
    /// score larger than the total.
    pub fn validate(self, now: DateTime<Utc>) -> Result<CompletionRecord, CompletionValidationError> {
        let participant = normalize_name(
            &self.participant,
            "participant",
            CompletionValidationError::EmptyParticipant,
        )?;
        let team = normalize_name(&self.team, "team", CompletionValidationError::EmptyTeam)?;

        CompletionRecord::from_persisted(participant, team, self.score, self.total, now)
    }
}

fn normalize_name(
    raw: &str,
    field: &'static str,
    empty: CompletionValidationError,
) -> Result<String, CompletionValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CompletionValidationError::NameTooLong { field });
    }
    Ok(trimmed.to_string())
}

/// A finished round, ready to be forwarded to the completion sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRecord {
    participant: String,
    team: String,
    score: u32,
    total: u32,
    completed_at: DateTime<Utc>,
}

impl CompletionRecord {
    /// Rehydrate a record from storage.
    ///
    /// # Errors
    ///
    /// Returns `CompletionValidationError::ScoreOutOfRange` if `score > total`.
    pub fn from_persisted(
        participant: String,
        team: String,
        score: u32,
        total: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, CompletionValidationError> {
        if score > total {
            return Err(CompletionValidationError::ScoreOutOfRange { score, total });
        }
        Ok(Self {
            participant,
            team,
            score,
            total,
            completed_at,
        })
    }

    #[must_use]
    pub fn participant(&self) -> &str {
        &self.participant
    }

    #[must_use]
    pub fn team(&self) -> &str {
        &self.team
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn timestamp_label(&self) -> String {
        format_timestamp(self.completed_at)
    }
}
