use async_trait::async_trait;
use drill_core::model::CompletionRecord;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A persisted completion together with its storage id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRow {
    pub id: i64,
    pub record: CompletionRecord,
}

impl CompletionRow {
    #[must_use]
    pub fn new(id: i64, record: CompletionRecord) -> Self {
        Self { id, record }
    }
}

/// Sink for finished rounds.
#[async_trait]
pub trait CompletionRepository: Send + Sync {
    /// Append one completion and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn append_completion(&self, record: &CompletionRecord) -> Result<i64, StorageError>;

    /// Fetch a completion by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_completion(&self, id: i64) -> Result<CompletionRecord, StorageError>;

    /// Most recent completions first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn list_recent(&self, limit: u32) -> Result<Vec<CompletionRow>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    completions: Arc<Mutex<Vec<CompletionRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn id_for_index(index: usize) -> Result<i64, StorageError> {
    i64::try_from(index + 1).map_err(|_| StorageError::Serialization("id overflow".into()))
}

#[async_trait]
impl CompletionRepository for InMemoryRepository {
    async fn append_completion(&self, record: &CompletionRecord) -> Result<i64, StorageError> {
        let mut guard = self
            .completions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(record.clone());
        id_for_index(guard.len() - 1)
    }

    async fn get_completion(&self, id: i64) -> Result<CompletionRecord, StorageError> {
        let guard = self
            .completions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        usize::try_from(id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|index| guard.get(index))
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<CompletionRow>, StorageError> {
        let guard = self
            .completions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows = Vec::with_capacity(guard.len());
        for (index, record) in guard.iter().enumerate() {
            rows.push(CompletionRow::new(id_for_index(index)?, record.clone()));
        }
        rows.sort_by(|a, b| {
            b.record
                .completed_at()
                .cmp(&a.record.completed_at())
                .then(b.id.cmp(&a.id))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub completions: Arc<dyn CompletionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let completions: Arc<dyn CompletionRepository> = Arc::new(InMemoryRepository::new());
        Self { completions }
    }
}
