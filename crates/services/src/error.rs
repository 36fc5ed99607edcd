//! Shared error types for the services crate.

use thiserror::Error;

use drill_core::model::{CompletionValidationError, ProblemError, SettingsError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProblemGenerator`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GeneratorError {
    #[error("no acceptable problem after {attempts} attempts")]
    Exhausted { attempts: usize },
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Problem(#[from] ProblemError),
}

/// Errors emitted while starting or restarting a quiz session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

/// Errors emitted while forwarding a completion record.
///
/// None of these affect the session; callers surface them as warnings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmissionError {
    #[error("the round is not finished yet")]
    NotComplete,
    #[error(transparent)]
    Invalid(#[from] CompletionValidationError),
    #[error("could not save the score: {0}")]
    Sink(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
