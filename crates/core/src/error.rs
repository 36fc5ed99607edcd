use thiserror::Error;

use crate::model::{CompletionValidationError, ProblemError, SettingsError};
use crate::quiz::QuizError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Problem(#[from] ProblemError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Completion(#[from] CompletionValidationError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
