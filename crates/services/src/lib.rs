#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod generator;
pub mod sessions;

pub use drill_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, GeneratorError, SessionError, SubmissionError};
pub use generator::{MAX_ATTEMPTS_PER_PROBLEM, ProblemGenerator};
pub use sessions::{CompletionListItem, CompletionReceipt, QuizLoopService, QuizTurn};
