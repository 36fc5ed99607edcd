mod turn;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{SessionError, SubmissionError};
pub use turn::QuizTurn;
pub use view::{CompletionListItem, CompletionReceipt};
pub use workflow::QuizLoopService;
