//! Per-problem state machine driving a round of Euclidean division practice.
//!
//! A `QuizSession` is owned by exactly one participant. Every user action is
//! expressed as a `QuizEvent` and applied through `QuizSession::handle_event`;
//! the render layer only ever reads a `QuizSnapshot`.

mod event;
mod session;
mod snapshot;

pub use event::{QuizError, QuizEvent, QuizFeedback};
pub use session::{QuizPhase, QuizSession};
pub use snapshot::QuizSnapshot;
