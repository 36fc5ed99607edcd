use drill_core::quiz::{QuizError, QuizFeedback, QuizSnapshot};

/// Outcome of one user action together with the state to render afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizTurn {
    pub feedback: Result<QuizFeedback, QuizError>,
    pub snapshot: QuizSnapshot,
}

impl QuizTurn {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.feedback.is_ok()
    }
}
