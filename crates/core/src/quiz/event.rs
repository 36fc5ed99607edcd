use thiserror::Error;

use crate::model::{ProblemBatch, StepGuess, StepRecord};
use crate::quiz::QuizPhase;

/// User input consumed by the state machine.
///
/// Step-scoped events carry the step index (and `SubmitGcd` the problem
/// index) the form was rendered for, so a repeated submission cannot be
/// applied to a later state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    ConfirmNumbers {
        step: usize,
        dividend: u32,
        divisor: u32,
    },
    SubmitStep {
        step: usize,
        guess: StepGuess,
    },
    SubmitGcd {
        problem: usize,
        answer: String,
    },
    NextProblem,
    Restart(ProblemBatch),
}

/// Accepted transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizFeedback {
    NumbersConfirmed { dividend: u32, divisor: u32 },
    StepAccepted { record: StepRecord, terminal: bool },
    GcdAccepted { gcd: u32, score: u32 },
    Advanced { problem: usize },
    Completed { score: u32, total: u32 },
    Restarted,
}

/// Rejected transitions. All of them are recoverable; the session is left
/// exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("incorrect quotient or remainder")]
    InvalidStepGuess,

    #[error("that is not the GCD")]
    InvalidGcdGuess,

    #[error("not a valid integer: {raw:?}")]
    InvalidInput { raw: String },

    #[error("use the current numbers: {dividend} and {divisor}")]
    NumbersMismatch { dividend: u32, divisor: u32 },

    #[error("submission was for {got}, current is {expected}")]
    StaleSubmission { expected: usize, got: usize },

    #[error("event not accepted while {phase:?}")]
    UnexpectedEvent { phase: QuizPhase },
}
