use crate::model::{Problem, StepRecord};
use crate::quiz::QuizPhase;

/// Read-only view of a `QuizSession` for the render surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSnapshot {
    /// One-based, capped at `batch_size`.
    pub problem_number: usize,
    pub batch_size: usize,
    /// `None` once the batch is complete.
    pub problem: Option<Problem>,
    pub current_pair: Option<(u32, u32)>,
    /// One-based number of the step being entered.
    pub step_number: usize,
    pub steps: Vec<StepRecord>,
    pub phase: QuizPhase,
    pub score: u32,
}

impl QuizSnapshot {
    /// Zero-based step index expected by step-scoped events.
    #[must_use]
    pub fn step_index(&self) -> usize {
        self.step_number - 1
    }

    /// Zero-based problem index expected by `QuizEvent::SubmitGcd`.
    #[must_use]
    pub fn problem_index(&self) -> usize {
        self.problem_number.saturating_sub(1)
    }

    #[must_use]
    pub fn is_last_problem(&self) -> bool {
        self.problem_number == self.batch_size
    }
}
