use std::fmt;

use crate::euclid;
use crate::model::{PairMatch, Problem, ProblemBatch, StepGuess, StepInputMode, StepRecord};
use crate::quiz::{QuizError, QuizEvent, QuizFeedback, QuizSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// The current pair must be re-entered before dividing.
    AwaitingNumberConfirmation,
    AwaitingStepInput,
    /// The zero remainder was reached; the GCD must be stated.
    AwaitingFinalAnswer,
    /// The GCD was confirmed; waiting for the user to move on.
    Solved,
    AllComplete,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Progress of one participant through a batch of problems.
#[derive(Clone, PartialEq, Eq)]
pub struct QuizSession {
    batch: ProblemBatch,
    mode: StepInputMode,
    index: usize,
    score: u32,
    dividend: u32,
    divisor: u32,
    steps: Vec<StepRecord>,
    phase: QuizPhase,
}

impl QuizSession {
    #[must_use]
    pub fn new(batch: ProblemBatch, mode: StepInputMode) -> Self {
        let mut session = Self {
            batch,
            mode,
            index: 0,
            score: 0,
            dividend: 0,
            divisor: 0,
            steps: Vec::new(),
            phase: QuizPhase::AwaitingStepInput,
        };
        session.load_problem(0);
        session
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn mode(&self) -> StepInputMode {
        self.mode
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of problems in the batch.
    #[must_use]
    pub fn total(&self) -> u32 {
        u32::try_from(self.batch.len()).unwrap_or(u32::MAX)
    }

    /// Zero-based index of the active problem (equal to the batch size once complete).
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn current_problem(&self) -> Option<&Problem> {
        self.batch.get(self.index)
    }

    #[must_use]
    pub fn batch(&self) -> &ProblemBatch {
        &self.batch
    }

    /// Validated steps for the active problem, oldest first.
    #[must_use]
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// The pair to divide next, larger value first.
    #[must_use]
    pub fn current_pair(&self) -> (u32, u32) {
        euclid::normalize(self.dividend, self.divisor)
    }

    /// The last non-zero divisor, once the terminal step has been accepted.
    #[must_use]
    pub fn terminal_gcd(&self) -> Option<u32> {
        match self.phase {
            QuizPhase::AwaitingFinalAnswer | QuizPhase::Solved => {
                self.steps.last().map(|step| step.divisor)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::AllComplete
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            problem_number: (self.index + 1).min(self.batch.len()),
            batch_size: self.batch.len(),
            problem: self.current_problem().copied(),
            current_pair: (!self.is_complete()).then(|| self.current_pair()),
            step_number: self.steps.len() + 1,
            steps: self.steps.clone(),
            phase: self.phase,
            score: self.score,
        }
    }

    /// Apply one user event.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` when the event is rejected; the session is not
    /// modified in that case.
    pub fn handle_event(&mut self, event: QuizEvent) -> Result<QuizFeedback, QuizError> {
        match event {
            QuizEvent::ConfirmNumbers {
                step,
                dividend,
                divisor,
            } => self.confirm_numbers(step, dividend, divisor),
            QuizEvent::SubmitStep { step, guess } => self.submit_step(step, guess),
            QuizEvent::SubmitGcd { problem, answer } => self.submit_gcd(problem, &answer),
            QuizEvent::NextProblem => self.next_problem(),
            QuizEvent::Restart(batch) => {
                *self = Self::new(batch, self.mode);
                Ok(QuizFeedback::Restarted)
            }
        }
    }

    fn confirm_numbers(
        &mut self,
        step: usize,
        dividend: u32,
        divisor: u32,
    ) -> Result<QuizFeedback, QuizError> {
        self.expect_phase(QuizPhase::AwaitingNumberConfirmation)?;
        self.expect_step(step)?;

        let (a, b) = self.current_pair();
        let matches = match self.mode {
            StepInputMode::ConfirmPair(PairMatch::Unordered) => {
                euclid::normalize(dividend, divisor) == (a, b)
            }
            _ => (dividend, divisor) == (a, b),
        };
        if !matches {
            return Err(QuizError::NumbersMismatch {
                dividend: a,
                divisor: b,
            });
        }

        self.phase = QuizPhase::AwaitingStepInput;
        Ok(QuizFeedback::NumbersConfirmed {
            dividend: a,
            divisor: b,
        })
    }

    fn submit_step(&mut self, step: usize, guess: StepGuess) -> Result<QuizFeedback, QuizError> {
        self.expect_phase(QuizPhase::AwaitingStepInput)?;
        self.expect_step(step)?;

        let (dividend, divisor) = self.current_pair();
        let expected = euclid::divide(dividend, divisor);
        if guess.quotient != expected.quotient || guess.remainder != expected.remainder {
            return Err(QuizError::InvalidStepGuess);
        }

        let record = StepRecord {
            dividend,
            divisor,
            quotient: expected.quotient,
            remainder: expected.remainder,
        };
        self.steps.push(record);

        let terminal = record.is_terminal();
        if terminal {
            self.dividend = dividend;
            self.divisor = divisor;
            self.phase = QuizPhase::AwaitingFinalAnswer;
        } else {
            self.dividend = divisor;
            self.divisor = expected.remainder;
            self.phase = self.step_entry_phase();
        }
        debug_assert!(self.pair_keeps_gcd());

        Ok(QuizFeedback::StepAccepted { record, terminal })
    }

    fn submit_gcd(&mut self, problem: usize, answer: &str) -> Result<QuizFeedback, QuizError> {
        self.expect_phase(QuizPhase::AwaitingFinalAnswer)?;
        if problem != self.index {
            return Err(QuizError::StaleSubmission {
                expected: self.index,
                got: problem,
            });
        }

        let value: i64 = answer.trim().parse().map_err(|_| QuizError::InvalidInput {
            raw: answer.to_string(),
        })?;
        let gcd = self
            .terminal_gcd()
            .ok_or(QuizError::UnexpectedEvent { phase: self.phase })?;
        if value != i64::from(gcd) {
            return Err(QuizError::InvalidGcdGuess);
        }

        self.score += 1;
        self.phase = QuizPhase::Solved;
        Ok(QuizFeedback::GcdAccepted {
            gcd,
            score: self.score,
        })
    }

    fn next_problem(&mut self) -> Result<QuizFeedback, QuizError> {
        self.expect_phase(QuizPhase::Solved)?;

        let next = self.index + 1;
        if next >= self.batch.len() {
            self.index = self.batch.len();
            self.steps.clear();
            self.phase = QuizPhase::AllComplete;
            return Ok(QuizFeedback::Completed {
                score: self.score,
                total: self.total(),
            });
        }

        self.load_problem(next);
        Ok(QuizFeedback::Advanced { problem: next })
    }

    fn load_problem(&mut self, index: usize) {
        if let Some(problem) = self.batch.get(index) {
            self.index = index;
            self.dividend = problem.dividend();
            self.divisor = problem.divisor();
            self.steps.clear();
            self.phase = self.step_entry_phase();
        }
    }

    fn step_entry_phase(&self) -> QuizPhase {
        match self.mode {
            StepInputMode::Direct => QuizPhase::AwaitingStepInput,
            StepInputMode::ConfirmPair(_) => QuizPhase::AwaitingNumberConfirmation,
        }
    }

    fn expect_phase(&self, phase: QuizPhase) -> Result<(), QuizError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(QuizError::UnexpectedEvent { phase: self.phase })
        }
    }

    fn expect_step(&self, step: usize) -> Result<(), QuizError> {
        if step == self.steps.len() {
            Ok(())
        } else {
            Err(QuizError::StaleSubmission {
                expected: self.steps.len(),
                got: step,
            })
        }
    }

    fn pair_keeps_gcd(&self) -> bool {
        self.current_problem()
            .is_none_or(|problem| euclid::gcd(self.dividend, self.divisor) == problem.gcd())
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("batch_len", &self.batch.len())
            .field("index", &self.index)
            .field("score", &self.score)
            .field("pair", &(self.dividend, self.divisor))
            .field("steps_len", &self.steps.len())
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
