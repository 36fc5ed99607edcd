use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::euclid;
use crate::model::StepRecord;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProblemError {
    #[error("divisor must be positive")]
    ZeroDivisor,

    #[error("dividend {dividend} is smaller than divisor {divisor}")]
    DividendTooSmall { dividend: u32, divisor: u32 },

    #[error("a batch needs at least one problem")]
    EmptyBatch,
}

/// A (dividend, divisor) pair whose GCD the student has to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    dividend: u32,
    divisor: u32,
}

impl Problem {
    /// # Errors
    ///
    /// Returns `ProblemError::ZeroDivisor` if `divisor` is zero and
    /// `ProblemError::DividendTooSmall` if `dividend < divisor`.
    pub fn new(dividend: u32, divisor: u32) -> Result<Self, ProblemError> {
        if divisor == 0 {
            return Err(ProblemError::ZeroDivisor);
        }
        if dividend < divisor {
            return Err(ProblemError::DividendTooSmall { dividend, divisor });
        }
        Ok(Self { dividend, divisor })
    }

    #[must_use]
    pub fn dividend(&self) -> u32 {
        self.dividend
    }

    #[must_use]
    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    #[must_use]
    pub fn gcd(&self) -> u32 {
        euclid::gcd(self.dividend, self.divisor)
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        euclid::step_count(self.dividend, self.divisor)
    }

    /// The expected worked solution.
    #[must_use]
    pub fn trace(&self) -> Vec<StepRecord> {
        euclid::trace(self.dividend, self.divisor)
    }
}

/// Ordered, non-empty set of problems for one practice round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemBatch(Vec<Problem>);

impl ProblemBatch {
    /// # Errors
    ///
    /// Returns `ProblemError::EmptyBatch` if `problems` is empty.
    pub fn new(problems: Vec<Problem>) -> Result<Self, ProblemError> {
        if problems.is_empty() {
            return Err(ProblemError::EmptyBatch);
        }
        Ok(Self(problems))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Problem> {
        self.0.get(index)
    }

    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.0
    }
}
