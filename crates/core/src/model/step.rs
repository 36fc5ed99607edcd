use serde::{Deserialize, Serialize};

/// A user's claimed quotient and remainder for the current pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepGuess {
    pub quotient: u32,
    pub remainder: u32,
}

impl StepGuess {
    #[must_use]
    pub fn new(quotient: u32, remainder: u32) -> Self {
        Self {
            quotient,
            remainder,
        }
    }
}

/// One validated division: `dividend = quotient * divisor + remainder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub dividend: u32,
    pub divisor: u32,
    pub quotient: u32,
    pub remainder: u32,
}

impl StepRecord {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.remainder == 0
    }
}
