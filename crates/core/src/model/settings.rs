use std::ops::RangeInclusive;

use thiserror::Error;
use url::Url;

pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const MAX_BATCH_SIZE: usize = 20;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("batch size must be between 1 and {MAX_BATCH_SIZE}, got {0}")]
    InvalidBatchSize(usize),

    #[error("{field} range is empty")]
    EmptyRange { field: &'static str },

    #[error("divisor range must start at {min} or above")]
    DivisorFloor { min: u32 },

    #[error("no GCD candidates configured")]
    NoGcdCandidates,

    #[error("minimum step count must be > 0")]
    InvalidMinSteps,

    #[error("invalid share link")]
    InvalidShareLink,
}

/// How a pair is matched during the confirmation sub-phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairMatch {
    /// Dividend and divisor must be entered in normalized order.
    Positional,
    /// Either order is accepted.
    Unordered,
}

/// How the student enters each division step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepInputMode {
    /// Quotient and remainder are entered straight away.
    #[default]
    Direct,
    /// The current pair has to be re-entered before the quotient and remainder.
    ConfirmPair(PairMatch),
}

/// Problem generation policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorPolicy {
    /// Pairs built as `divisor * q + r` whose GCD is one of `gcd_candidates`
    /// and which need at least `min_steps` divisions.
    Targeted {
        divisor_range: RangeInclusive<u32>,
        gcd_candidates: Vec<u32>,
        quotient_range: RangeInclusive<u32>,
        min_steps: usize,
    },
    /// Any `dividend >= divisor > 0` drawn from the two ranges.
    Uniform {
        dividend_range: RangeInclusive<u32>,
        divisor_range: RangeInclusive<u32>,
    },
}

impl GeneratorPolicy {
    #[must_use]
    pub fn targeted() -> Self {
        Self::Targeted {
            divisor_range: 10..=40,
            gcd_candidates: vec![2, 3, 4, 5, 6],
            quotient_range: 2..=4,
            min_steps: 2,
        }
    }

    #[must_use]
    pub fn uniform() -> Self {
        Self::Uniform {
            dividend_range: 20..=100,
            divisor_range: 10..=90,
        }
    }

    /// # Errors
    ///
    /// Returns `SettingsError` for ranges that cannot produce a single problem.
    pub fn validate(&self) -> Result<(), SettingsError> {
        match self {
            Self::Targeted {
                divisor_range,
                gcd_candidates,
                quotient_range,
                min_steps,
            } => {
                if divisor_range.is_empty() {
                    return Err(SettingsError::EmptyRange { field: "divisor" });
                }
                if quotient_range.is_empty() {
                    return Err(SettingsError::EmptyRange { field: "quotient" });
                }
                // The remainder is drawn from 1..divisor.
                if *divisor_range.start() < 2 {
                    return Err(SettingsError::DivisorFloor { min: 2 });
                }
                if gcd_candidates.iter().all(|g| *g == 0) {
                    return Err(SettingsError::NoGcdCandidates);
                }
                if *min_steps == 0 {
                    return Err(SettingsError::InvalidMinSteps);
                }
            }
            Self::Uniform {
                dividend_range,
                divisor_range,
            } => {
                if dividend_range.is_empty() {
                    return Err(SettingsError::EmptyRange { field: "dividend" });
                }
                if divisor_range.is_empty() {
                    return Err(SettingsError::EmptyRange { field: "divisor" });
                }
                if *divisor_range.start() == 0 {
                    return Err(SettingsError::DivisorFloor { min: 1 });
                }
                if dividend_range.end() < divisor_range.start() {
                    return Err(SettingsError::EmptyRange {
                        field: "dividend >= divisor",
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for GeneratorPolicy {
    fn default() -> Self {
        Self::targeted()
    }
}

/// Configuration for one practice round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    batch_size: usize,
    input_mode: StepInputMode,
    generator: GeneratorPolicy,
    share_link: Option<Url>,
}

impl QuizSettings {
    /// # Errors
    ///
    /// Returns `SettingsError` if the batch size is out of range or the
    /// generator policy is misconfigured.
    pub fn new(
        batch_size: usize,
        input_mode: StepInputMode,
        generator: GeneratorPolicy,
    ) -> Result<Self, SettingsError> {
        let settings = Self {
            batch_size,
            input_mode,
            generator,
            share_link: None,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// # Errors
    ///
    /// Returns `SettingsError` if the batch size is outside `1..=MAX_BATCH_SIZE`
    /// or the generator policy is misconfigured.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(1..=MAX_BATCH_SIZE).contains(&self.batch_size) {
            return Err(SettingsError::InvalidBatchSize(self.batch_size));
        }
        self.generator.validate()
    }

    /// Attach the link shown to participants so they can open the quiz themselves.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidShareLink` if `link` is not an absolute URL.
    pub fn with_share_link(mut self, link: &str) -> Result<Self, SettingsError> {
        let url = Url::parse(link.trim()).map_err(|_| SettingsError::InvalidShareLink)?;
        self.share_link = Some(url);
        Ok(self)
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[must_use]
    pub fn input_mode(&self) -> StepInputMode {
        self.input_mode
    }

    #[must_use]
    pub fn generator(&self) -> &GeneratorPolicy {
        &self.generator
    }

    #[must_use]
    pub fn share_link(&self) -> Option<&Url> {
        self.share_link.as_ref()
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            input_mode: StepInputMode::Direct,
            generator: GeneratorPolicy::targeted(),
            share_link: None,
        }
    }
}
