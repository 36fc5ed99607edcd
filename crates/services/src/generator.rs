use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;

use drill_core::euclid;
use drill_core::model::{GeneratorPolicy, Problem, ProblemBatch};

use crate::error::GeneratorError;

/// Upper bound on rejection-sampling draws for a single problem.
///
/// Valid policies accept a draw within a handful of attempts; reaching the
/// bound means the ranges cannot produce the requested pairs.
pub const MAX_ATTEMPTS_PER_PROBLEM: usize = 10_000;

/// Draws practice problems according to a `GeneratorPolicy`.
pub struct ProblemGenerator<R> {
    policy: GeneratorPolicy,
    rng: R,
}

impl<R: Rng> ProblemGenerator<R> {
    /// # Errors
    ///
    /// Returns `GeneratorError::Settings` if the policy is misconfigured.
    pub fn new(policy: GeneratorPolicy, rng: R) -> Result<Self, GeneratorError> {
        policy.validate()?;
        Ok(Self { policy, rng })
    }

    #[must_use]
    pub fn policy(&self) -> &GeneratorPolicy {
        &self.policy
    }

    /// Draw one problem, resampling until the policy accepts it.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::Exhausted` after `MAX_ATTEMPTS_PER_PROBLEM` rejected draws.
    pub fn generate_problem(&mut self) -> Result<Problem, GeneratorError> {
        for attempt in 1..=MAX_ATTEMPTS_PER_PROBLEM {
            if let Some(problem) = self.draw() {
                debug!(
                    "generated problem ({}, {}) gcd={} steps={} after {attempt} draw(s)",
                    problem.dividend(),
                    problem.divisor(),
                    problem.gcd(),
                    problem.step_count(),
                );
                return Ok(problem);
            }
        }
        Err(GeneratorError::Exhausted {
            attempts: MAX_ATTEMPTS_PER_PROBLEM,
        })
    }

    /// # Errors
    ///
    /// Returns `GeneratorError` if a problem cannot be drawn or `size` is zero.
    pub fn generate_batch(&mut self, size: usize) -> Result<ProblemBatch, GeneratorError> {
        let problems = (0..size)
            .map(|_| self.generate_problem())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ProblemBatch::new(problems)?)
    }

    fn draw(&mut self) -> Option<Problem> {
        match &self.policy {
            GeneratorPolicy::Targeted {
                divisor_range,
                gcd_candidates,
                quotient_range,
                min_steps,
            } => {
                let divisor = self.rng.random_range(divisor_range.clone());
                let target = *gcd_candidates.choose(&mut self.rng)?;
                let quotient = self.rng.random_range(quotient_range.clone());
                // Non-zero remainder keeps the dividend off exact multiples.
                let remainder = self.rng.random_range(1..divisor);
                let dividend = divisor.checked_mul(quotient)?.checked_add(remainder)?;

                if euclid::gcd(dividend, divisor) != target {
                    return None;
                }
                if euclid::step_count(dividend, divisor) < *min_steps {
                    return None;
                }
                Problem::new(dividend, divisor).ok()
            }
            GeneratorPolicy::Uniform {
                dividend_range,
                divisor_range,
            } => {
                let dividend = self.rng.random_range(dividend_range.clone());
                let divisor = self.rng.random_range(divisor_range.clone());
                Problem::new(dividend, divisor).ok()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::model::SettingsError;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded(policy: GeneratorPolicy, seed: u64) -> ProblemGenerator<StdRng> {
        ProblemGenerator::new(policy, StdRng::seed_from_u64(seed)).unwrap()
    }

    proptest! {
        #[test]
        fn targeted_problems_meet_policy(seed in any::<u64>()) {
            let batch = seeded(GeneratorPolicy::targeted(), seed)
                .generate_batch(5)
                .unwrap();
            prop_assert_eq!(batch.len(), 5);
            for problem in batch.problems() {
                let (a, b) = (problem.dividend(), problem.divisor());
                prop_assert!(a >= b && b > 0, "({}, {}) not ordered", a, b);
                prop_assert!((10..=40).contains(&b));
                prop_assert_ne!(a % b, 0, "({}, {}) is an exact multiple", a, b);
                prop_assert!([2, 3, 4, 5, 6].contains(&problem.gcd()));
                prop_assert!(problem.step_count() >= 2);
                prop_assert_eq!(problem.gcd(), euclid::binary_gcd(a, b));
            }
        }

        #[test]
        fn uniform_problems_are_ordered(seed in any::<u64>()) {
            let batch = seeded(GeneratorPolicy::uniform(), seed)
                .generate_batch(5)
                .unwrap();
            for problem in batch.problems() {
                prop_assert!(problem.dividend() >= problem.divisor());
                prop_assert!((20..=100).contains(&problem.dividend()));
                prop_assert!((10..=90).contains(&problem.divisor()));
            }
        }
    }

    #[test]
    fn same_seed_same_batch() {
        let first = seeded(GeneratorPolicy::targeted(), 42)
            .generate_batch(5)
            .unwrap();
        let second = seeded(GeneratorPolicy::targeted(), 42)
            .generate_batch(5)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unreachable_target_exhausts() {
        // gcd(b*q + r, b) divides b; 7 never divides a divisor in 2..=3.
        let policy = GeneratorPolicy::Targeted {
            divisor_range: 2..=3,
            gcd_candidates: vec![7],
            quotient_range: 2..=2,
            min_steps: 2,
        };
        let err = seeded(policy, 1).generate_problem().unwrap_err();
        assert_eq!(
            err,
            GeneratorError::Exhausted {
                attempts: MAX_ATTEMPTS_PER_PROBLEM
            }
        );
    }

    #[test]
    fn misconfigured_policy_is_rejected() {
        let policy = GeneratorPolicy::Targeted {
            divisor_range: 10..=40,
            gcd_candidates: Vec::new(),
            quotient_range: 2..=4,
            min_steps: 2,
        };
        let err = ProblemGenerator::new(policy, StdRng::seed_from_u64(0))
            .err()
            .unwrap();
        assert_eq!(err, GeneratorError::Settings(SettingsError::NoGcdCandidates));
    }

    #[test]
    fn empty_batch_is_an_error() {
        let err = seeded(GeneratorPolicy::targeted(), 3)
            .generate_batch(0)
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Problem(_)));
    }
}
