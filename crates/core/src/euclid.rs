//! Euclidean division arithmetic shared by the generator and the quiz.

use crate::model::StepRecord;

/// Quotient and remainder of one truncating division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivisionStep {
    pub quotient: u32,
    pub remainder: u32,
}

/// Divide `dividend` by `divisor`.
///
/// `divisor` must be non-zero; every pair reaching this function comes from a
/// validated `Problem` or from a non-zero remainder.
#[must_use]
pub fn divide(dividend: u32, divisor: u32) -> DivisionStep {
    debug_assert!(divisor > 0, "division by zero");
    DivisionStep {
        quotient: dividend / divisor,
        remainder: dividend % divisor,
    }
}

/// Order a pair so that the larger value is the dividend.
#[must_use]
pub fn normalize(a: u32, b: u32) -> (u32, u32) {
    if a < b { (b, a) } else { (a, b) }
}

/// Full Euclidean trace from `(a, b)` down to the zero remainder.
///
/// Returns an empty trace when either operand is zero.
#[must_use]
pub fn trace(a: u32, b: u32) -> Vec<StepRecord> {
    let (mut dividend, mut divisor) = normalize(a, b);
    let mut steps = Vec::new();
    while divisor != 0 {
        let DivisionStep {
            quotient,
            remainder,
        } = divide(dividend, divisor);
        steps.push(StepRecord {
            dividend,
            divisor,
            quotient,
            remainder,
        });
        dividend = divisor;
        divisor = remainder;
    }
    steps
}

/// Number of division steps the Euclidean algorithm needs for `(a, b)`.
#[must_use]
pub fn step_count(a: u32, b: u32) -> usize {
    let (mut a, mut b) = normalize(a, b);
    let mut steps = 0;
    while b != 0 {
        (a, b) = (b, a % b);
        steps += 1;
    }
    steps
}

#[must_use]
pub fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Stein's binary GCD, kept as an independent reference for `gcd`.
#[must_use]
pub fn binary_gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    if a == 0 {
        return b;
    }
    if b == 0 {
        return a;
    }

    let shift = (a | b).trailing_zeros();
    a >>= a.trailing_zeros();
    loop {
        b >>= b.trailing_zeros();
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        b -= a;
        if b == 0 {
            break;
        }
    }
    a << shift
}
