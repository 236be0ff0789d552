//! Series evaluators for the cached mathematical constants.
//!
//! Each evaluator works at `prec + clog2(prec)` bits, bounds the truncated
//! tail of its series rigorously, and rounds the result to `prec` bits.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use arbcore_float::{Float, Round};
use num_bigint::{BigInt, BigUint};
use tracing::trace;

use crate::ball::Ball;
use crate::error::BallError;

/// Identifier of a cached constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstantId {
    /// Euler's number.
    E,
    /// Archimedes' constant.
    Pi,
    /// Natural logarithm of two.
    Log2,
}

impl ConstantId {
    /// All constants.
    pub const ALL: [Self; 3] = [Self::E, Self::Pi, Self::Log2];

    /// Canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::E => "e",
            Self::Pi => "pi",
            Self::Log2 => "log2",
        }
    }

    /// The built-in evaluator for this constant.
    #[must_use]
    pub fn evaluator(self) -> Arc<dyn ConstantEvaluator> {
        match self {
            Self::E => Arc::new(EulerSeries),
            Self::Pi => Arc::new(MachinSeries),
            Self::Log2 => Arc::new(Log2Series),
        }
    }
}

impl fmt::Display for ConstantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstantId {
    type Err = BallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "e" | "euler" => Ok(Self::E),
            "pi" => Ok(Self::Pi),
            "log2" | "ln2" => Ok(Self::Log2),
            _ => Err(BallError::UnknownConstant(s.to_string())),
        }
    }
}

/// Computes an enclosure of one constant at a requested precision.
pub trait ConstantEvaluator: Send + Sync {
    /// Which constant this evaluator computes.
    fn id(&self) -> ConstantId;

    /// A ball of about `prec` bits containing the constant.
    fn evaluate(&self, prec: u64) -> Result<Ball, BallError>;

    /// Human-readable algorithm name.
    fn name(&self) -> &str;
}

/// `ceil(log2(n))` for `n >= 1`.
#[must_use]
pub fn clog2(n: u64) -> u64 {
    if n <= 1 {
        0
    } else {
        u64::from(64 - (n - 1).leading_zeros())
    }
}

/// Working precision for a series evaluated to `prec` bits.
#[must_use]
pub fn working_precision(prec: u64) -> u64 {
    prec + clog2(prec)
}

/// `e = sum 1/k!` by binary splitting.
#[derive(Debug, Default, Clone, Copy)]
pub struct EulerSeries;

/// `(P, Q)` with `P/Q = sum_{k=a+1}^{b} a!/k!`.
fn euler_split(a: u64, b: u64) -> (BigUint, BigUint) {
    if b - a == 1 {
        return (BigUint::from(1u32), BigUint::from(b));
    }
    let m = a + (b - a) / 2;
    let (p1, q1) = euler_split(a, m);
    let (p2, q2) = euler_split(m, b);
    (p1 * &q2 + p2, q1 * q2)
}

impl ConstantEvaluator for EulerSeries {
    fn id(&self) -> ConstantId {
        ConstantId::E
    }

    #[allow(clippy::cast_precision_loss)]
    fn evaluate(&self, prec: u64) -> Result<Ball, BallError> {
        let wp = working_precision(prec);
        // Smallest N with log2(N!) > wp + 4.
        let target = wp as f64 + 4.0;
        let mut terms = 1u64;
        let mut log_fact = 0.0f64;
        while log_fact <= target {
            terms += 1;
            log_fact += (terms as f64).log2();
        }
        trace!(prec, wp, terms, "evaluating e");

        let (p, q) = euler_split(0, terms);
        let q_bits = q.bits();
        let numerator = Float::from_bigint(&BigInt::from(p + &q));
        let denominator = Float::from_bigint(&BigInt::from(q));
        let rounded = numerator.div(&denominator, wp, Round::Nearest)?;
        let mut ball = Ball::from_rounded(&rounded, wp);
        // Tail after N terms is below 2/(N+1)! < 2/Q <= 2^(2 - bits(Q)).
        ball.add_error_2exp(2 - i64::try_from(q_bits).unwrap_or(i64::MAX - 2));
        ball.set_round(prec)
    }

    fn name(&self) -> &str {
        "binary-splitting"
    }
}

/// `sum_{k<N} (±1)^k / ((2k+1) x^(2k+1))` as a ball, plus the tail bound.
///
/// With `alternating` this is `atan(1/x)`, otherwise `atanh(1/x)`. `x >= 2`.
fn arctan_recip(x: u64, alternating: bool, wp: u64) -> Result<Ball, BallError> {
    debug_assert!(x >= 2);
    let lg = u64::from(63 - x.leading_zeros());
    // (2N+1) floor(log2 x) >= wp + 4 makes the tail negligible at wp bits.
    let terms = (wp + 4).div_ceil(lg).div_ceil(2);
    let x_sq = BigUint::from(x) * x;
    let mut power = BigUint::from(x);
    let mut sum = Ball::zero();
    for k in 0..terms {
        let denominator = BigInt::from(&power * (2 * k + 1));
        let term = Ball::one().div(&Ball::from_bigint(&denominator), wp)?;
        sum = if alternating && k % 2 == 1 {
            sum.sub(&term, wp)?
        } else {
            sum.add(&term, wp)?
        };
        power *= &x_sq;
    }
    // Both tails are below 2 x^-(2N+1) <= 2^(1 - (2N+1) floor(log2 x)).
    let tail_exp = (2 * terms + 1).saturating_mul(lg);
    sum.add_error_2exp(1 - BigInt::from(tail_exp));
    Ok(sum)
}

/// `pi = 16 atan(1/5) - 4 atan(1/239)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MachinSeries;

impl ConstantEvaluator for MachinSeries {
    fn id(&self) -> ConstantId {
        ConstantId::Pi
    }

    fn evaluate(&self, prec: u64) -> Result<Ball, BallError> {
        let wp = working_precision(prec) + 8;
        trace!(prec, wp, "evaluating pi");
        let a = arctan_recip(5, true, wp)?.mul_2exp(4);
        let b = arctan_recip(239, true, wp)?.mul_2exp(2);
        a.sub(&b, wp)?.set_round(prec)
    }

    fn name(&self) -> &str {
        "machin"
    }
}

/// `log 2 = 2 atanh(1/3)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Log2Series;

impl ConstantEvaluator for Log2Series {
    fn id(&self) -> ConstantId {
        ConstantId::Log2
    }

    fn evaluate(&self, prec: u64) -> Result<Ball, BallError> {
        let wp = working_precision(prec) + 4;
        trace!(prec, wp, "evaluating log2");
        arctan_recip(3, false, wp)?.mul_2exp(1).set_round(prec)
    }

    fn name(&self) -> &str {
        "atanh"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clog2_values() {
        assert_eq!(clog2(1), 0);
        assert_eq!(clog2(2), 1);
        assert_eq!(clog2(3), 2);
        assert_eq!(clog2(64), 6);
        assert_eq!(clog2(65), 7);
        assert_eq!(working_precision(64), 70);
    }

    #[test]
    fn euler_split_small() {
        // 1/1! + 1/2! + 1/3! = 10/6
        let (p, q) = euler_split(0, 3);
        assert_eq!(p, BigUint::from(10u32));
        assert_eq!(q, BigUint::from(6u32));
    }

    #[test]
    fn constants_contain_f64_values() {
        let cases = [
            (ConstantId::E, std::f64::consts::E),
            (ConstantId::Pi, std::f64::consts::PI),
            (ConstantId::Log2, std::f64::consts::LN_2),
        ];
        for (id, approx) in cases {
            let ball = id.evaluator().evaluate(64).unwrap();
            let window = Ball::new(Float::from_f64(approx), &Float::pow2(-50));
            assert!(ball.overlaps(&window), "{id}: {ball}");
            let acc = ball.rel_accuracy_bits().unwrap();
            assert!(acc >= BigInt::from(60), "{id}: accuracy {acc}");
        }
    }

    #[test]
    fn higher_precision_is_nested_in_lower() {
        for id in ConstantId::ALL {
            let eval = id.evaluator();
            let lo = eval.evaluate(40).unwrap();
            let hi = eval.evaluate(300).unwrap();
            assert!(lo.overlaps(&hi), "{id}");
            assert!(hi.rel_accuracy_bits().unwrap() >= BigInt::from(295), "{id}");
        }
    }

    #[test]
    fn parse_names() {
        assert_eq!("ln2".parse::<ConstantId>().unwrap(), ConstantId::Log2);
        assert_eq!(" PI ".parse::<ConstantId>().unwrap(), ConstantId::Pi);
        assert!(matches!(
            "tau".parse::<ConstantId>(),
            Err(BallError::UnknownConstant(_))
        ));
        for id in ConstantId::ALL {
            assert_eq!(id.as_str().parse::<ConstantId>().unwrap(), id);
            assert_eq!(id.evaluator().id(), id);
        }
    }
}
