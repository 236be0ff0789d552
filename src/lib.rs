//! Shared helpers for the cross-crate integration tests.

use arbcore_ball::Ball;
use arbcore_float::Float;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};

/// `floor(x * 10^digits)` for a finite `x`.
#[must_use]
pub fn floor_scaled(x: &Float, digits: u32) -> Option<BigInt> {
    if x.is_zero() {
        return Some(BigInt::zero());
    }
    let (m, e) = x.to_bigint_2exp()?;
    let scaled = m * num_traits::pow(BigInt::from(10), digits as usize);
    if e >= BigInt::zero() {
        let shift = usize::try_from(e).ok()?;
        Some(scaled << shift)
    } else {
        let shift = usize::try_from(-e).ok()?;
        Some(scaled.div_floor(&(BigInt::one() << shift)))
    }
}

/// `ceil(x * 10^digits)` for a finite `x`.
#[must_use]
pub fn ceil_scaled(x: &Float, digits: u32) -> Option<BigInt> {
    floor_scaled(&x.neg(), digits).map(|v| -v)
}

/// Integer bounds `[lo, hi]` with `lo <= v * 10^digits <= hi` for every `v`
/// in the ball.
#[must_use]
pub fn decimal_bracket(ball: &Ball, digits: u32) -> Option<(BigInt, BigInt)> {
    if !ball.is_finite() {
        return None;
    }
    let lo = ball.mid().sub_exact(ball.rad()).ok()?;
    let hi = ball.mid().add_exact(ball.rad()).ok()?;
    Some((floor_scaled(&lo, digits)?, ceil_scaled(&hi, digits)?))
}
