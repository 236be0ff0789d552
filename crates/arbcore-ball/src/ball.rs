//! The `Ball` type: a midpoint with a rigorous error radius.

use std::cmp::Ordering;
use std::fmt;

use arbcore_float::{Float, Round, Rounded};
use num_bigint::BigInt;

use crate::constants::RAD_PREC;
use crate::error::BallError;

/// Round a nonnegative radius quantity up to [`RAD_PREC`] bits.
///
/// Anything that is not a finite nonnegative number becomes `+inf`, which is
/// always a valid radius.
pub(crate) fn rad_normalize(x: &Float) -> Float {
    if !x.is_finite() {
        return Float::pos_inf();
    }
    x.abs()
        .set_round(RAD_PREC, Round::Ceil)
        .map_or_else(|_| Float::pos_inf(), |r| r.value)
}

/// Upper bound of `a + b` for radius quantities.
pub(crate) fn rad_add(a: &Float, b: &Float) -> Float {
    a.add(b, RAD_PREC, Round::Ceil)
        .map_or_else(|_| Float::pos_inf(), |r| rad_normalize(&r.value))
}

/// Upper bound of `a * b` for radius quantities.
pub(crate) fn rad_mul(a: &Float, b: &Float) -> Float {
    if a.is_zero() || b.is_zero() {
        return Float::zero();
    }
    a.mul(b, RAD_PREC, Round::Ceil)
        .map_or_else(|_| Float::pos_inf(), |r| rad_normalize(&r.value))
}

/// Upper bound of `a / b` for radius quantities.
pub(crate) fn rad_div(a: &Float, b: &Float) -> Float {
    a.div(b, RAD_PREC, Round::Ceil)
        .map_or_else(|_| Float::pos_inf(), |r| rad_normalize(&r.value))
}

/// Interval `[mid - rad, mid + rad]` enclosing a real number.
///
/// The radius is stored with [`RAD_PREC`] bits and every operation that
/// touches it rounds upward, so the enclosure can only grow. A ball whose
/// radius is infinite carries no information about its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ball {
    mid: Float,
    rad: Float,
}

impl Ball {
    /// Ball around `mid` with radius at least `|rad|`.
    #[must_use]
    pub fn new(mid: Float, rad: &Float) -> Self {
        let rad = if mid.is_nan() {
            Float::pos_inf()
        } else {
            rad_normalize(rad)
        };
        Self { mid, rad }
    }

    /// Exact ball (zero radius).
    #[must_use]
    pub fn exact(mid: Float) -> Self {
        if mid.is_nan() {
            return Self::indeterminate();
        }
        Self {
            mid,
            rad: Float::zero(),
        }
    }

    /// Exactly zero.
    #[must_use]
    pub fn zero() -> Self {
        Self::exact(Float::zero())
    }

    /// Exactly one.
    #[must_use]
    pub fn one() -> Self {
        Self::exact(Float::one())
    }

    /// The ball that contains every real number.
    #[must_use]
    pub fn indeterminate() -> Self {
        Self {
            mid: Float::nan(),
            rad: Float::pos_inf(),
        }
    }

    /// Exact integer.
    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        Self::exact(Float::from_i64(value))
    }

    /// Exact integer.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self::exact(Float::from_u64(value))
    }

    /// Exact big integer.
    #[must_use]
    pub fn from_bigint(value: &BigInt) -> Self {
        Self::exact(Float::from_bigint(value))
    }

    /// Exact value of a double (NaN gives the indeterminate ball).
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        Self::exact(Float::from_f64(value))
    }

    /// Ball around a rounded result, widened by its rounding error.
    pub(crate) fn from_rounded(rounded: &Rounded, prec: u64) -> Self {
        let rad = rounded.error_bound(prec);
        Self {
            mid: rounded.value.clone(),
            rad: rad_normalize(&rad),
        }
    }

    /// The midpoint.
    #[must_use]
    pub fn mid(&self) -> &Float {
        &self.mid
    }

    /// The radius.
    #[must_use]
    pub fn rad(&self) -> &Float {
        &self.rad
    }

    /// Whether the radius is zero.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.rad.is_zero()
    }

    /// Whether midpoint and radius are both finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.mid.is_finite() && self.rad.is_finite()
    }

    /// Whether the ball is exactly the number one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.is_exact() && self.mid.is_one()
    }

    /// Whether the ball is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.is_exact() && self.mid.is_zero()
    }

    /// Whether the ball contains zero.
    #[must_use]
    pub fn contains_zero(&self) -> bool {
        self.contains(&Float::zero())
    }

    /// Whether `|x - mid| <= rad`, decided exactly.
    #[must_use]
    pub fn contains(&self, x: &Float) -> bool {
        if !self.is_finite() {
            return true;
        }
        if !x.is_finite() {
            return false;
        }
        x.sub_exact(&self.mid)
            .ok()
            .and_then(|d| d.abs().cmp_value(&self.rad))
            .is_some_and(|ord| ord != Ordering::Greater)
    }

    /// Whether `other` lies entirely inside this ball.
    #[must_use]
    pub fn contains_ball(&self, other: &Self) -> bool {
        if !self.is_finite() {
            return true;
        }
        if !other.is_finite() {
            return false;
        }
        self.mid
            .sub_exact(&other.mid)
            .and_then(|d| d.abs().add_exact(&other.rad))
            .ok()
            .and_then(|d| d.cmp_value(&self.rad))
            .is_some_and(|ord| ord != Ordering::Greater)
    }

    /// Whether the two balls have a point in common.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        if !self.is_finite() || !other.is_finite() {
            return true;
        }
        let (Ok(d), Ok(r)) = (
            self.mid.sub_exact(&other.mid),
            self.rad.add_exact(&other.rad),
        ) else {
            return false;
        };
        d.abs().cmp_value(&r).is_some_and(|ord| ord != Ordering::Greater)
    }

    /// Negation.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            mid: self.mid.neg(),
            rad: self.rad.clone(),
        }
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            mid: self.mid.abs(),
            rad: self.rad.clone(),
        }
    }

    /// Exact multiplication by `2^exp`.
    #[must_use]
    pub fn mul_2exp(&self, exp: i64) -> Self {
        Self {
            mid: self.mid.mul_2exp(exp),
            rad: self.rad.mul_2exp(exp),
        }
    }

    /// Widen the radius by `|err|`.
    pub fn add_error(&mut self, err: &Float) {
        self.rad = rad_add(&self.rad, &err.abs());
    }

    /// Widen the radius by `2^exp`.
    pub fn add_error_2exp(&mut self, exp: impl Into<BigInt>) {
        self.rad = rad_add(&self.rad, &Float::pow2(exp));
    }

    /// Round the midpoint to `prec` bits, widening the radius to match.
    pub fn set_round(&self, prec: u64) -> Result<Self, BallError> {
        let rounded = self.mid.set_round(prec, Round::Nearest)?;
        let mut out = Self::from_rounded(&rounded, prec);
        out.add_error(&self.rad);
        Ok(out)
    }

    /// Bits of relative accuracy: `msb(mid) - msb(rad)`.
    ///
    /// `None` for an exact or non-finite ball, or one with a zero midpoint.
    #[must_use]
    pub fn rel_accuracy_bits(&self) -> Option<BigInt> {
        if !self.is_finite() {
            return None;
        }
        Some(self.mid.msb()? - self.rad.msb()?)
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Float> for Ball {
    fn from(value: Float) -> Self {
        Self::exact(value)
    }
}

impl From<i64> for Ball {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl fmt::Display for Ball {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} +/- {}]", self.mid, self.rad)
    }
}
