//! Ball arithmetic and the named binary operations.
//!
//! Every operation rounds the midpoint to nearest at the requested precision
//! and adds that rounding error to a propagated radius computed with upward
//! rounding. An operand with an infinite radius or a non-finite midpoint
//! yields a result with an infinite radius.

use std::fmt;
use std::str::FromStr;

use arbcore_float::{Float, Round};

use crate::ball::{rad_add, rad_div, rad_mul, Ball};
use crate::constants::RAD_PREC;
use crate::error::BallError;

impl Ball {
    /// Ball with an infinite radius around a best-effort midpoint.
    fn blow_up(mid: Float) -> Self {
        Self::new(mid, &Float::pos_inf())
    }

    /// Sum.
    pub fn add(&self, other: &Self, prec: u64) -> Result<Self, BallError> {
        let rounded = self.mid().add(other.mid(), prec, Round::Nearest)?;
        if !self.is_finite() || !other.is_finite() {
            return Ok(Self::blow_up(rounded.value));
        }
        let mut out = Self::from_rounded(&rounded, prec);
        out.add_error(&rad_add(self.rad(), other.rad()));
        Ok(out)
    }

    /// Difference.
    pub fn sub(&self, other: &Self, prec: u64) -> Result<Self, BallError> {
        self.add(&other.neg(), prec)
    }

    /// Product. The radius is `|m1| r2 + |m2| r1 + r1 r2` plus the midpoint
    /// rounding error.
    pub fn mul(&self, other: &Self, prec: u64) -> Result<Self, BallError> {
        let rounded = self.mid().mul(other.mid(), prec, Round::Nearest)?;
        if !self.is_finite() || !other.is_finite() {
            return Ok(Self::blow_up(rounded.value));
        }
        let (m1, r1) = (self.mid().abs(), self.rad());
        let (m2, r2) = (other.mid().abs(), other.rad());
        let propagated = rad_add(
            &rad_add(&rad_mul(&m1, r2), &rad_mul(&m2, r1)),
            &rad_mul(r1, r2),
        );
        let mut out = Self::from_rounded(&rounded, prec);
        out.add_error(&propagated);
        Ok(out)
    }

    /// Quotient. A divisor ball that contains zero gives the indeterminate
    /// ball.
    pub fn div(&self, other: &Self, prec: u64) -> Result<Self, BallError> {
        if !other.is_finite() || other.contains_zero() {
            return Ok(Self::indeterminate());
        }
        let rounded = self.mid().div(other.mid(), prec, Round::Nearest)?;
        if !self.is_finite() {
            return Ok(Self::blow_up(rounded.value));
        }
        let mut out = Self::from_rounded(&rounded, prec);
        if other.is_exact() && self.is_exact() {
            return Ok(out);
        }

        let (m1, r1) = (self.mid().abs(), self.rad());
        let (m2, r2) = (other.mid().abs(), other.rad());
        let numerator = rad_add(&rad_mul(&m1, r2), &rad_mul(&m2, r1));
        // Lower bound for |m2| (|m2| - r2), positive since 0 is not in the divisor.
        let gap = m2.sub(r2, RAD_PREC, Round::Floor)?.value;
        let denominator = m2.mul(&gap, RAD_PREC, Round::Floor)?.value;
        out.add_error(&rad_div(&numerator, &denominator));
        Ok(out)
    }
}

/// A named binary operation on balls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`
    Div,
}

impl BinaryOp {
    /// All operations.
    pub const ALL: [Self; 4] = [Self::Add, Self::Sub, Self::Mul, Self::Div];

    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
        }
    }

    /// Apply the operation at `prec` bits.
    pub fn apply(self, a: &Ball, b: &Ball, prec: u64) -> Result<Ball, BallError> {
        match self {
            Self::Add => a.add(b, prec),
            Self::Sub => a.sub(b, prec),
            Self::Mul => a.mul(b, prec),
            Self::Div => a.div(b, prec),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BinaryOp {
    type Err = BallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" | "+" => Ok(Self::Add),
            "sub" | "-" => Ok(Self::Sub),
            "mul" | "*" => Ok(Self::Mul),
            "div" | "/" => Ok(Self::Div),
            _ => Err(BallError::UnknownOperation(s.to_string())),
        }
    }
}

/// Apply `op` to two balls at `prec` bits.
///
/// The result contains `x op y` for every `x` in `a` and `y` in `b`.
pub fn ball_binary_op(op: BinaryOp, a: &Ball, b: &Ball, prec: u64) -> Result<Ball, BallError> {
    op.apply(a, b, prec)
}
