//! Rounded and exact arithmetic on [`Float`] values.

use std::cmp::Ordering;

use arbcore_memory::{default_provider, LimbProvider};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

use crate::error::{check_prec, FloatError};
use crate::float::{Float, Parts};
use crate::mul::{multiply_with, Rounded};
use crate::round::{round_limbs, Round};

/// Signed magnitude with an exponent, used while aligning operands.
struct Term {
    negative: bool,
    magnitude: BigUint,
    exponent: BigInt,
}

impl Term {
    fn from_parts(p: Parts<'_>) -> Self {
        Self {
            negative: p.negative,
            magnitude: crate::limb::to_biguint(p.mantissa),
            exponent: p.exponent.clone(),
        }
    }

    fn msb(&self) -> BigInt {
        &self.exponent + BigInt::from(self.magnitude.bits()) - 1
    }
}

fn shift_amount(diff: &BigInt) -> Result<usize, FloatError> {
    diff.to_usize().ok_or(FloatError::ExponentOverflow)
}

/// Exact signed sum of two terms, or `None` when they cancel.
fn aligned_sum(a: Term, b: Term) -> Result<Option<Term>, FloatError> {
    let lo = a.exponent.clone().min(b.exponent.clone());
    let ma = a.magnitude << shift_amount(&(&a.exponent - &lo))?;
    let mb = b.magnitude << shift_amount(&(&b.exponent - &lo))?;
    let (negative, magnitude) = if a.negative == b.negative {
        (a.negative, ma + mb)
    } else {
        match ma.cmp(&mb) {
            Ordering::Equal => return Ok(None),
            Ordering::Greater => (a.negative, ma - mb),
            Ordering::Less => (b.negative, mb - ma),
        }
    };
    Ok(Some(Term {
        negative,
        magnitude,
        exponent: lo,
    }))
}

/// Round a nonzero `±magnitude * 2^exponent` to `prec` bits.
pub(crate) fn round_magnitude(
    negative: bool,
    magnitude: &BigUint,
    exponent: BigInt,
    prec: u64,
    rnd: Round,
) -> Rounded {
    let limbs = magnitude.to_u64_digits();
    let r = round_limbs(&limbs, negative, prec, rnd);
    Rounded {
        value: Float::finite(negative, r.mantissa, exponent + r.shift),
        exact: r.exact,
    }
}

/// Result of combining infinities, zeros and NaN under addition.
fn add_special(x: &Float, y: &Float) -> Option<Float> {
    if x.is_nan() || y.is_nan() {
        return Some(Float::nan());
    }
    match (x.is_inf(), y.is_inf()) {
        (true, true) if x.is_negative() != y.is_negative() => Some(Float::nan()),
        (true, _) => Some(x.clone()),
        (false, true) => Some(y.clone()),
        (false, false) => None,
    }
}

fn signed_inf(negative: bool) -> Float {
    if negative {
        Float::neg_inf()
    } else {
        Float::pos_inf()
    }
}

impl Float {
    /// Round to `prec` bits.
    pub fn set_round(&self, prec: u64, rnd: Round) -> Result<Rounded, FloatError> {
        check_prec(prec)?;
        let Some(p) = self.parts() else {
            return Ok(Rounded::exact(self.clone()));
        };
        let r = round_limbs(p.mantissa, p.negative, prec, rnd);
        Ok(Rounded {
            value: Float::finite(p.negative, r.mantissa, p.exponent + r.shift),
            exact: r.exact,
        })
    }

    /// Product rounded to `prec` bits, using the default scratch provider.
    pub fn mul(&self, other: &Self, prec: u64, rnd: Round) -> Result<Rounded, FloatError> {
        self.mul_with(default_provider(), other, prec, rnd)
    }

    /// Product rounded to `prec` bits, drawing scratch space from `provider`.
    ///
    /// `0 * inf` and anything involving NaN give NaN; otherwise an infinite
    /// operand gives an infinity with the product's sign.
    pub fn mul_with<P: LimbProvider + ?Sized>(
        &self,
        provider: &P,
        other: &Self,
        prec: u64,
        rnd: Round,
    ) -> Result<Rounded, FloatError> {
        check_prec(prec)?;
        if let (Some(x), Some(y)) = (self.parts(), other.parts()) {
            return multiply_with(
                provider,
                x.mantissa,
                x.exponent,
                y.mantissa,
                y.exponent,
                x.negative ^ y.negative,
                prec,
                rnd,
            );
        }
        let value = if self.is_nan() || other.is_nan() {
            Float::nan()
        } else if self.is_inf() || other.is_inf() {
            if self.is_zero() || other.is_zero() {
                Float::nan()
            } else {
                signed_inf(self.is_negative() ^ other.is_negative())
            }
        } else {
            Float::zero()
        };
        Ok(Rounded::exact(value))
    }

    /// Exact product.
    pub fn mul_exact(&self, other: &Self) -> Result<Self, FloatError> {
        let prec = (self.bits() + other.bits()).max(1);
        self.mul(other, prec, Round::Down).map(|r| r.value)
    }

    /// Sum rounded to `prec` bits.
    pub fn add(&self, other: &Self, prec: u64, rnd: Round) -> Result<Rounded, FloatError> {
        check_prec(prec)?;
        if let Some(special) = add_special(self, other) {
            return Ok(Rounded::exact(special));
        }
        let (x, y) = match (self.parts(), other.parts()) {
            (Some(x), Some(y)) => (x, y),
            (Some(_), None) => return self.set_round(prec, rnd),
            (None, Some(_)) => return other.set_round(prec, rnd),
            (None, None) => return Ok(Rounded::exact(Float::zero())),
        };

        let (big, small) = if x.msb() >= y.msb() { (x, y) } else { (y, x) };
        let big = Term::from_parts(big);
        let mut small = Term::from_parts(small);

        // An operand entirely below the rounding position only contributes its
        // sign to the round and sticky bits, so collapse it to a single bit just
        // under the larger operand's last bit and the rounding position.
        let cutoff = big.exponent.clone().min(big.msb() - BigInt::from(prec)) - 2;
        if small.msb() < cutoff {
            small = Term {
                negative: small.negative,
                magnitude: BigUint::from(1u32),
                exponent: cutoff,
            };
        }

        Ok(match aligned_sum(big, small)? {
            Some(t) => round_magnitude(t.negative, &t.magnitude, t.exponent, prec, rnd),
            None => Rounded::exact(Float::zero()),
        })
    }

    /// Difference rounded to `prec` bits.
    pub fn sub(&self, other: &Self, prec: u64, rnd: Round) -> Result<Rounded, FloatError> {
        self.add(&other.neg(), prec, rnd)
    }

    /// Exact sum.
    ///
    /// Fails with [`FloatError::ExponentOverflow`] when the operands are so far
    /// apart that the exact result cannot be materialized.
    pub fn add_exact(&self, other: &Self) -> Result<Self, FloatError> {
        if let Some(special) = add_special(self, other) {
            return Ok(special);
        }
        let (x, y) = match (self.parts(), other.parts()) {
            (Some(x), Some(y)) => (x, y),
            (Some(_), None) => return Ok(self.clone()),
            (None, _) => return Ok(other.clone()),
        };
        Ok(
            match aligned_sum(Term::from_parts(x), Term::from_parts(y))? {
                Some(t) => Float::from_parts(t.negative, t.magnitude.to_u64_digits(), t.exponent),
                None => Float::zero(),
            },
        )
    }

    /// Exact difference.
    pub fn sub_exact(&self, other: &Self) -> Result<Self, FloatError> {
        self.add_exact(&other.neg())
    }

    /// Quotient rounded to `prec` bits.
    ///
    /// `x / 0` is a signed infinity for finite nonzero `x`; `0 / 0`,
    /// `inf / inf` and anything involving NaN give NaN.
    pub fn div(&self, other: &Self, prec: u64, rnd: Round) -> Result<Rounded, FloatError> {
        check_prec(prec)?;
        let (x, y) = match (self.parts(), other.parts()) {
            (Some(x), Some(y)) => (x, y),
            _ => return Ok(Rounded::exact(self.div_special(other))),
        };

        let negative = x.negative ^ y.negative;
        let (la, lb) = (x.mantissa.len() as u64, y.mantissa.len() as u64);
        // At least prec + 2 quotient bits so the remainder only feeds the sticky bit.
        let k = (prec + 2 + 64 * lb).saturating_sub(64 * la);
        let k_shift = usize::try_from(k).map_err(|_| FloatError::ExponentOverflow)?;
        let numerator = crate::limb::to_biguint(x.mantissa) << k_shift;
        let denominator = crate::limb::to_biguint(y.mantissa);
        let (mut q, r) = numerator.div_rem(&denominator);
        let mut exponent = x.exponent - y.exponent - BigInt::from(k);
        if !r.is_zero() {
            q = (q << 1u32) + 1u32;
            exponent -= 1;
        }
        let mut rounded = round_magnitude(negative, &q, exponent, prec, rnd);
        rounded.exact &= r.is_zero();
        Ok(rounded)
    }

    fn div_special(&self, other: &Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Float::nan();
        }
        let negative = self.is_negative() ^ other.is_negative();
        match (self.is_inf(), other.is_inf()) {
            (true, true) => Float::nan(),
            (true, false) => signed_inf(negative),
            (false, true) => Float::zero(),
            (false, false) => {
                if self.is_zero() {
                    if other.is_zero() {
                        Float::nan()
                    } else {
                        Float::zero()
                    }
                } else {
                    signed_inf(self.is_negative())
                }
            }
        }
    }
}
