//! The `Float` value type: representation, constructors and comparisons.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::{BigInt, Sign};
use num_traits::{Signed, ToPrimitive};

use crate::constants::LIMB_HIGH_BIT;
use crate::limb;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Repr {
    Zero,
    PosInf,
    NegInf,
    Nan,
    Finite {
        negative: bool,
        mantissa: Vec<u64>,
        exponent: BigInt,
    },
}

/// Arbitrary-precision binary floating-point value.
///
/// A finite nonzero value is `±M * 2^exponent` where `M` is the integer held
/// by the little-endian limbs of the mantissa. Mantissas are kept canonical:
/// the top limb has its top bit set and the lowest limb is nonzero, so two
/// values are equal exactly when their representations are. Note that this
/// makes `NaN == NaN`; use [`Float::cmp_value`] for numeric comparisons.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Float {
    repr: Repr,
}

/// Borrowed view of a finite nonzero value.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Parts<'a> {
    pub negative: bool,
    pub mantissa: &'a [u64],
    pub exponent: &'a BigInt,
}

impl Parts<'_> {
    /// Bit position of the most significant bit.
    pub fn msb(&self) -> BigInt {
        self.exponent + BigInt::from(64 * self.mantissa.len()) - 1
    }
}

impl Float {
    /// Zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self { repr: Repr::Zero }
    }

    /// Positive infinity.
    #[must_use]
    pub const fn pos_inf() -> Self {
        Self { repr: Repr::PosInf }
    }

    /// Negative infinity.
    #[must_use]
    pub const fn neg_inf() -> Self {
        Self { repr: Repr::NegInf }
    }

    /// Not-a-number.
    #[must_use]
    pub const fn nan() -> Self {
        Self { repr: Repr::Nan }
    }

    /// One.
    #[must_use]
    pub fn one() -> Self {
        Self::pow2(0)
    }

    /// `2^exp`.
    #[must_use]
    pub fn pow2(exp: impl Into<BigInt>) -> Self {
        let exp: BigInt = exp.into();
        Self::finite(false, vec![LIMB_HIGH_BIT], exp - 63)
    }

    /// Build from an already normalized mantissa.
    pub(crate) fn finite(negative: bool, mantissa: Vec<u64>, exponent: BigInt) -> Self {
        debug_assert!(mantissa.last().is_some_and(|&t| t & LIMB_HIGH_BIT != 0));
        debug_assert!(mantissa.first().is_some_and(|&l| l != 0));
        Self {
            repr: Repr::Finite {
                negative,
                mantissa,
                exponent,
            },
        }
    }

    /// `±limbs * 2^exponent` for arbitrary (possibly unnormalized or zero) limbs.
    #[must_use]
    pub fn from_parts(negative: bool, mut limbs: Vec<u64>, exponent: impl Into<BigInt>) -> Self {
        while limbs.last() == Some(&0) {
            limbs.pop();
        }
        let Some(&top) = limbs.last() else {
            return Self::zero();
        };
        let lz = top.leading_zeros();
        limb::shl_in_place(&mut limbs, lz);
        let tz = limb::trailing_zero_limbs(&limbs);
        limbs.drain(..tz);
        let exponent: BigInt = exponent.into();
        let exponent = exponent - i64::from(lz) + BigInt::from(64 * tz);
        Self::finite(negative, limbs, exponent)
    }

    /// Exact conversion from `u64`.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self::from_parts(false, vec![value], 0)
    }

    /// Exact conversion from `i64`.
    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        Self::from_parts(value < 0, vec![value.unsigned_abs()], 0)
    }

    /// Exact conversion from a `BigInt`.
    #[must_use]
    pub fn from_bigint(value: &BigInt) -> Self {
        Self::from_bigint_2exp(value, 0)
    }

    /// Exact value `value * 2^exp`.
    #[must_use]
    pub fn from_bigint_2exp(value: &BigInt, exp: impl Into<BigInt>) -> Self {
        Self::from_parts(value.is_negative(), value.magnitude().to_u64_digits(), exp)
    }

    /// Exact conversion from `f64` (NaN and infinities map to the specials).
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::nan();
        }
        if value.is_infinite() {
            return if value > 0.0 { Self::pos_inf() } else { Self::neg_inf() };
        }
        if value == 0.0 {
            return Self::zero();
        }
        let bits = value.to_bits();
        let negative = bits >> 63 == 1;
        let biased = ((bits >> 52) & 0x7ff) as i64;
        let fraction = bits & ((1u64 << 52) - 1);
        let (mantissa, exp) = if biased == 0 {
            (fraction, -1074)
        } else {
            (fraction | (1u64 << 52), biased - 1075)
        };
        Self::from_parts(negative, vec![mantissa], exp)
    }

    pub(crate) fn parts(&self) -> Option<Parts<'_>> {
        match &self.repr {
            Repr::Finite {
                negative,
                mantissa,
                exponent,
            } => Some(Parts {
                negative: *negative,
                mantissa,
                exponent,
            }),
            _ => None,
        }
    }

    /// Whether the value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self.repr, Repr::Zero)
    }

    /// Whether the value is NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        matches!(self.repr, Repr::Nan)
    }

    /// Whether the value is an infinity.
    #[must_use]
    pub fn is_inf(&self) -> bool {
        matches!(self.repr, Repr::PosInf | Repr::NegInf)
    }

    /// Whether the value is zero or finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        matches!(self.repr, Repr::Zero | Repr::Finite { .. })
    }

    /// Whether the value is zero, infinite or NaN.
    #[must_use]
    pub fn is_special(&self) -> bool {
        !matches!(self.repr, Repr::Finite { .. })
    }

    /// Whether the value is strictly negative (including `-inf`).
    #[must_use]
    pub fn is_negative(&self) -> bool {
        match &self.repr {
            Repr::NegInf => true,
            Repr::Finite { negative, .. } => *negative,
            _ => false,
        }
    }

    /// Whether the value is exactly one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.parts().is_some_and(|p| {
            !p.negative && p.mantissa == [LIMB_HIGH_BIT] && *p.exponent == BigInt::from(-63)
        })
    }

    /// Mantissa limbs of a finite nonzero value.
    #[must_use]
    pub fn mantissa(&self) -> Option<&[u64]> {
        self.parts().map(|p| p.mantissa)
    }

    /// Exponent of a finite nonzero value.
    #[must_use]
    pub fn exponent(&self) -> Option<&BigInt> {
        self.parts().map(|p| p.exponent)
    }

    /// Number of significant bits of a finite nonzero value (zero otherwise).
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.parts().map_or(0, |p| {
            64 * p.mantissa.len() as u64 - u64::from(p.mantissa[0].trailing_zeros())
        })
    }

    /// Position of the most significant bit: `2^msb <= |x| < 2^(msb+1)`.
    #[must_use]
    pub fn msb(&self) -> Option<BigInt> {
        self.parts().map(|p| p.msb())
    }

    /// Negation.
    #[must_use]
    pub fn neg(&self) -> Self {
        let repr = match &self.repr {
            Repr::PosInf => Repr::NegInf,
            Repr::NegInf => Repr::PosInf,
            Repr::Finite {
                negative,
                mantissa,
                exponent,
            } => Repr::Finite {
                negative: !negative,
                mantissa: mantissa.clone(),
                exponent: exponent.clone(),
            },
            other => other.clone(),
        };
        Self { repr }
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        if self.is_negative() {
            self.neg()
        } else {
            self.clone()
        }
    }

    /// Exact multiplication by `2^exp`.
    #[must_use]
    pub fn mul_2exp(&self, exp: impl Into<BigInt>) -> Self {
        let exp: BigInt = exp.into();
        match &self.repr {
            Repr::Finite {
                negative,
                mantissa,
                exponent,
            } => Self::finite(*negative, mantissa.clone(), exponent + exp),
            _ => self.clone(),
        }
    }

    /// Exact value as `(m, e)` with value `m * 2^e`, for finite nonzero values.
    #[must_use]
    pub fn to_bigint_2exp(&self) -> Option<(BigInt, BigInt)> {
        self.parts().map(|p| {
            let sign = if p.negative { Sign::Minus } else { Sign::Plus };
            (
                BigInt::from_biguint(sign, limb::to_biguint(p.mantissa)),
                p.exponent.clone(),
            )
        })
    }

    /// Nearest-ish `f64` approximation (truncated to the top limb).
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match &self.repr {
            Repr::Zero => 0.0,
            Repr::PosInf => f64::INFINITY,
            Repr::NegInf => f64::NEG_INFINITY,
            Repr::Nan => f64::NAN,
            Repr::Finite {
                negative,
                mantissa,
                exponent,
            } => {
                let top = mantissa[mantissa.len() - 1];
                let scale = exponent + BigInt::from(64 * (mantissa.len() - 1));
                #[allow(clippy::cast_precision_loss)]
                let magnitude = match scale.to_i64() {
                    Some(e) => scale_2exp(top as f64, e),
                    None if scale.is_negative() => 0.0,
                    None => f64::INFINITY,
                };
                if *negative {
                    -magnitude
                } else {
                    magnitude
                }
            }
        }
    }

    /// Compare magnitudes of two finite values (zero is smallest).
    ///
    /// Returns `None` if either value is infinite or NaN.
    #[must_use]
    pub fn cmp_abs(&self, other: &Self) -> Option<Ordering> {
        match (&self.repr, &other.repr) {
            (Repr::Zero, Repr::Zero) => Some(Ordering::Equal),
            (Repr::Zero, Repr::Finite { .. }) => Some(Ordering::Less),
            (Repr::Finite { .. }, Repr::Zero) => Some(Ordering::Greater),
            (Repr::Finite { .. }, Repr::Finite { .. }) => {
                let (a, b) = (self.parts()?, other.parts()?);
                Some(cmp_abs_parts(a, b))
            }
            _ => None,
        }
    }

    /// Numeric comparison; `None` if either value is NaN.
    #[must_use]
    pub fn cmp_value(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        let (ra, rb) = (self.rank(), other.rank());
        if ra != rb {
            return Some(ra.cmp(&rb));
        }
        match (self.parts(), other.parts()) {
            (Some(a), Some(b)) => {
                let ord = cmp_abs_parts(a, b);
                Some(if a.negative { ord.reverse() } else { ord })
            }
            _ => Some(Ordering::Equal),
        }
    }

    fn rank(&self) -> i8 {
        match &self.repr {
            Repr::NegInf => -2,
            Repr::Finite { negative: true, .. } => -1,
            Repr::Zero | Repr::Nan => 0,
            Repr::Finite {
                negative: false, ..
            } => 1,
            Repr::PosInf => 2,
        }
    }
}

fn cmp_abs_parts(a: Parts<'_>, b: Parts<'_>) -> Ordering {
    let by_msb = a.msb().cmp(&b.msb());
    if by_msb != Ordering::Equal {
        return by_msb;
    }
    // Both mantissas are left-aligned at the same msb: compare from the top,
    // padding the shorter one with zero limbs.
    let (la, lb) = (a.mantissa.len(), b.mantissa.len());
    for i in 1..=la.max(lb) {
        let x = if i <= la { a.mantissa[la - i] } else { 0 };
        let y = if i <= lb { b.mantissa[lb - i] } else { 0 };
        match x.cmp(&y) {
            Ordering::Equal => {}
            ord => return ord,
        }
    }
    Ordering::Equal
}

/// `value * 2^exp` in `f64`, scaling in steps to avoid spurious overflow.
fn scale_2exp(mut value: f64, mut exp: i64) -> f64 {
    const STEP: i64 = 1000;
    while exp > STEP && value.is_finite() {
        value *= 2f64.powi(1000);
        exp -= STEP;
    }
    while exp < -STEP && value != 0.0 {
        value *= 2f64.powi(-1000);
        exp += STEP;
    }
    #[allow(clippy::cast_possible_truncation)]
    let last = 2f64.powi(exp as i32);
    value * last
}

impl Default for Float {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialOrd for Float {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.cmp_value(other)
    }
}

impl From<i64> for Float {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<u64> for Float {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Zero => f.write_str("0"),
            Repr::PosInf => f.write_str("+inf"),
            Repr::NegInf => f.write_str("-inf"),
            Repr::Nan => f.write_str("nan"),
            Repr::Finite { .. } => {
                let approx = self.to_f64();
                if approx.is_finite() && approx != 0.0 {
                    write!(f, "{approx:e}")
                } else {
                    let (m, e) = self.to_bigint_2exp().unwrap_or_default();
                    let tz = m.trailing_zeros().unwrap_or(0);
                    write!(f, "{}*2^{}", m >> tz, e + tz)
                }
            }
        }
    }
}
