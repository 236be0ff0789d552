//! Correctly rounded multiplication of raw mantissas.
//!
//! The full double-width product is formed in a scratch buffer obtained from
//! a [`LimbProvider`], then rounded to the target precision. The exponent of
//! the result is the sum of the input exponents plus the number of bits the
//! rounding step discarded.

use arbcore_memory::{default_provider, with_scratch, LimbProvider};
use num_bigint::BigInt;
use tracing::trace;

use crate::constants::LIMB_HIGH_BIT;
use crate::error::{check_prec, FloatError};
use crate::float::Float;
use crate::limb;
use crate::round::{round_limbs, Round};

/// A rounded result and whether it is exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rounded {
    /// The rounded value.
    pub value: Float,
    /// True iff no nonzero bits were discarded.
    pub exact: bool,
}

impl Rounded {
    /// Wrap a value that needed no rounding.
    #[must_use]
    pub fn exact(value: Float) -> Self {
        Self { value, exact: true }
    }

    /// Upper bound on `|value - true result|` for a result rounded to `prec` bits.
    ///
    /// Zero when exact, otherwise one unit in the last place of `value`:
    /// `2^(msb(value) - prec + 1)`.
    #[must_use]
    pub fn error_bound(&self, prec: u64) -> Float {
        if self.exact {
            return Float::zero();
        }
        match self.value.msb() {
            Some(msb) => Float::pow2(msb - BigInt::from(prec) + 1),
            None => Float::zero(),
        }
    }
}

fn check_mantissa(man: &[u64]) -> Result<(), FloatError> {
    match man.last() {
        None => Err(FloatError::EmptyMantissa),
        Some(&top) if top & LIMB_HIGH_BIT == 0 => Err(FloatError::UnnormalizedMantissa(top)),
        Some(_) => Ok(()),
    }
}

/// Multiply two normalized mantissas with exponents and round the product.
///
/// Both mantissas must be nonempty with the top bit of their top limb set;
/// zero, infinite and NaN operands are the caller's business. The sign of the
/// result is `negative`.
pub fn multiply(
    xman: &[u64],
    xexp: &BigInt,
    yman: &[u64],
    yexp: &BigInt,
    negative: bool,
    prec: u64,
    rnd: Round,
) -> Result<Rounded, FloatError> {
    multiply_with(default_provider(), xman, xexp, yman, yexp, negative, prec, rnd)
}

/// [`multiply`] with an explicit scratch provider.
#[allow(clippy::too_many_arguments)]
pub fn multiply_with<P: LimbProvider + ?Sized>(
    provider: &P,
    xman: &[u64],
    xexp: &BigInt,
    yman: &[u64],
    yexp: &BigInt,
    negative: bool,
    prec: u64,
    rnd: Round,
) -> Result<Rounded, FloatError> {
    check_mantissa(xman)?;
    check_mantissa(yman)?;
    check_prec(prec)?;

    // Keep the shorter operand second so a one-limb factor takes the cheap path.
    let (xman, yman) = if yman.len() > xman.len() {
        (yman, xman)
    } else {
        (xman, yman)
    };
    let (xn, yn) = (xman.len(), yman.len());
    let zn = xn + yn;
    trace!(xn, yn, prec, rounding = %rnd, "multiply");

    let rounded = with_scratch(provider, zn, |tmp| {
        let used = if yn == 1 {
            let carry = limb::mul_1(&mut tmp[..xn], xman, yman[0]);
            tmp[zn - 1] = carry;
            zn - usize::from(carry == 0)
        } else {
            limb::mul(tmp, xman, yman);
            zn - usize::from(tmp[zn - 1] == 0)
        };
        round_limbs(&tmp[..used], negative, prec, rnd)
    });

    let exponent = xexp + yexp + rounded.shift;
    Ok(Rounded {
        value: Float::finite(negative, rounded.mantissa, exponent),
        exact: rounded.exact,
    })
}

#[cfg(test)]
mod tests {
    use arbcore_memory::{HeapProvider, SharedCacheProvider, Tier, TierPolicy};
    use num_bigint::{BigUint, Sign};

    use super::*;

    fn normalized(limbs: &[u64]) -> Float {
        Float::from_parts(false, limbs.to_vec(), 0)
    }

    fn mul_floats(x: &Float, y: &Float, prec: u64, rnd: Round) -> Rounded {
        multiply(
            x.mantissa().unwrap(),
            x.exponent().unwrap(),
            y.mantissa().unwrap(),
            y.exponent().unwrap(),
            x.is_negative() ^ y.is_negative(),
            prec,
            rnd,
        )
        .unwrap()
    }

    #[test]
    fn small_exact_product() {
        let r = mul_floats(&Float::from_u64(6), &Float::from_u64(7), 64, Round::Nearest);
        assert!(r.exact);
        assert_eq!(r.value, Float::from_u64(42));
        assert!(r.error_bound(64).is_zero());
    }

    #[test]
    fn inexact_product_rounds_each_way() {
        // 7 * 9 = 63 = 0b111111; at 3 bits truncation gives 56, rounding up 64.
        let x = Float::from_u64(7);
        let y = Float::from_u64(9);
        assert_eq!(mul_floats(&x, &y, 3, Round::Down).value, Float::from_u64(56));
        assert_eq!(mul_floats(&x, &y, 3, Round::Up).value, Float::from_u64(64));
        assert_eq!(mul_floats(&x, &y, 3, Round::Nearest).value, Float::from_u64(64));
        let neg = Float::from_i64(-7);
        assert_eq!(mul_floats(&neg, &y, 3, Round::Floor).value, Float::from_i64(-64));
        assert_eq!(mul_floats(&neg, &y, 3, Round::Ceil).value, Float::from_i64(-56));
    }

    #[test]
    fn exponents_add() {
        let x = Float::from_u64(3).mul_2exp(100);
        let y = Float::from_u64(5).mul_2exp(-250);
        let r = mul_floats(&x, &y, 64, Round::Nearest);
        assert_eq!(r.value, Float::from_u64(15).mul_2exp(-150));
    }

    #[test]
    fn result_has_prec_bits() {
        let x = normalized(&[u64::MAX, u64::MAX, u64::MAX]);
        let y = normalized(&[0x1234_5678_9abc_def1, 0xfedc_ba98_7654_3211]);
        for prec in [1u64, 10, 64, 100, 200] {
            let r = mul_floats(&x, &y, prec, Round::Down);
            assert!(!r.exact);
            assert!(r.value.bits() <= prec);
        }
    }

    #[test]
    fn exact_flag_matches_discarded_bits() {
        let x = Float::from_u64(0xffff_ffff);
        let y = Float::from_u64(0xffff_ffff);
        // (2^32 - 1)^2 has 64 significant bits and ends in ...0001.
        assert!(mul_floats(&x, &y, 64, Round::Down).exact);
        assert!(!mul_floats(&x, &y, 63, Round::Down).exact);
    }

    #[test]
    fn error_bound_covers_rounding() {
        let x = Float::from_u64(7);
        let y = Float::from_u64(9);
        let r = mul_floats(&x, &y, 3, Round::Down);
        // 63 -> 56, ulp at 3 bits of 56 is 8.
        assert_eq!(r.error_bound(3), Float::from_u64(8));
    }

    #[test]
    fn rejects_bad_input() {
        let one = [LIMB_HIGH_BIT];
        let e = BigInt::from(0);
        assert_eq!(
            multiply(&[], &e, &one, &e, false, 64, Round::Down),
            Err(FloatError::EmptyMantissa)
        );
        assert_eq!(
            multiply(&[1], &e, &one, &e, false, 64, Round::Down),
            Err(FloatError::UnnormalizedMantissa(1))
        );
        assert_eq!(
            multiply(&one, &e, &one, &e, false, 0, Round::Down),
            Err(FloatError::InvalidPrecision(0))
        );
    }

    #[test]
    fn same_result_across_scratch_tiers() {
        let xman: Vec<u64> = (0..3000u64)
            .map(|i| i.wrapping_mul(0x9e37_79b9_7f4a_7c15) | 1)
            .map(|l| l | LIMB_HIGH_BIT)
            .collect();
        let yman = [0xdead_beef_0000_0001, 7, LIMB_HIGH_BIT | 3];
        let e = BigInt::from(-17);

        let shared = SharedCacheProvider::with_policy(TierPolicy {
            stack_limit: 0,
            cache_limit: 10_000,
        });
        assert_eq!(shared.acquire(3003).tier(), Tier::Cached);

        let heap = multiply_with(&HeapProvider, &xman, &e, &yman, &e, true, 64, Round::Nearest)
            .unwrap();
        let cached =
            multiply_with(&shared, &xman, &e, &yman, &e, true, 64, Round::Nearest).unwrap();
        let default = multiply(&xman, &e, &yman, &e, true, 64, Round::Nearest).unwrap();
        assert_eq!(heap, cached);
        assert_eq!(heap, default);
        assert!(heap.value.bits() <= 64);
    }

    #[test]
    fn wide_product_matches_biguint() {
        let xman: Vec<u64> = (1..=50u64).map(|i| i.wrapping_mul(0xc2b2_ae3d_27d4_eb4f)).chain([LIMB_HIGH_BIT]).collect();
        let yman: Vec<u64> = (1..=40u64).map(|i| i.wrapping_mul(0x1656_67b1_9e37_79f9)).chain([LIMB_HIGH_BIT | 5]).collect();
        let e = BigInt::from(0);
        let prec = 64 * 92;
        let r = multiply(&xman, &e, &yman, &e, false, prec, Round::Down).unwrap();
        assert!(r.exact);
        let expected = limb::to_biguint(&xman) * limb::to_biguint(&yman);
        let (m, exp) = r.value.to_bigint_2exp().unwrap();
        let m: BigUint = m.to_biguint().unwrap();
        // m * 2^exp == expected, with exp of either sign.
        let shift = usize::try_from(exp.magnitude()).unwrap();
        if exp.sign() == Sign::Minus {
            assert_eq!(m, expected << shift);
        } else {
            assert_eq!(m << shift, expected);
        }
    }
}
