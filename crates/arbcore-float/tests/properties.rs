//! Property-based tests for the rounded float operations.
//!
//! Each rounded operation is checked against the exact result rounded once.

use std::cmp::Ordering;

use num_bigint::BigInt;
use proptest::prelude::*;

use arbcore_float::{Float, Round};

fn float_strategy() -> impl Strategy<Value = Float> {
    (
        any::<bool>(),
        prop::collection::vec(any::<u64>(), 1..5),
        -300i64..300,
    )
        .prop_map(|(neg, limbs, exp)| Float::from_parts(neg, limbs, exp))
}

fn round_strategy() -> impl Strategy<Value = Round> {
    prop::sample::select(Round::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Rounded multiplication equals the exact product rounded once.
    #[test]
    fn mul_is_correctly_rounded(
        x in float_strategy(),
        y in float_strategy(),
        prec in 1u64..300,
        rnd in round_strategy(),
    ) {
        let fast = x.mul(&y, prec, rnd).unwrap();
        let exact = x.mul_exact(&y).unwrap();
        let slow = exact.set_round(prec, rnd).unwrap();
        prop_assert_eq!(&fast, &slow);
        prop_assert!(fast.value.bits() <= prec);
    }

    /// The exact product agrees with `BigInt` arithmetic.
    #[test]
    fn mul_exact_matches_bigint(x in float_strategy(), y in float_strategy()) {
        let (mx, ex) = x.to_bigint_2exp().unwrap();
        let (my, ey) = y.to_bigint_2exp().unwrap();
        let (mp, ep) = x.mul_exact(&y).unwrap().to_bigint_2exp().unwrap();
        prop_assert_eq!(Float::from_bigint_2exp(&(mx * my), ex + ey), Float::from_bigint_2exp(&mp, ep));
    }

    /// Rounded addition equals the exact sum rounded once.
    #[test]
    fn add_is_correctly_rounded(
        x in float_strategy(),
        y in float_strategy(),
        shift in -2000i64..2000,
        prec in 1u64..200,
        rnd in round_strategy(),
    ) {
        let y = y.mul_2exp(shift);
        let fast = x.add(&y, prec, rnd).unwrap();
        let slow = x.add_exact(&y).unwrap().set_round(prec, rnd).unwrap();
        prop_assert_eq!(fast, slow);
    }

    /// Directed rounding brackets the exact result.
    #[test]
    fn floor_and_ceil_bracket(x in float_strategy(), y in float_strategy(), prec in 1u64..128) {
        let exact = x.mul_exact(&y).unwrap();
        let lo = x.mul(&y, prec, Round::Floor).unwrap().value;
        let hi = x.mul(&y, prec, Round::Ceil).unwrap().value;
        prop_assert_ne!(lo.cmp_value(&exact), Some(Ordering::Greater));
        prop_assert_ne!(hi.cmp_value(&exact), Some(Ordering::Less));
    }

    /// Quotients rounded down and up bracket the dividend when multiplied back.
    #[test]
    fn div_brackets_dividend(x in float_strategy(), y in float_strategy(), prec in 2u64..200) {
        let (x, y) = (x.abs(), y.abs());
        let lo = x.div(&y, prec, Round::Down).unwrap();
        let hi = x.div(&y, prec, Round::Up).unwrap();
        let lo_back = lo.value.mul_exact(&y).unwrap();
        let hi_back = hi.value.mul_exact(&y).unwrap();
        prop_assert_ne!(lo_back.cmp_value(&x), Some(Ordering::Greater));
        prop_assert_ne!(hi_back.cmp_value(&x), Some(Ordering::Less));
        prop_assert_eq!(lo.exact, hi.exact);
        if lo.exact {
            prop_assert_eq!(lo.value, hi.value);
        }
    }

    /// The reported error bound covers the rounding error.
    #[test]
    fn error_bound_is_sound(x in float_strategy(), y in float_strategy(), prec in 1u64..128) {
        let exact = x.mul_exact(&y).unwrap();
        let r = x.mul(&y, prec, Round::Nearest).unwrap();
        let err = r.value.sub_exact(&exact).unwrap().abs();
        prop_assert_ne!(err.cmp_value(&r.error_bound(prec)), Some(Ordering::Greater));
    }
}

#[test]
fn exponent_is_unbounded() {
    let huge = Float::pow2(BigInt::from(1u64 << 62) * BigInt::from(1u64 << 62));
    let r = huge.mul(&huge, 10, Round::Nearest).unwrap();
    let expected = BigInt::from(1u64 << 62) * BigInt::from(1u64 << 62) * 2;
    assert_eq!(r.value.msb(), Some(expected));
}
