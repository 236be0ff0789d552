//! # arbcore-float
//!
//! Arbitrary-precision binary floating-point values with explicit rounding.
//!
//! A [`Float`] is a special value (zero, ±infinity, NaN) or a signed mantissa
//! of 64-bit limbs times a power of two with a `BigInt` exponent. Every
//! inexact operation takes a target precision in bits and a [`Round`] mode and
//! reports whether the result is exact.
//!
//! ```
//! use arbcore_float::{Float, Round};
//!
//! let x = Float::from_u64(3);
//! let y = Float::from_u64(5);
//! let z = x.mul(&y, 2, Round::Down).unwrap();
//! assert_eq!(z.value, Float::from_u64(12));
//! assert!(!z.exact);
//! ```

mod arith;
pub mod constants;
pub mod error;
mod float;
pub mod limb;
pub mod mul;
pub mod round;

pub use constants::{LIMB_BITS, MUL_BASECASE_LIMIT};
pub use error::FloatError;
pub use float::Float;
pub use mul::{multiply, multiply_with, Rounded};
pub use round::{round_limbs, Round, RoundedLimbs};
