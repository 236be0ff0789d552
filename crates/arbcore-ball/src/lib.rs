//! # arbcore-ball
//!
//! Ball arithmetic: every value is a midpoint [`Float`](arbcore_float::Float)
//! with a radius bounding the distance to the true result. Operations round
//! the midpoint and push all rounding and propagated error into the radius,
//! so a computed ball always contains the exact answer.
//!
//! The [`cache`] module keeps precision-indexed enclosures of e, pi and
//! log 2 that are computed once and reused by later, less precise requests.
//!
//! ```
//! use arbcore_ball::{ball_binary_op, Ball, BinaryOp};
//!
//! let third = ball_binary_op(BinaryOp::Div, &Ball::one(), &Ball::from_u64(3), 64).unwrap();
//! assert!(!third.is_exact());
//! ```

pub mod ball;
pub mod cache;
pub mod constants;
pub mod error;
pub mod evaluator;
pub mod ops;

pub use ball::Ball;
pub use cache::{get_cached_constant, global, CachedConstant, ConstantCache};
pub use constants::{CONSTANT_GUARD_BITS, RAD_PREC};
pub use error::BallError;
pub use evaluator::{clog2, ConstantEvaluator, ConstantId, EulerSeries, Log2Series, MachinSeries};
pub use ops::{ball_binary_op, BinaryOp};
