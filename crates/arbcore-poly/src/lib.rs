//! # arbcore-poly
//!
//! Polynomials with ball coefficients and fast multipoint evaluation.
//!
//! [`evaluate_many`] builds a [`SubproductTree`] over the points and reduces
//! the polynomial modulo its blocks from the top down, which takes
//! `O(n log^2 n)` ball operations instead of the `O(n^2)` of one Horner pass
//! per point. Large batches spread the remainder work of each level over the
//! rayon thread pool. Any failing ball operation aborts the whole batch.

pub mod constants;
pub mod error;
pub mod evaluate;
pub mod poly;
pub mod tree;

pub use constants::PARALLEL_POINTS_THRESHOLD;
pub use error::PolyError;
pub use evaluate::{
    evaluate_many, evaluate_vec_fast, evaluate_vec_fast_precomp, evaluate_vec_fast_precomp_into,
};
pub use poly::BallPoly;
pub use tree::SubproductTree;
