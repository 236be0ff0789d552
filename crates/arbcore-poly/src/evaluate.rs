//! Fast multipoint evaluation by a top-down remainder sweep.
//!
//! The polynomial is first reduced modulo the blocks of one tree level, then
//! each remainder is reduced modulo the two children of its block, level by
//! level, until the leaves leave one value per point. Every step uses ball
//! arithmetic, so each value is a rigorous enclosure.

use arbcore_ball::Ball;
use rayon::prelude::*;

use crate::constants::PARALLEL_POINTS_THRESHOLD;
use crate::error::PolyError;
use crate::poly::{horner, rem_slices, BallPoly};
use crate::tree::SubproductTree;

/// Remainder for the top-down sweep, with the closed form for a linear
/// dividend against a leaf `[b0, 1]`: `r0 = a0 - a1 b0`.
fn rem_step(a: &[Ball], b: &[Ball], prec: u64) -> Result<Vec<Ball>, PolyError> {
    if let ([a0, a1], [b0, _]) = (a, b) {
        return Ok(vec![a0.sub(&a1.mul(b0, prec)?, prec)?]);
    }
    rem_slices(a, b, prec)
}

/// `floor(log2 n)` for `n >= 1`.
fn flog2(n: usize) -> usize {
    (usize::BITS - 1 - n.leading_zeros()) as usize
}

/// Remainders of `poly` modulo every block of level `height`, concatenated.
fn reduce_blocks(
    poly: &[Ball],
    tree: &SubproductTree,
    height: usize,
    prec: u64,
    parallel: bool,
) -> Result<Vec<Ball>, PolyError> {
    let reduce = |k: usize| rem_slices(poly, tree.block(height, k).unwrap_or(&[]), prec);
    let blocks = 0..tree.block_count(height);
    let parts: Vec<Vec<Ball>> = if parallel {
        blocks.into_par_iter().map(reduce).collect::<Result<_, _>>()?
    } else {
        blocks.map(reduce).collect::<Result<_, _>>()?
    };
    Ok(parts.concat())
}

/// One step down the tree: split each remainder of level `h + 1` into the
/// remainders modulo its two children at level `h`.
fn split_level(
    t: &[Ball],
    tree: &SubproductTree,
    h: usize,
    prec: u64,
    parallel: bool,
) -> Result<Vec<Ball>, PolyError> {
    let pow = 1usize << h;
    let split = |(k, chunk): (usize, &[Ball])| -> Result<Vec<Ball>, PolyError> {
        if chunk.len() <= pow {
            return Ok(chunk.to_vec());
        }
        let left = tree.block(h, 2 * k).unwrap_or(&[]);
        let right = tree.block(h, 2 * k + 1).unwrap_or(&[]);
        let mut out = rem_step(chunk, left, prec)?;
        out.extend(rem_step(chunk, right, prec)?);
        Ok(out)
    };
    let parts: Vec<Vec<Ball>> = if parallel {
        t.par_chunks(2 * pow)
            .enumerate()
            .map(split)
            .collect::<Result<_, _>>()?
    } else {
        t.chunks(2 * pow).enumerate().map(split).collect::<Result<_, _>>()?
    };
    Ok(parts.concat())
}

/// Write `poly(x_i)` for every point of `tree` into `values`.
pub fn evaluate_vec_fast_precomp_into(
    values: &mut [Ball],
    poly: &[Ball],
    tree: &SubproductTree,
    prec: u64,
) -> Result<(), PolyError> {
    let len = tree.len();
    if values.len() != len {
        return Err(PolyError::LengthMismatch {
            expected: len,
            actual: values.len(),
        });
    }
    let plen = poly.len();

    if len < 2 || plen < 2 {
        if len == 1 {
            let x = tree.level(0)[0].neg();
            values[0] = horner(poly, &x, prec)?;
        } else if plen == 0 {
            values.fill(Ball::zero());
        } else if plen == 1 {
            values.fill(poly[0].clone());
        }
        return Ok(());
    }

    // Start at the highest level whose blocks do not exceed deg(poly),
    // below the root so each block has a sibling to split against.
    let height = flog2(plen - 1).min(tree.height() - 1);
    let parallel = len >= PARALLEL_POINTS_THRESHOLD;
    let mut t = reduce_blocks(poly, tree, height, prec, parallel)?;
    debug_assert_eq!(t.len(), len);

    for h in (0..height).rev() {
        t = split_level(&t, tree, h, prec, parallel)?;
    }

    values.clone_from_slice(&t);
    Ok(())
}

/// `poly(x_i)` for every point of a prebuilt tree.
pub fn evaluate_vec_fast_precomp(
    poly: &[Ball],
    tree: &SubproductTree,
    prec: u64,
) -> Result<Vec<Ball>, PolyError> {
    let mut values = vec![Ball::zero(); tree.len()];
    evaluate_vec_fast_precomp_into(&mut values, poly, tree, prec)?;
    Ok(values)
}

/// `poly(x_i)` for every point, building the subproduct tree first.
pub fn evaluate_vec_fast(poly: &[Ball], points: &[Ball], prec: u64) -> Result<Vec<Ball>, PolyError> {
    let tree = SubproductTree::build(points, prec)?;
    evaluate_vec_fast_precomp(poly, &tree, prec)
}

/// Evaluate `poly` at every point. The result has one ball per point.
///
/// ```
/// use arbcore_ball::Ball;
/// use arbcore_poly::{evaluate_many, BallPoly};
///
/// let p = BallPoly::from_i64s(&[1, 0, 1]); // 1 + x^2
/// let points: Vec<Ball> = (0..4).map(Ball::from_i64).collect();
/// let values = evaluate_many(&p, &points, 64).unwrap();
/// assert_eq!(values[3], Ball::from_i64(10));
/// ```
pub fn evaluate_many(poly: &BallPoly, points: &[Ball], prec: u64) -> Result<Vec<Ball>, PolyError> {
    evaluate_vec_fast(poly.coeffs(), points, prec)
}

impl BallPoly {
    /// Values at each point via the subproduct tree.
    pub fn evaluate_vec_fast(&self, points: &[Ball], prec: u64) -> Result<Vec<Ball>, PolyError> {
        evaluate_vec_fast(self.coeffs(), points, prec)
    }
}
