//! Subproduct tree over a set of evaluation points.
//!
//! All levels live in one arena. Level `h` is a run of monic blocks of
//! `2^h + 1` coefficients, each the product of the `2^h` factors `(x - x_i)`
//! below it; when `n` is not a multiple of `2^h` the last block is shorter,
//! with `n mod 2^h + 1` coefficients. Level 0 holds the leaves `[-x_i, 1]` and
//! level `ceil(log2 n)` holds the product of all factors.

use arbcore_ball::{clog2, Ball};
use tracing::debug;

use crate::error::PolyError;
use crate::poly::mul_monic_into;

/// Product tree of `(x - x_i)` factors.
#[derive(Debug, Clone)]
pub struct SubproductTree {
    data: Vec<Ball>,
    offsets: Vec<usize>,
    len: usize,
    prec: u64,
}

/// Number of blocks at a level whose blocks span `width` points.
fn block_count(len: usize, width: usize) -> usize {
    len.div_ceil(width)
}

impl SubproductTree {
    /// Build the tree for `points` at `prec` bits.
    pub fn build(points: &[Ball], prec: u64) -> Result<Self, PolyError> {
        let len = points.len();
        if len == 0 {
            return Ok(Self {
                data: Vec::new(),
                offsets: Vec::new(),
                len,
                prec,
            });
        }
        let height = clog2(len as u64) as usize;
        debug!(points = len, height, prec, "building subproduct tree");

        let mut offsets = Vec::with_capacity(height + 2);
        let mut total = 0;
        for h in 0..=height {
            offsets.push(total);
            total += len + block_count(len, 1 << h);
        }
        offsets.push(total);

        let mut data = vec![Ball::zero(); total];
        for (i, x) in points.iter().enumerate() {
            data[2 * i] = x.neg();
            data[2 * i + 1] = Ball::one();
        }

        for h in 0..height {
            let pow = 1usize << h;
            let (lower, upper) = data.split_at_mut(offsets[h + 1]);
            let src = &lower[offsets[h]..];
            let dst = &mut upper[..offsets[h + 2] - offsets[h + 1]];

            let mut left = len;
            let (mut pa, mut pb) = (0, 0);
            while left >= 2 * pow {
                let (a, b) = (&src[pa..pa + pow + 1], &src[pa + pow + 1..pa + 2 * pow + 2]);
                mul_monic_into(&mut dst[pb..pb + 2 * pow + 1], a, b, prec)?;
                left -= 2 * pow;
                pa += 2 * pow + 2;
                pb += 2 * pow + 1;
            }
            if left > pow {
                let a = &src[pa..pa + pow + 1];
                let b = &src[pa + pow + 1..pa + left + 2];
                mul_monic_into(&mut dst[pb..pb + left + 1], a, b, prec)?;
            } else if left > 0 {
                dst[pb..pb + left + 1].clone_from_slice(&src[pa..pa + left + 1]);
            }
        }

        Ok(Self {
            data,
            offsets,
            len,
            prec,
        })
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree was built over no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `ceil(log2 n)`: index of the root level.
    #[must_use]
    pub fn height(&self) -> usize {
        self.offsets.len().saturating_sub(2)
    }

    /// Precision the tree was built at.
    #[must_use]
    pub fn precision(&self) -> u64 {
        self.prec
    }

    /// All coefficients of level `h`, block after block.
    #[must_use]
    pub fn level(&self, h: usize) -> &[Ball] {
        match (self.offsets.get(h), self.offsets.get(h + 1)) {
            (Some(&start), Some(&end)) => &self.data[start..end],
            _ => &[],
        }
    }

    /// Number of blocks at level `h`.
    #[must_use]
    pub fn block_count(&self, h: usize) -> usize {
        if h > self.height() || self.is_empty() {
            0
        } else {
            block_count(self.len, 1 << h)
        }
    }

    /// Block `k` of level `h`: the monic product of the factors it spans.
    #[must_use]
    pub fn block(&self, h: usize, k: usize) -> Option<&[Ball]> {
        if k >= self.block_count(h) {
            return None;
        }
        let pow = 1usize << h;
        let start = k * (pow + 1);
        let width = pow.min(self.len - k * pow);
        Some(&self.level(h)[start..start + width + 1])
    }

    /// The product of all factors (empty for an empty tree).
    #[must_use]
    pub fn root(&self) -> &[Ball] {
        self.block(self.height(), 0).unwrap_or(&[])
    }
}
