//! Dense polynomials with ball coefficients.
//!
//! Coefficients are stored lowest degree first. The slice functions here are
//! shared with the subproduct tree, which keeps its polynomials in one arena.

use std::fmt;

use arbcore_ball::Ball;

use crate::error::PolyError;

/// `a * b` by the schoolbook method. Empty if either input is empty.
pub(crate) fn mul_slices(a: &[Ball], b: &[Ball], prec: u64) -> Result<Vec<Ball>, PolyError> {
    if a.is_empty() || b.is_empty() {
        return Ok(Vec::new());
    }
    let mut out = vec![Ball::zero(); a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            let t = x.mul(y, prec)?;
            out[i + j] = out[i + j].add(&t, prec)?;
        }
    }
    Ok(out)
}

/// Product of two monic polynomials written into `out`.
pub(crate) fn mul_monic_into(
    out: &mut [Ball],
    a: &[Ball],
    b: &[Ball],
    prec: u64,
) -> Result<(), PolyError> {
    debug_assert_eq!(out.len(), a.len() + b.len() - 1);
    let (a_low, b_low) = (&a[..a.len() - 1], &b[..b.len() - 1]);
    for slot in out.iter_mut() {
        *slot = Ball::zero();
    }
    // (A + x^m)(B + x^n) = AB + x^n A + x^m B + x^(m+n)
    let (m, n) = (a_low.len(), b_low.len());
    for (k, c) in mul_slices(a_low, b_low, prec)?.into_iter().enumerate() {
        out[k] = c;
    }
    for (i, c) in a_low.iter().enumerate() {
        out[n + i] = out[n + i].add(c, prec)?;
    }
    for (j, c) in b_low.iter().enumerate() {
        out[m + j] = out[m + j].add(c, prec)?;
    }
    out[m + n] = Ball::one();
    Ok(())
}

/// Quotient and remainder of `a` by `b`.
///
/// The remainder has exactly `b.len() - 1` coefficients. A monic divisor
/// skips the division by the leading coefficient.
pub(crate) fn divrem_slices(
    a: &[Ball],
    b: &[Ball],
    prec: u64,
) -> Result<(Vec<Ball>, Vec<Ball>), PolyError> {
    let Some(lead) = b.last() else {
        return Err(PolyError::EmptyDivisor);
    };
    let lb = b.len();
    let mut r = a.to_vec();
    if a.len() < lb {
        r.resize(lb - 1, Ball::zero());
        return Ok((Vec::new(), r));
    }
    let monic = lead.is_one();
    let mut q = vec![Ball::zero(); a.len() - lb + 1];
    for i in (lb - 1..a.len()).rev() {
        let coeff = if monic {
            r[i].clone()
        } else {
            r[i].div(lead, prec)?
        };
        let base = i + 1 - lb;
        for (j, bj) in b[..lb - 1].iter().enumerate() {
            let t = coeff.mul(bj, prec)?;
            r[base + j] = r[base + j].sub(&t, prec)?;
        }
        q[base] = coeff;
    }
    r.truncate(lb - 1);
    Ok((q, r))
}

/// Remainder of `a` by `b`, with `b.len() - 1` coefficients.
pub(crate) fn rem_slices(a: &[Ball], b: &[Ball], prec: u64) -> Result<Vec<Ball>, PolyError> {
    divrem_slices(a, b, prec).map(|(_, r)| r)
}

/// `p(x)` by Horner's rule.
pub(crate) fn horner(coeffs: &[Ball], x: &Ball, prec: u64) -> Result<Ball, PolyError> {
    let mut iter = coeffs.iter().rev();
    let Some(first) = iter.next() else {
        return Ok(Ball::zero());
    };
    let mut acc = first.clone();
    for c in iter {
        acc = acc.mul(x, prec)?.add(c, prec)?;
    }
    Ok(acc)
}

/// Polynomial with ball coefficients, lowest degree first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BallPoly {
    coeffs: Vec<Ball>,
}

impl BallPoly {
    /// Polynomial with the given coefficients.
    #[must_use]
    pub fn new(coeffs: Vec<Ball>) -> Self {
        Self { coeffs }
    }

    /// The zero polynomial (no coefficients).
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Polynomial with exact integer coefficients.
    #[must_use]
    pub fn from_i64s(coeffs: &[i64]) -> Self {
        Self::new(coeffs.iter().map(|&c| Ball::from_i64(c)).collect())
    }

    /// Coefficients, lowest degree first.
    #[must_use]
    pub fn coeffs(&self) -> &[Ball] {
        &self.coeffs
    }

    /// Number of stored coefficients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// Whether there are no coefficients.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Index of the last stored coefficient.
    #[must_use]
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Product.
    pub fn mul(&self, other: &Self, prec: u64) -> Result<Self, PolyError> {
        mul_slices(&self.coeffs, &other.coeffs, prec).map(Self::new)
    }

    /// Quotient and remainder by `divisor`.
    pub fn divrem(&self, divisor: &Self, prec: u64) -> Result<(Self, Self), PolyError> {
        let (q, r) = divrem_slices(&self.coeffs, &divisor.coeffs, prec)?;
        Ok((Self::new(q), Self::new(r)))
    }

    /// Remainder by `divisor`.
    pub fn rem(&self, divisor: &Self, prec: u64) -> Result<Self, PolyError> {
        rem_slices(&self.coeffs, &divisor.coeffs, prec).map(Self::new)
    }

    /// Value at `x`.
    pub fn evaluate(&self, x: &Ball, prec: u64) -> Result<Ball, PolyError> {
        horner(&self.coeffs, x, prec)
    }

    /// Values at each point, one Horner evaluation per point.
    pub fn evaluate_vec_iter(&self, points: &[Ball], prec: u64) -> Result<Vec<Ball>, PolyError> {
        points.iter().map(|x| self.evaluate(x, prec)).collect()
    }

    /// The monic polynomial `prod (x - x_i)`.
    pub fn product_roots(points: &[Ball], prec: u64) -> Result<Self, PolyError> {
        let mut acc = vec![Ball::one()];
        for x in points {
            let leaf = [x.neg(), Ball::one()];
            let mut next = vec![Ball::zero(); acc.len() + 1];
            mul_monic_into(&mut next, &acc, &leaf, prec)?;
            acc = next;
        }
        Ok(Self::new(acc))
    }
}

impl From<Vec<Ball>> for BallPoly {
    fn from(coeffs: Vec<Ball>) -> Self {
        Self::new(coeffs)
    }
}

impl fmt::Display for BallPoly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coeffs.is_empty() {
            return f.write_str("0");
        }
        for (i, c) in self.coeffs.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            match i {
                0 => write!(f, "{c}")?,
                1 => write!(f, "{c}*x")?,
                _ => write!(f, "{c}*x^{i}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use arbcore_float::Float;

    use super::*;

    const PREC: u64 = 64;

    #[test]
    fn mul_small() {
        // (1 + x)(1 - x) = 1 - x^2
        let a = BallPoly::from_i64s(&[1, 1]);
        let b = BallPoly::from_i64s(&[1, -1]);
        assert_eq!(a.mul(&b, PREC).unwrap(), BallPoly::from_i64s(&[1, 0, -1]));
        assert!(a.mul(&BallPoly::zero(), PREC).unwrap().is_empty());
    }

    #[test]
    fn divrem_reconstructs() {
        // x^3 + 2x + 5 = (x^2 - x + 3)(x + 1) + 2
        let a = BallPoly::from_i64s(&[5, 2, 0, 1]);
        let b = BallPoly::from_i64s(&[1, 1]);
        let (q, r) = a.divrem(&b, PREC).unwrap();
        assert_eq!(q, BallPoly::from_i64s(&[3, -1, 1]));
        assert_eq!(r, BallPoly::from_i64s(&[2]));
    }

    #[test]
    fn divrem_non_monic() {
        // 4x^2 + 2 = (2x)(2x) + 2
        let a = BallPoly::from_i64s(&[2, 0, 4]);
        let b = BallPoly::from_i64s(&[0, 2]);
        let (q, r) = a.divrem(&b, PREC).unwrap();
        assert_eq!(q, BallPoly::from_i64s(&[0, 2]));
        assert_eq!(r, BallPoly::from_i64s(&[2]));
    }

    #[test]
    fn rem_of_short_dividend_pads() {
        let a = BallPoly::from_i64s(&[7]);
        let b = BallPoly::from_i64s(&[1, 0, 0, 1]);
        assert_eq!(a.rem(&b, PREC).unwrap(), BallPoly::from_i64s(&[7, 0, 0]));
        assert_eq!(a.rem(&BallPoly::zero(), PREC), Err(PolyError::EmptyDivisor));
    }

    #[test]
    fn horner_values() {
        let p = BallPoly::from_i64s(&[1, -3, 0, 2]);
        assert_eq!(p.evaluate(&Ball::from_i64(2), PREC).unwrap(), Ball::from_i64(11));
        assert!(BallPoly::zero().evaluate(&Ball::one(), PREC).unwrap().is_zero());
        let values = p
            .evaluate_vec_iter(&[Ball::zero(), Ball::from_i64(-1)], PREC)
            .unwrap();
        assert_eq!(values, vec![Ball::from_i64(1), Ball::from_i64(2)]);
    }

    #[test]
    fn product_roots_is_monic_and_vanishes() {
        let points: Vec<Ball> = [1, -2, 3].iter().map(|&v| Ball::from_i64(v)).collect();
        let p = BallPoly::product_roots(&points, PREC).unwrap();
        // (x - 1)(x + 2)(x - 3) = x^3 - 2x^2 - 5x + 6
        assert_eq!(p, BallPoly::from_i64s(&[6, -5, -2, 1]));
        for x in &points {
            assert!(p.evaluate(x, PREC).unwrap().is_zero());
        }
        assert_eq!(BallPoly::product_roots(&[], PREC).unwrap(), BallPoly::from_i64s(&[1]));
    }

    #[test]
    fn inexact_coefficients_keep_enclosure() {
        let third = Ball::one().div(&Ball::from_u64(3), 30).unwrap();
        let p = BallPoly::new(vec![third.clone(), third]);
        let v = p.evaluate(&Ball::from_u64(2), 30).unwrap();
        assert!(v.contains(&Float::one()));
    }

    #[test]
    fn display() {
        let p = BallPoly::from_i64s(&[1, 2, 3]);
        assert_eq!(
            p.to_string(),
            "[1e0 +/- 0] + [2e0 +/- 0]*x + [3e0 +/- 0]*x^2"
        );
        assert_eq!(BallPoly::zero().to_string(), "0");
    }
}
