//! Multipoint evaluation across the ball and polynomial crates.

use arbcore_ball::{global, Ball, ConstantId};
use arbcore_float::Float;
use arbcore_poly::{
    evaluate_many, evaluate_vec_fast_precomp, BallPoly, SubproductTree, PARALLEL_POINTS_THRESHOLD,
};

const PREC: u64 = 192;

fn rational(p: i64, q: u64) -> Ball {
    Ball::from_i64(p).div(&Ball::from_u64(q), PREC).unwrap()
}

#[test]
fn constant_coefficients_agree_with_horner() {
    let cache = global();
    let coeffs: Vec<Ball> = ConstantId::ALL
        .iter()
        .map(|&id| cache.get_or_compute(id, PREC).unwrap())
        .collect();
    let poly = BallPoly::new(coeffs);
    let points: Vec<Ball> = (-6..=6).map(|k| rational(k, 7)).collect();

    let fast = evaluate_many(&poly, &points, PREC).unwrap();
    let slow = poly.evaluate_vec_iter(&points, PREC).unwrap();
    assert_eq!(fast.len(), points.len());
    for ((x, f), s) in points.iter().zip(&fast).zip(&slow) {
        assert!(f.overlaps(s), "p({x}): {f} vs {s}");
        assert!(f.rel_accuracy_bits().unwrap() > num_bigint::BigInt::from(150));
    }
}

#[test]
fn product_of_roots_vanishes_at_every_root() {
    let points: Vec<Ball> = (1..=12).map(|k| rational(k * k - 20, 3)).collect();
    let poly = BallPoly::product_roots(&points, PREC).unwrap();
    let values = evaluate_many(&poly, &points, PREC).unwrap();
    for (x, v) in points.iter().zip(&values) {
        assert!(v.contains(&Float::zero()), "p({x}) = {v}");
    }
}

#[test]
fn tree_root_is_the_product_of_roots() {
    let points: Vec<Ball> = (0..11).map(|i| Ball::from_i64(3 * i - 10)).collect();
    let tree = SubproductTree::build(&points, PREC).unwrap();
    assert_eq!(tree.root(), BallPoly::product_roots(&points, PREC).unwrap().coeffs());
    // Reducing the root by itself leaves the zero remainder at every point.
    let zeros = evaluate_vec_fast_precomp(tree.root(), &tree, PREC).unwrap();
    assert!(zeros.iter().all(Ball::is_zero));
}

#[test]
fn large_exact_batch_matches_horner() {
    let n = PARALLEL_POINTS_THRESHOLD * 2 + 5;
    let points: Vec<Ball> = (0..n as i64).map(|i| Ball::from_i64(i - 200)).collect();
    let poly = BallPoly::from_i64s(&[7, -3, 0, 0, 1, 0, -2, 1]);
    let fast = evaluate_many(&poly, &points, 512).unwrap();
    let slow = poly.evaluate_vec_iter(&points, 512).unwrap();
    assert_eq!(fast, slow);
}
