//! Criterion benchmarks: subproduct-tree evaluation against one Horner pass
//! per point.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use arbcore_ball::Ball;
use arbcore_poly::{evaluate_many, evaluate_vec_fast_precomp, BallPoly, SubproductTree};

const PREC: u64 = 256;

fn sample_poly(len: usize) -> BallPoly {
    let coeffs: Vec<Ball> = (0..len)
        .map(|i| Ball::one().div(&Ball::from_u64(i as u64 + 1), PREC).unwrap())
        .collect();
    BallPoly::new(coeffs)
}

fn sample_points(n: usize) -> Vec<Ball> {
    (0..n)
        .map(|i| Ball::from_u64(i as u64 + 2).div(&Ball::from_u64(n as u64), PREC).unwrap())
        .collect()
}

fn bench_multipoint(c: &mut Criterion) {
    let sizes = [16usize, 64, 256];

    let mut group = c.benchmark_group("FastMultipoint");
    for &n in &sizes {
        let poly = sample_poly(n);
        let points = sample_points(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| evaluate_many(&poly, &points, PREC));
        });
    }
    group.finish();

    let mut group = c.benchmark_group("Horner");
    for &n in &sizes {
        let poly = sample_poly(n);
        let points = sample_points(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| poly.evaluate_vec_iter(&points, PREC));
        });
    }
    group.finish();

    let mut group = c.benchmark_group("PrecomputedTree");
    for &n in &sizes {
        let poly = sample_poly(n);
        let tree = SubproductTree::build(&sample_points(n), PREC).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| evaluate_vec_fast_precomp(poly.coeffs(), &tree, PREC));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_multipoint);
criterion_main!(benches);
