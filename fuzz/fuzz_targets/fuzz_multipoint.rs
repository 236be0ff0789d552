#![no_main]

use libfuzzer_sys::fuzz_target;

use arbcore_ball::Ball;
use arbcore_poly::{evaluate_many, BallPoly};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // First byte: number of coefficients; the rest are signed small integers.
    let ncoeffs = usize::from(data[0] % 24).min(data.len() - 1);
    let values: Vec<i64> = data[1..].iter().map(|&b| i64::from(b as i8)).collect();
    let (coeffs, points) = values.split_at(ncoeffs);
    let points: Vec<Ball> = points.iter().take(96).map(|&v| Ball::from_i64(v)).collect();
    let poly = BallPoly::from_i64s(coeffs);

    let fast = evaluate_many(&poly, &points, 256).expect("finite inputs");
    let slow = poly.evaluate_vec_iter(&points, 256).expect("finite inputs");
    assert_eq!(fast.len(), points.len());
    for (f, s) in fast.iter().zip(&slow) {
        assert!(f.overlaps(s), "{f} vs {s}");
    }
});
