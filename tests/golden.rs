//! Golden file integration tests.
//!
//! Reads tests/testdata/constants_golden.json and checks that every cached
//! constant encloses the known leading digits, at several precisions and
//! through both the global and a private cache.

use arbcore_ball::{get_cached_constant, ConstantCache, ConstantId};
use arbcore_tests::decimal_bracket;
use num_bigint::BigInt;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Golden data structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct GoldenData {
    #[allow(dead_code)]
    description: String,
    values: Vec<GoldenEntry>,
}

#[derive(Deserialize)]
struct GoldenEntry {
    name: String,
    digits: u32,
    scaled: String,
}

impl GoldenEntry {
    fn scaled(&self) -> BigInt {
        self.scaled.parse().expect("golden value is an integer")
    }
}

fn load_golden_data() -> GoldenData {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/testdata/constants_golden.json");
    let data = std::fs::read_to_string(path).expect("failed to read golden file");
    serde_json::from_str(&data).expect("failed to parse golden JSON")
}

/// Bits comfortably above `digits * log2(10)`.
fn bits_for(digits: u32) -> u64 {
    u64::from(digits) * 4 + 64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn golden_file_loads() {
    let data = load_golden_data();
    assert!(data.values.len() >= 3);
    for entry in &data.values {
        assert!(entry.name.parse::<ConstantId>().is_ok(), "{}", entry.name);
    }
}

#[test]
fn global_cache_matches_golden_digits() {
    for entry in load_golden_data().values {
        let ball = get_cached_constant(&entry.name, bits_for(entry.digits)).unwrap();
        let (lo, hi) = decimal_bracket(&ball, entry.digits).unwrap();
        let expected = entry.scaled();
        assert_eq!(lo, expected, "{} to {} digits: {ball}", entry.name, entry.digits);
        assert_eq!(hi, expected + 1, "{} to {} digits: {ball}", entry.name, entry.digits);
    }
}

#[test]
fn low_precision_still_encloses_golden_digits() {
    let cache = ConstantCache::new();
    for entry in load_golden_data().values.iter().filter(|e| e.digits == 50) {
        let ball = cache.get(&entry.name, 40).unwrap();
        let (lo, hi) = decimal_bracket(&ball, entry.digits).unwrap();
        let expected = entry.scaled();
        assert!(lo <= expected && expected < hi, "{}: {ball}", entry.name);
    }
}

#[test]
fn cached_entry_serves_lower_precision() {
    let cache = ConstantCache::new();
    let data = load_golden_data();
    for entry in data.values.iter().filter(|e| e.digits == 50) {
        cache.get(&entry.name, bits_for(entry.digits)).unwrap();
    }
    let computed = cache.computations();
    for entry in data.values.iter().filter(|e| e.digits == 10) {
        let ball = cache.get(&entry.name, bits_for(entry.digits)).unwrap();
        let (lo, _) = decimal_bracket(&ball, entry.digits).unwrap();
        assert_eq!(lo, entry.scaled());
    }
    assert_eq!(cache.computations(), computed);
}
