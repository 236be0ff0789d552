//! Tuning constants for multipoint evaluation.

/// Point count from which the per-level remainder work runs on the rayon
/// thread pool.
pub const PARALLEL_POINTS_THRESHOLD: usize = 256;
