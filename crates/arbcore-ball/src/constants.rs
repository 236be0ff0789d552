//! Precision constants for the ball layer.

/// Precision in bits at which radii are stored. Radii are always rounded up.
pub const RAD_PREC: u64 = 30;

/// Extra bits requested when a cached constant has to be recomputed, so that
/// slightly higher follow-up requests hit the cache.
pub const CONSTANT_GUARD_BITS: u64 = 32;
