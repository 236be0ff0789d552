//! Atomic per-tier usage counters.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::tier::Tier;

/// Snapshot of scratch usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierStats {
    /// Buffers served from the stack tier.
    pub stack: u64,
    /// Buffers served from the cached tier.
    pub cached: u64,
    /// Buffers served from the heap tier.
    pub heap: u64,
    /// Times the cached tier had to grow its backing buffer.
    pub cache_grows: u64,
}

/// Lock-free counters behind [`TierStats`].
pub struct AtomicTierStats {
    stack: AtomicU64,
    cached: AtomicU64,
    heap: AtomicU64,
    cache_grows: AtomicU64,
}

impl AtomicTierStats {
    /// Create zeroed counters.
    pub const fn new() -> Self {
        Self {
            stack: AtomicU64::new(0),
            cached: AtomicU64::new(0),
            heap: AtomicU64::new(0),
            cache_grows: AtomicU64::new(0),
        }
    }

    /// Take a snapshot of current counters.
    pub fn snapshot(&self) -> TierStats {
        TierStats {
            stack: self.stack.load(Ordering::Relaxed),
            cached: self.cached.load(Ordering::Relaxed),
            heap: self.heap.load(Ordering::Relaxed),
            cache_grows: self.cache_grows.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.stack.store(0, Ordering::Relaxed);
        self.cached.store(0, Ordering::Relaxed);
        self.heap.store(0, Ordering::Relaxed);
        self.cache_grows.store(0, Ordering::Relaxed);
    }

    /// Count one acquisition from `tier`.
    pub fn record(&self, tier: Tier) {
        let counter = match tier {
            Tier::Stack => &self.stack,
            Tier::Cached => &self.cached,
            Tier::Heap => &self.heap,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one growth of the cached tier.
    pub fn record_grow(&self) {
        self.cache_grows.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for AtomicTierStats {
    fn default() -> Self {
        Self::new()
    }
}
