//! Scratch providers.
//!
//! `ThreadLocalProvider` is the default: its cached tier is one growable
//! buffer per thread. `SharedCacheProvider` owns a mutex-guarded buffer and is
//! the variant to use when the cache itself must be observable or shared.
//! `HeapProvider` skips both fast tiers and is fully deterministic.

use std::cell::RefCell;

use parking_lot::Mutex;
use tracing::debug;

use crate::scratch::ScratchBuffer;
use crate::stats::{AtomicTierStats, TierStats};
use crate::tier::{Tier, TierPolicy};

/// Source of scratch limb buffers.
pub trait LimbProvider: Send + Sync {
    /// Get a zero-filled buffer of exactly `size` limbs.
    fn acquire(&self, size: usize) -> ScratchBuffer;

    /// Give a buffer back once the owning call is done with it.
    fn release(&self, buffer: ScratchBuffer);

    /// Short name used in logs and CLI output.
    fn name(&self) -> &str;
}

/// Run `f` on a scratch buffer of `size` limbs obtained from `provider`.
///
/// The buffer is released before returning, whatever `f` returns.
pub fn with_scratch<P, R>(provider: &P, size: usize, f: impl FnOnce(&mut [u64]) -> R) -> R
where
    P: LimbProvider + ?Sized,
{
    let mut buffer = provider.acquire(size);
    let result = f(&mut buffer);
    provider.release(buffer);
    result
}

/// Put `limbs` back into `slot` unless the slot already holds a larger buffer.
fn return_to_slot(slot: &mut Vec<u64>, limbs: Vec<u64>) {
    if limbs.len() >= slot.len() {
        *slot = limbs;
    }
}

/// Build a cached-tier buffer from whatever the slot held.
fn cached_from(taken: Vec<u64>, size: usize, stats: &AtomicTierStats, name: &str) -> ScratchBuffer {
    if taken.len() < size {
        stats.record_grow();
        debug!(provider = name, from = taken.len(), to = size, "growing limb cache");
    }
    ScratchBuffer::cached(taken, size)
}

thread_local! {
    static LIMB_CACHE: RefCell<Vec<u64>> = const { RefCell::new(Vec::new()) };
}

/// Release this thread's cached-tier buffer and reset its capacity to zero.
pub fn clear_thread_cache() {
    LIMB_CACHE.with(|cache| *cache.borrow_mut() = Vec::new());
}

/// Capacity in limbs of this thread's cached-tier buffer.
#[must_use]
pub fn thread_cache_capacity() -> usize {
    LIMB_CACHE.with(|cache| cache.borrow().len())
}

/// Default provider with a per-thread cached tier.
pub struct ThreadLocalProvider {
    policy: TierPolicy,
    stats: AtomicTierStats,
}

impl ThreadLocalProvider {
    /// Provider using the default tier policy.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_policy(TierPolicy::DEFAULT)
    }

    /// Provider using a custom tier policy, normalized first.
    #[must_use]
    pub const fn with_policy(policy: TierPolicy) -> Self {
        Self {
            policy: policy.normalize(),
            stats: AtomicTierStats::new(),
        }
    }

    /// Tier policy in effect.
    #[must_use]
    pub fn policy(&self) -> TierPolicy {
        self.policy
    }

    /// Snapshot of tier usage.
    #[must_use]
    pub fn stats(&self) -> TierStats {
        self.stats.snapshot()
    }
}

impl Default for ThreadLocalProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LimbProvider for ThreadLocalProvider {
    fn acquire(&self, size: usize) -> ScratchBuffer {
        let tier = self.policy.select(size);
        self.stats.record(tier);
        match tier {
            Tier::Stack => ScratchBuffer::stack(size),
            Tier::Cached => {
                let taken = LIMB_CACHE.with(|cache| std::mem::take(&mut *cache.borrow_mut()));
                cached_from(taken, size, &self.stats, self.name())
            }
            Tier::Heap => ScratchBuffer::heap(size),
        }
    }

    fn release(&self, buffer: ScratchBuffer) {
        if let ScratchBuffer::Cached { limbs, .. } = buffer {
            LIMB_CACHE.with(|cache| return_to_slot(&mut cache.borrow_mut(), limbs));
        }
    }

    fn name(&self) -> &str {
        "thread-local"
    }
}

static DEFAULT_PROVIDER: ThreadLocalProvider = ThreadLocalProvider::new();

/// Process-wide default provider used when the caller does not inject one.
#[must_use]
pub fn default_provider() -> &'static ThreadLocalProvider {
    &DEFAULT_PROVIDER
}

/// Provider whose cached tier is a single lock-protected buffer.
pub struct SharedCacheProvider {
    policy: TierPolicy,
    cache: Mutex<Vec<u64>>,
    stats: AtomicTierStats,
}

impl SharedCacheProvider {
    /// Provider using the default tier policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(TierPolicy::DEFAULT)
    }

    /// Provider using a custom tier policy, normalized first.
    #[must_use]
    pub fn with_policy(policy: TierPolicy) -> Self {
        Self {
            policy: policy.normalize(),
            cache: Mutex::new(Vec::new()),
            stats: AtomicTierStats::new(),
        }
    }

    /// Capacity in limbs of the cached-tier buffer.
    #[must_use]
    pub fn cached_capacity(&self) -> usize {
        self.cache.lock().len()
    }

    /// Free the cached-tier buffer and reset its capacity to zero.
    pub fn shutdown(&self) {
        *self.cache.lock() = Vec::new();
    }

    /// Snapshot of tier usage.
    #[must_use]
    pub fn stats(&self) -> TierStats {
        self.stats.snapshot()
    }
}

impl Default for SharedCacheProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LimbProvider for SharedCacheProvider {
    fn acquire(&self, size: usize) -> ScratchBuffer {
        let tier = self.policy.select(size);
        self.stats.record(tier);
        match tier {
            Tier::Stack => ScratchBuffer::stack(size),
            Tier::Cached => {
                let taken = std::mem::take(&mut *self.cache.lock());
                cached_from(taken, size, &self.stats, self.name())
            }
            Tier::Heap => ScratchBuffer::heap(size),
        }
    }

    fn release(&self, buffer: ScratchBuffer) {
        if let ScratchBuffer::Cached { limbs, .. } = buffer {
            return_to_slot(&mut self.cache.lock(), limbs);
        }
    }

    fn name(&self) -> &str {
        "shared"
    }
}

/// Provider that serves every request from a fresh heap allocation.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapProvider;

impl LimbProvider for HeapProvider {
    fn acquire(&self, size: usize) -> ScratchBuffer {
        ScratchBuffer::heap(size)
    }

    fn release(&self, _buffer: ScratchBuffer) {}

    fn name(&self) -> &str {
        "heap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::STACK_LIMBS;

    #[test]
    fn sizes_map_to_tiers() {
        let provider = SharedCacheProvider::new();
        for (size, tier) in [(10, Tier::Stack), (500, Tier::Cached), (5000, Tier::Heap)] {
            let buf = provider.acquire(size);
            assert_eq!(buf.tier(), tier, "size {size}");
            assert_eq!(buf.len(), size);
            provider.release(buf);
        }
        let stats = provider.stats();
        assert_eq!(stats.stack, 1);
        assert_eq!(stats.cached, 1);
        assert_eq!(stats.heap, 1);
    }

    #[test]
    fn shared_cache_capacity_never_shrinks() {
        let provider = SharedCacheProvider::new();
        with_scratch(&provider, 600, |buf| buf[599] = 1);
        assert_eq!(provider.cached_capacity(), 600);
        with_scratch(&provider, 100, |buf| assert!(buf.iter().all(|&l| l == 0)));
        assert_eq!(provider.cached_capacity(), 600);
        with_scratch(&provider, 900, |_| ());
        assert_eq!(provider.cached_capacity(), 900);
        assert_eq!(provider.stats().cache_grows, 2);
    }

    #[test]
    fn shared_cache_shutdown_resets_capacity() {
        let provider = SharedCacheProvider::new();
        with_scratch(&provider, 700, |_| ());
        assert_eq!(provider.cached_capacity(), 700);
        provider.shutdown();
        assert_eq!(provider.cached_capacity(), 0);
    }

    #[test]
    fn heap_and_stack_do_not_touch_cache() {
        let provider = SharedCacheProvider::new();
        with_scratch(&provider, 10, |_| ());
        with_scratch(&provider, 5000, |_| ());
        assert_eq!(provider.cached_capacity(), 0);
    }

    #[test]
    fn thread_local_cache_grows_and_clears() {
        // Runs on its own thread so other tests cannot disturb the cache.
        std::thread::spawn(|| {
            let provider = ThreadLocalProvider::new();
            assert_eq!(thread_cache_capacity(), 0);
            with_scratch(&provider, 300, |_| ());
            assert_eq!(thread_cache_capacity(), 300);
            with_scratch(&provider, 200, |_| ());
            assert_eq!(thread_cache_capacity(), 300);
            clear_thread_cache();
            assert_eq!(thread_cache_capacity(), 0);
        })
        .join()
        .unwrap();
    }

    #[test]
    fn nested_cached_requests_are_independent() {
        let provider = SharedCacheProvider::new();
        with_scratch(&provider, 100, |outer| {
            outer[0] = 11;
            with_scratch(&provider, 200, |inner| {
                inner[0] = 22;
            });
            assert_eq!(outer[0], 11);
        });
        assert_eq!(provider.cached_capacity(), 200);
    }

    #[test]
    fn heap_provider_always_heap() {
        let provider = HeapProvider;
        for size in [1, 40, 500, 5000] {
            let buf = provider.acquire(size);
            assert_eq!(buf.tier(), Tier::Heap);
            provider.release(buf);
        }
    }

    #[test]
    fn custom_policy_is_respected() {
        let provider = ThreadLocalProvider::with_policy(TierPolicy::HEAP_ONLY);
        let buf = provider.acquire(10);
        assert_eq!(buf.tier(), Tier::Heap);
        provider.release(buf);
        assert_eq!(provider.stats().heap, 1);
    }

    #[test]
    fn oversized_stack_limit_is_clamped() {
        let policy = TierPolicy {
            stack_limit: 100,
            cache_limit: 1000,
        };
        let local = ThreadLocalProvider::with_policy(policy);
        assert_eq!(local.policy().stack_limit, STACK_LIMBS);
        let sum = with_scratch(&local, 64, |buf| {
            buf.fill(1);
            buf.iter().sum::<u64>()
        });
        assert_eq!(sum, 64);
        assert_eq!(local.stats().cached, 1);

        let shared = SharedCacheProvider::with_policy(policy);
        let buf = shared.acquire(64);
        assert_eq!(buf.tier(), Tier::Cached);
        shared.release(buf);
        assert_eq!(shared.cached_capacity(), 64);
    }

    #[test]
    fn providers_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ThreadLocalProvider>();
        assert_send_sync::<SharedCacheProvider>();
        assert_send_sync::<HeapProvider>();
    }
}
