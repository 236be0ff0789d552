//! Size-based tier selection for scratch buffers.

/// Largest request (in limbs) served from the inline stack array.
pub const STACK_LIMBS: usize = 40;

/// Largest request (in limbs) served from the reusable cache.
pub const CACHE_LIMBS: usize = 1000;

/// Where a scratch buffer lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Inline array in the caller's frame; nothing to free.
    Stack,
    /// Borrowed from a provider-owned buffer that only ever grows.
    Cached,
    /// Exact-size heap allocation freed on release.
    Heap,
}

/// Thresholds used to pick a [`Tier`] for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPolicy {
    /// Requests up to this many limbs use [`Tier::Stack`].
    pub stack_limit: usize,
    /// Requests up to this many limbs (and above `stack_limit`) use [`Tier::Cached`].
    pub cache_limit: usize,
}

impl TierPolicy {
    /// Default policy: 40 limbs on the stack, up to 1000 limbs cached.
    pub const DEFAULT: Self = Self {
        stack_limit: STACK_LIMBS,
        cache_limit: CACHE_LIMBS,
    };

    /// Policy that sends every request to the heap.
    pub const HEAP_ONLY: Self = Self {
        stack_limit: 0,
        cache_limit: 0,
    };

    /// Choose the tier for a request of `size` limbs.
    #[must_use]
    pub const fn select(&self, size: usize) -> Tier {
        if size <= self.stack_limit {
            Tier::Stack
        } else if size <= self.cache_limit {
            Tier::Cached
        } else {
            Tier::Heap
        }
    }

    /// Normalize the policy: the stack limit never exceeds the inline array
    /// and never exceeds the cache limit.
    #[must_use]
    pub const fn normalize(self) -> Self {
        let mut stack_limit = self.stack_limit;
        if stack_limit > STACK_LIMBS {
            stack_limit = STACK_LIMBS;
        }
        if stack_limit > self.cache_limit {
            stack_limit = self.cache_limit;
        }
        Self {
            stack_limit,
            cache_limit: self.cache_limit,
        }
    }
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tiers_by_size() {
        let policy = TierPolicy::default();
        assert_eq!(policy.select(1), Tier::Stack);
        assert_eq!(policy.select(10), Tier::Stack);
        assert_eq!(policy.select(40), Tier::Stack);
        assert_eq!(policy.select(41), Tier::Cached);
        assert_eq!(policy.select(500), Tier::Cached);
        assert_eq!(policy.select(1000), Tier::Cached);
        assert_eq!(policy.select(1001), Tier::Heap);
        assert_eq!(policy.select(5000), Tier::Heap);
    }

    #[test]
    fn heap_only_policy() {
        let policy = TierPolicy::HEAP_ONLY;
        assert_eq!(policy.select(1), Tier::Heap);
        assert_eq!(policy.select(500), Tier::Heap);
    }

    #[test]
    fn normalize_clamps_stack_limit() {
        let policy = TierPolicy {
            stack_limit: 4096,
            cache_limit: 8192,
        }
        .normalize();
        assert_eq!(policy.stack_limit, STACK_LIMBS);
        assert_eq!(policy.cache_limit, 8192);
        assert_eq!(policy.select(STACK_LIMBS + 1), Tier::Cached);
    }

    #[test]
    fn normalize_keeps_valid_policies() {
        assert_eq!(TierPolicy::DEFAULT.normalize(), TierPolicy::DEFAULT);
        assert_eq!(TierPolicy::HEAP_ONLY.normalize(), TierPolicy::HEAP_ONLY);
    }

    #[test]
    fn normalize_keeps_stack_below_cache() {
        let policy = TierPolicy {
            stack_limit: 30,
            cache_limit: 20,
        }
        .normalize();
        assert_eq!(policy.stack_limit, 20);
        assert_eq!(policy.select(25), Tier::Heap);
    }
}
