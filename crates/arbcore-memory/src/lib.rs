//! # arbcore-memory
//!
//! Scratch memory for multi-limb intermediate products.
//!
//! Requests are served from one of three tiers chosen by size: an inline
//! stack array, a reusable cache owned by the provider, or a one-off heap
//! allocation. Providers implement [`LimbProvider`] so callers and tests can
//! swap the default thread-local provider for a pure-heap one.
#![warn(missing_docs)]

pub mod provider;
pub mod scratch;
pub mod stats;
pub mod tier;

pub use provider::{
    clear_thread_cache, default_provider, thread_cache_capacity, with_scratch, HeapProvider,
    LimbProvider, SharedCacheProvider, ThreadLocalProvider,
};
pub use scratch::ScratchBuffer;
pub use stats::TierStats;
pub use tier::{Tier, TierPolicy, CACHE_LIMBS, STACK_LIMBS};
