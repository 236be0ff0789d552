//! Call-scoped scratch buffers.

use std::ops::{Deref, DerefMut};

use crate::tier::{Tier, STACK_LIMBS};

/// A zero-filled limb buffer of a requested length.
///
/// The `Stack` variant carries its storage inline, so the buffer lives in the
/// frame of whoever holds it. `Cached` buffers must be handed back to the
/// provider that produced them; `Heap` buffers are simply dropped.
pub enum ScratchBuffer {
    /// Inline storage; only the first `len` limbs are exposed.
    Stack {
        /// Backing array.
        limbs: [u64; STACK_LIMBS],
        /// Requested length.
        len: usize,
    },
    /// Provider cache storage; `limbs.len()` may exceed `len`.
    Cached {
        /// Backing vector taken from the provider cache.
        limbs: Vec<u64>,
        /// Requested length.
        len: usize,
    },
    /// One-off allocation of exactly the requested length.
    Heap(Vec<u64>),
}

impl ScratchBuffer {
    /// Inline buffer of `len` limbs. Panics if `len > STACK_LIMBS`.
    #[must_use]
    pub fn stack(len: usize) -> Self {
        assert!(len <= STACK_LIMBS, "stack scratch limited to {STACK_LIMBS} limbs");
        Self::Stack {
            limbs: [0; STACK_LIMBS],
            len,
        }
    }

    /// Wrap a cache vector, growing it to at least `len` and zeroing the prefix.
    #[must_use]
    pub fn cached(mut limbs: Vec<u64>, len: usize) -> Self {
        if limbs.len() < len {
            limbs.resize(len, 0);
        }
        limbs[..len].fill(0);
        Self::Cached { limbs, len }
    }

    /// Fresh heap buffer of exactly `len` limbs.
    #[must_use]
    pub fn heap(len: usize) -> Self {
        Self::Heap(vec![0; len])
    }

    /// Tier this buffer was served from.
    #[must_use]
    pub fn tier(&self) -> Tier {
        match self {
            Self::Stack { .. } => Tier::Stack,
            Self::Cached { .. } => Tier::Cached,
            Self::Heap(_) => Tier::Heap,
        }
    }
}

impl Deref for ScratchBuffer {
    type Target = [u64];

    fn deref(&self) -> &[u64] {
        match self {
            Self::Stack { limbs, len } => &limbs[..*len],
            Self::Cached { limbs, len } => &limbs[..*len],
            Self::Heap(limbs) => limbs,
        }
    }
}

impl DerefMut for ScratchBuffer {
    fn deref_mut(&mut self) -> &mut [u64] {
        match self {
            Self::Stack { limbs, len } => &mut limbs[..*len],
            Self::Cached { limbs, len } => &mut limbs[..*len],
            Self::Heap(limbs) => limbs,
        }
    }
}
