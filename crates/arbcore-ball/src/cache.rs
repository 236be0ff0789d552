//! Precision-indexed cache of constant enclosures.
//!
//! Lookups take a read lock and clone an `Arc`. A miss evaluates the constant
//! outside any lock at the requested precision plus [`CONSTANT_GUARD_BITS`],
//! then publishes the new entry under a short write lock. Publishing never
//! replaces an entry with a less precise one, so the stored precision only
//! increases until [`ConstantCache::shutdown`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use arbcore_float::FloatError;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::ball::Ball;
use crate::constants::CONSTANT_GUARD_BITS;
use crate::error::BallError;
use crate::evaluator::{ConstantEvaluator, ConstantId};

/// A cached enclosure and the precision it was computed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedConstant {
    /// Precision in bits the value was evaluated at.
    pub prec: u64,
    /// Enclosure of the constant.
    pub value: Ball,
}

/// Cache of constant values shared across threads.
pub struct ConstantCache {
    entries: RwLock<HashMap<ConstantId, Arc<CachedConstant>>>,
    evaluators: HashMap<ConstantId, Arc<dyn ConstantEvaluator>>,
    computations: AtomicU64,
}

impl ConstantCache {
    /// Empty cache using the built-in evaluators.
    #[must_use]
    pub fn new() -> Self {
        let evaluators = ConstantId::ALL
            .into_iter()
            .map(|id| (id, id.evaluator()))
            .collect();
        Self {
            entries: RwLock::new(HashMap::new()),
            evaluators,
            computations: AtomicU64::new(0),
        }
    }

    /// Replace the evaluator used for `evaluator.id()`.
    #[must_use]
    pub fn with_evaluator(mut self, evaluator: Arc<dyn ConstantEvaluator>) -> Self {
        self.evaluators.insert(evaluator.id(), evaluator);
        self
    }

    /// Entry for `id` valid for at least `prec` bits, computing it if needed.
    pub fn entry(&self, id: ConstantId, prec: u64) -> Result<Arc<CachedConstant>, BallError> {
        if prec == 0 {
            return Err(FloatError::InvalidPrecision(prec).into());
        }
        if let Some(entry) = self.entries.read().get(&id) {
            if entry.prec >= prec {
                return Ok(Arc::clone(entry));
            }
        }

        let evaluator = self
            .evaluators
            .get(&id)
            .ok_or_else(|| BallError::UnknownConstant(id.to_string()))?;
        let target = prec.saturating_add(CONSTANT_GUARD_BITS);
        debug!(constant = %id, prec, target, algorithm = evaluator.name(), "computing constant");
        let value = evaluator.evaluate(target)?;
        self.computations.fetch_add(1, Ordering::Relaxed);
        let fresh = Arc::new(CachedConstant {
            prec: target,
            value,
        });

        let mut entries = self.entries.write();
        let stored = entries.entry(id).or_insert_with(|| Arc::clone(&fresh));
        if stored.prec < fresh.prec {
            *stored = Arc::clone(&fresh);
        }
        Ok(Arc::clone(stored))
    }

    /// Enclosure of `id` valid for at least `prec` bits.
    ///
    /// A hit returns the stored ball as is: a more precise entry is still a
    /// valid enclosure at `prec`, and rounding it down would only widen it.
    pub fn get_or_compute(&self, id: ConstantId, prec: u64) -> Result<Ball, BallError> {
        Ok(self.entry(id, prec)?.value.clone())
    }

    /// Like [`get_or_compute`](Self::get_or_compute), looking the constant up by name.
    pub fn get(&self, name: &str, prec: u64) -> Result<Ball, BallError> {
        self.get_or_compute(name.parse()?, prec)
    }

    /// Precision of the stored entry for `id`, if any.
    #[must_use]
    pub fn cached_precision(&self, id: ConstantId) -> Option<u64> {
        self.entries.read().get(&id).map(|e| e.prec)
    }

    /// Number of evaluations performed so far.
    #[must_use]
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    /// Drop every stored entry.
    pub fn shutdown(&self) {
        let mut entries = self.entries.write();
        if !entries.is_empty() {
            info!(entries = entries.len(), "clearing constant cache");
        }
        entries.clear();
    }
}

impl Default for ConstantCache {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide cache.
pub fn global() -> &'static ConstantCache {
    static GLOBAL: OnceLock<ConstantCache> = OnceLock::new();
    GLOBAL.get_or_init(ConstantCache::new)
}

/// Enclosure of the named constant at `prec` bits, from the process-wide cache.
pub fn get_cached_constant(name: &str, prec: u64) -> Result<Ball, BallError> {
    global().get(name, prec)
}
