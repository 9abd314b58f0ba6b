//! Cache statistics shared by every cache created from one storage session

use std::sync::atomic::{AtomicUsize, Ordering};

/// Snapshot of cache performance for a storage session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered from an already computed slot
    pub cache_hits: usize,
    /// Requests that had to run (or retry) a computation
    pub cache_misses: usize,
    /// Computations whose result was stored
    pub computations: usize,
    /// Requests that ended in an error; nothing was stored for them
    pub failures: usize,
    /// Slots dropped by a reclaimable cache to stay within capacity
    pub evictions: usize,
}

impl CacheStats {
    /// Total number of requests observed
    pub fn total_queries(&self) -> usize {
        self.cache_hits + self.cache_misses
    }

    /// Fraction of requests answered from cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_queries();
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    cache_hits: AtomicUsize,
    cache_misses: AtomicUsize,
    computations: AtomicUsize,
    failures: AtomicUsize,
    evictions: AtomicUsize,
}

impl StatsCounters {
    pub(crate) fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_computation(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        self.computations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            computations: self.computations.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}
