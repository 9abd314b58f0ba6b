//! Storage sessions
//!
//! A `StorageManager` is the explicit handle for one compilation session's
//! caching state. Every lazy value and memoized function created from it shares
//! the session's cancellation token and statistics; caches from different
//! sessions never interact.

use crate::cancellation::CancellationToken;
use crate::error::{StorageError, StorageResult};
use crate::lazy_value::LazyValue;
use crate::memoized::{MemoizedFunction, MemoizedFunctionToNullable, RetentionPolicy};
use crate::slot::Fetched;
use crate::stats::{CacheStats, StatsCounters};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// State shared by every cache of one session
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) name: String,
    pub(crate) cancellation: CancellationToken,
    pub(crate) stats: StatsCounters,
}

impl Session {
    /// Account for the outcome of one cache request
    pub(crate) fn record<V, E>(&self, label: &str, fetched: Result<Fetched<V>, E>) -> Result<V, E> {
        match fetched {
            Ok(Fetched::Cached(value)) => {
                self.stats.record_hit();
                Ok(value)
            }
            Ok(fetched) => {
                self.stats.record_computation();
                Ok(fetched.into_value())
            }
            Err(error) => {
                tracing::debug!(label, "computation failed; slot left uncomputed");
                self.stats.record_failure();
                Err(error)
            }
        }
    }
}

/// Factory and owner of the caches for one compilation session
///
/// Cloning is cheap and yields a handle to the same session.
#[derive(Clone)]
pub struct StorageManager {
    session: Arc<Session>,
}

impl StorageManager {
    /// Create a new session with its own cancellation token
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_cancellation(name, CancellationToken::new())
    }

    /// Create a new session observing an externally owned cancellation token
    pub fn with_cancellation(name: impl Into<String>, cancellation: CancellationToken) -> Self {
        Self {
            session: Arc::new(Session {
                name: name.into(),
                cancellation,
                stats: StatsCounters::default(),
            }),
        }
    }

    /// Create a lazily computed value
    pub fn create_lazy_value<T, E, F>(&self, label: impl Into<String>, compute: F) -> LazyValue<T, E>
    where
        T: Clone,
        E: From<StorageError>,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        LazyValue::new(label.into(), Arc::clone(&self.session), Box::new(compute))
    }

    /// Create a memoized function with the given retention policy
    pub fn create_memoized_function<K, V, E, F>(
        &self,
        label: impl Into<String>,
        retention: RetentionPolicy,
        compute: F,
    ) -> MemoizedFunction<K, V, E>
    where
        K: Eq + Hash + Clone + fmt::Debug,
        V: Clone,
        E: From<StorageError>,
        F: Fn(&K) -> Result<V, E> + Send + Sync + 'static,
    {
        MemoizedFunction::new(
            label.into(),
            retention,
            Arc::clone(&self.session),
            Box::new(compute),
        )
    }

    /// Create a memoized function whose computation may return `None`
    ///
    /// `None` is cached like any other result.
    pub fn create_memoized_function_with_nullable_values<K, V, E, F>(
        &self,
        label: impl Into<String>,
        retention: RetentionPolicy,
        compute: F,
    ) -> MemoizedFunctionToNullable<K, V, E>
    where
        K: Eq + Hash + Clone + fmt::Debug,
        V: Clone,
        E: From<StorageError>,
        F: Fn(&K) -> Result<Option<V>, E> + Send + Sync + 'static,
    {
        self.create_memoized_function(label, retention, compute)
    }

    pub fn name(&self) -> &str {
        &self.session.name
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.session.cancellation
    }

    /// Poll the session's cancellation token from inside a long computation
    pub fn check_cancelled(&self) -> StorageResult<()> {
        self.session.cancellation.check()
    }

    /// Snapshot of cache statistics across the whole session
    pub fn stats(&self) -> CacheStats {
        self.session.stats.snapshot()
    }

    /// Whether two handles refer to the same session
    pub fn is_same_session(&self, other: &StorageManager) -> bool {
        Arc::ptr_eq(&self.session, &other.session)
    }
}

impl Default for StorageManager {
    fn default() -> Self {
        Self::new("default")
    }
}

impl fmt::Debug for StorageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageManager")
            .field("name", &self.session.name)
            .field("cancelled", &self.session.cancellation.is_cancelled())
            .finish()
    }
}
