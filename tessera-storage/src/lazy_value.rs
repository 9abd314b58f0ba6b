//! Lazily computed, memoized values

use crate::error::StorageError;
use crate::manager::Session;
use crate::slot::Slot;
use std::fmt;
use std::sync::Arc;

type Computation<T, E> = Box<dyn Fn() -> Result<T, E> + Send + Sync>;

/// A value computed on first access and cached for the lifetime of the owner
///
/// Concurrent first accesses run the computation exactly once; the other callers
/// wait and then observe the same result. Errors are not cached.
///
/// Create instances with [`crate::StorageManager::create_lazy_value`].
pub struct LazyValue<T, E = StorageError> {
    label: String,
    slot: Slot<T>,
    compute: Computation<T, E>,
    session: Arc<Session>,
}

/// A lazy value whose computation may legitimately produce "nothing"
pub type NullableLazyValue<T, E = StorageError> = LazyValue<Option<T>, E>;

impl<T, E> LazyValue<T, E>
where
    T: Clone,
    E: From<StorageError>,
{
    pub(crate) fn new(label: String, session: Arc<Session>, compute: Computation<T, E>) -> Self {
        Self {
            label,
            slot: Slot::new(),
            compute,
            session,
        }
    }

    /// Get the value, computing it if this is the first successful access
    pub fn get(&self) -> Result<T, E> {
        let fetched = self.slot.get_or_compute(
            || self.label.clone(),
            &self.session.cancellation,
            || {
                tracing::debug!(label = %self.label, "lazy value: computing");
                (self.compute)()
            },
        );
        self.session.record(&self.label, fetched)
    }

    /// The cached value, if it has been computed
    pub fn peek(&self) -> Option<T> {
        self.slot.peek()
    }

    pub fn is_computed(&self) -> bool {
        self.slot.is_computed()
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<T, E> fmt::Debug for LazyValue<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyValue")
            .field("label", &self.label)
            .field("session", &self.session.name)
            .finish_non_exhaustive()
    }
}
