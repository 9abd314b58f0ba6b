//! Memoized functions from keys to lazily computed values
//!
//! A memoized function is a total mapping populated on demand. Each key owns a
//! [`Slot`] so computations for different keys never block each other, while
//! concurrent requests for the same key share one computation.

use crate::error::StorageError;
use crate::manager::Session;
use crate::slot::Slot;
use lru::LruCache;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

type KeyedComputation<K, V, E> = Box<dyn Fn(&K) -> Result<V, E> + Send + Sync>;

/// How long computed entries are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Keep every entry for the lifetime of the cache
    Retain,
    /// Keep at most `capacity` entries, dropping the least recently used
    ///
    /// A dropped entry is simply recomputed on its next request, so identity of
    /// values is only guaranteed while the entry stays resident.
    Reclaimable { capacity: NonZeroUsize },
}

impl RetentionPolicy {
    /// Reclaimable retention with the given capacity (at least one entry)
    pub fn reclaimable(capacity: usize) -> Self {
        RetentionPolicy::Reclaimable {
            capacity: NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Computed slots in least-recently-used order, plus slots still pending
///
/// Only computed slots take part in eviction. A slot stays in `pending` while
/// it is being computed, so eviction can never drop a computation in flight,
/// and keys whose computation failed never take room from computed ones.
struct ReclaimableSlots<K, V> {
    recent: LruCache<K, Arc<Slot<V>>>,
    pending: HashMap<K, Arc<Slot<V>>>,
}

enum SlotTable<K, V> {
    Retained(RwLock<HashMap<K, Arc<Slot<V>>>>),
    Reclaimable(Mutex<ReclaimableSlots<K, V>>),
}

impl<K, V> SlotTable<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn new(retention: RetentionPolicy) -> Self {
        match retention {
            RetentionPolicy::Retain => SlotTable::Retained(RwLock::new(HashMap::new())),
            RetentionPolicy::Reclaimable { capacity } => {
                SlotTable::Reclaimable(Mutex::new(ReclaimableSlots {
                    recent: LruCache::new(capacity),
                    pending: HashMap::new(),
                }))
            }
        }
    }

    /// Find the slot for `key`, creating it if needed
    fn slot(&self, key: &K) -> Arc<Slot<V>> {
        match self {
            SlotTable::Retained(slots) => {
                if let Some(slot) = slots
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get(key)
                {
                    return Arc::clone(slot);
                }
                let mut slots = slots.write().unwrap_or_else(PoisonError::into_inner);
                Arc::clone(
                    slots
                        .entry(key.clone())
                        .or_insert_with(|| Arc::new(Slot::new())),
                )
            }
            SlotTable::Reclaimable(slots) => {
                let mut slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(slot) = slots.recent.get(key) {
                    return Arc::clone(slot);
                }
                Arc::clone(
                    slots
                        .pending
                        .entry(key.clone())
                        .or_insert_with(|| Arc::new(Slot::new())),
                )
            }
        }
    }

    /// Tidy up after a request on `slot` finished
    ///
    /// A pending slot that now holds a value joins the LRU order. A slot left
    /// empty by a failed computation is dropped once no other caller holds it.
    fn settle(&self, key: &K, slot: &Arc<Slot<V>>, session: &Session) {
        match self {
            SlotTable::Retained(slots) => {
                if slot.is_computed() {
                    return;
                }
                let mut slots = slots.write().unwrap_or_else(PoisonError::into_inner);
                let owned = slots
                    .get(key)
                    .is_some_and(|current| Arc::ptr_eq(current, slot));
                // The table and this caller are the only holders
                if owned && Arc::strong_count(slot) == 2 && !slot.is_computed() {
                    slots.remove(key);
                }
            }
            SlotTable::Reclaimable(slots) => {
                let mut slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
                let pending = slots
                    .pending
                    .get(key)
                    .is_some_and(|current| Arc::ptr_eq(current, slot));
                if !pending {
                    return;
                }
                if slot.is_computed() {
                    slots.pending.remove(key);
                    // The key is absent from `recent`, so push only returns an evicted entry.
                    if slots.recent.push(key.clone(), Arc::clone(slot)).is_some() {
                        session.stats.record_eviction();
                    }
                } else if Arc::strong_count(slot) == 2 {
                    slots.pending.remove(key);
                }
            }
        }
    }

    /// Find the slot for `key` without creating or promoting it
    fn existing(&self, key: &K) -> Option<Arc<Slot<V>>> {
        match self {
            SlotTable::Retained(slots) => slots
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned(),
            SlotTable::Reclaimable(slots) => {
                let slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
                slots
                    .recent
                    .peek(key)
                    .or_else(|| slots.pending.get(key))
                    .cloned()
            }
        }
    }

    fn computed_len(&self) -> usize {
        match self {
            SlotTable::Retained(slots) => slots
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .values()
                .filter(|slot| slot.is_computed())
                .count(),
            SlotTable::Reclaimable(slots) => {
                let slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
                slots
                    .recent
                    .iter()
                    .map(|(_, slot)| slot)
                    .chain(slots.pending.values())
                    .filter(|slot| slot.is_computed())
                    .count()
            }
        }
    }

    /// Number of slots held, computed or not
    fn len(&self) -> usize {
        match self {
            SlotTable::Retained(slots) => slots.read().unwrap_or_else(PoisonError::into_inner).len(),
            SlotTable::Reclaimable(slots) => {
                let slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
                slots.recent.len() + slots.pending.len()
            }
        }
    }
}

/// A function whose results are computed at most once per key
///
/// Create instances with [`crate::StorageManager::create_memoized_function`].
pub struct MemoizedFunction<K, V, E = StorageError> {
    label: String,
    retention: RetentionPolicy,
    table: SlotTable<K, V>,
    compute: KeyedComputation<K, V, E>,
    session: Arc<Session>,
}

/// A memoized function whose computation may answer "no such value"
///
/// `None` is a cached result like any other and is never recomputed.
pub type MemoizedFunctionToNullable<K, V, E = StorageError> = MemoizedFunction<K, Option<V>, E>;

impl<K, V, E> MemoizedFunction<K, V, E>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
    E: From<StorageError>,
{
    pub(crate) fn new(
        label: String,
        retention: RetentionPolicy,
        session: Arc<Session>,
        compute: KeyedComputation<K, V, E>,
    ) -> Self {
        Self {
            label,
            retention,
            table: SlotTable::new(retention),
            compute,
            session,
        }
    }

    /// Get the value for `key`, computing it on first request
    pub fn get(&self, key: &K) -> Result<V, E> {
        let slot = self.table.slot(key);
        let fetched = slot.get_or_compute(
            || format!("{}({:?})", self.label, key),
            &self.session.cancellation,
            || {
                tracing::debug!(label = %self.label, ?key, "memoized function: cache MISS");
                (self.compute)(key)
            },
        );
        self.table.settle(key, &slot, &self.session);
        self.session.record(&self.label, fetched)
    }

    /// The cached value for `key`, if it has been computed and is still resident
    pub fn peek(&self, key: &K) -> Option<V> {
        self.table.existing(key).and_then(|slot| slot.peek())
    }

    pub fn is_computed(&self, key: &K) -> bool {
        self.table
            .existing(key)
            .is_some_and(|slot| slot.is_computed())
    }

    /// Number of keys whose values are currently cached
    pub fn computed_len(&self) -> usize {
        self.table.computed_len()
    }

    /// Number of keys holding a slot, including ones still being computed
    pub fn slot_count(&self) -> usize {
        self.table.len()
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<K, V, E> fmt::Debug for MemoizedFunction<K, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizedFunction")
            .field("label", &self.label)
            .field("retention", &self.retention)
            .field("session", &self.session.name)
            .finish_non_exhaustive()
    }
}
