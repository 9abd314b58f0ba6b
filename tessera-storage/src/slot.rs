//! Per-key computation slot
//!
//! A slot is the unit of at-most-once computation. The first caller to find the
//! slot empty marks it as computing and runs the computation outside the lock;
//! concurrent callers for the same slot block on a condition variable until the
//! owner stores a value or gives up. Failures (including cancellation and panics)
//! put the slot back to empty so a later request retries.

use crate::cancellation::CancellationToken;
use crate::error::StorageError;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

enum SlotState<V> {
    Empty,
    Computing(ThreadId),
    Ready(V),
}

/// How a value was obtained from a slot
pub(crate) enum Fetched<V> {
    Cached(V),
    Computed(V),
}

impl<V> Fetched<V> {
    pub(crate) fn into_value(self) -> V {
        match self {
            Fetched::Cached(value) | Fetched::Computed(value) => value,
        }
    }
}

pub(crate) struct Slot<V> {
    state: Mutex<SlotState<V>>,
    ready: Condvar,
}

impl<V: Clone> Slot<V> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(SlotState::Empty),
            ready: Condvar::new(),
        }
    }

    // Critical sections only swap the state enum, so a poisoned lock still holds
    // a consistent state.
    fn lock(&self) -> MutexGuard<'_, SlotState<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current value without computing
    pub(crate) fn peek(&self) -> Option<V> {
        match &*self.lock() {
            SlotState::Ready(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub(crate) fn is_computed(&self) -> bool {
        matches!(&*self.lock(), SlotState::Ready(_))
    }

    /// Return the stored value, computing it first if no one has yet
    pub(crate) fn get_or_compute<E, F>(
        &self,
        describe: impl Fn() -> String,
        cancellation: &CancellationToken,
        compute: F,
    ) -> Result<Fetched<V>, E>
    where
        E: From<StorageError>,
        F: FnOnce() -> Result<V, E>,
    {
        let current = thread::current().id();

        let mut state = self.lock();
        loop {
            match &*state {
                SlotState::Ready(value) => return Ok(Fetched::Cached(value.clone())),
                SlotState::Computing(owner) if *owner == current => {
                    return Err(StorageError::RecursionDetected { key: describe() }.into());
                }
                SlotState::Computing(_) => {}
                SlotState::Empty => break,
            }
            state = self
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        cancellation.check()?;
        *state = SlotState::Computing(current);
        drop(state);

        let mut reset = ResetOnUnwind {
            slot: self,
            armed: true,
        };
        let result = compute().and_then(|value| {
            // A result produced after cancellation must not become visible.
            cancellation.check()?;
            Ok(value)
        });
        reset.armed = false;

        let mut state = self.lock();
        let fetched = match result {
            Ok(value) => {
                *state = SlotState::Ready(value.clone());
                Ok(Fetched::Computed(value))
            }
            Err(error) => {
                *state = SlotState::Empty;
                Err(error)
            }
        };
        drop(state);
        self.ready.notify_all();
        fetched
    }
}

/// Puts the slot back to empty if the computation unwinds
struct ResetOnUnwind<'a, V: Clone> {
    slot: &'a Slot<V>,
    armed: bool,
}

impl<V: Clone> Drop for ResetOnUnwind<'_, V> {
    fn drop(&mut self) {
        if self.armed {
            *self.slot.lock() = SlotState::Empty;
            self.slot.ready.notify_all();
        }
    }
}
