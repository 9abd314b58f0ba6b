//! Shared helpers for storage tests

use crate::error::StorageError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Error type for test computations that can also carry storage failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestError {
    Storage(StorageError),
    Failed(String),
}

impl From<StorageError> for TestError {
    fn from(error: StorageError) -> Self {
        TestError::Storage(error)
    }
}

/// Shared invocation counter for computations
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
