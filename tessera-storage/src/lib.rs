//! Tessera Storage
//!
//! The memoization core of the Tessera descriptor graph.
//!
//! ## Architecture
//!
//! - **Lazy values**: zero-argument computations run on first access and cached
//! - **Memoized functions**: key-to-value mappings populated on demand, with a
//!   retention policy of either retain-forever or reclaimable (bounded LRU)
//! - **Storage manager**: the per-session factory that owns cancellation and
//!   statistics, passed explicitly instead of living in process-wide state
//!
//! Every cache guarantees at-most-once computation per key. Concurrent first
//! requests for one key wait for the single in-flight computation; requests for
//! different keys never block each other. Failed or cancelled computations are
//! not cached, so the next request retries.

pub mod cancellation;
pub mod error;
pub mod lazy_value;
pub mod manager;
pub mod memoized;
mod slot;
pub mod stats;

// Re-export public API
pub use cancellation::CancellationToken;
pub use error::{StorageError, StorageResult};
pub use lazy_value::{LazyValue, NullableLazyValue};
pub use manager::StorageManager;
pub use memoized::{MemoizedFunction, MemoizedFunctionToNullable, RetentionPolicy};
pub use stats::CacheStats;

#[cfg(test)]
mod tests;
