//! Tests for the Tessera memoization core
//!
//! Covers at-most-once computation, negative caching, failure retry,
//! cancellation and retention behaviour of lazy values and memoized functions.

mod support;

mod test_concurrency;
