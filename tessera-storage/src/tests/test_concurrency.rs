//! Concurrent access tests
//!
//! Racing first accesses must collapse onto a single computation, and
//! computations for distinct keys must be able to run at the same time.

use super::support::Counter;
use crate::{RetentionPolicy, StorageError, StorageManager};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

const RACERS: usize = 8;

#[test]
fn test_racing_lazy_value_access_computes_once() {
    let storage = StorageManager::new("race");
    let counter = Counter::new();
    let calls = counter.clone();

    let value = Arc::new(storage.create_lazy_value(
        "slow",
        move || -> Result<Arc<String>, StorageError> {
            calls.bump();
            // Give other threads time to pile up behind the in-flight computation
            thread::sleep(Duration::from_millis(20));
            Ok(Arc::new("computed".to_string()))
        },
    ));

    let barrier = Arc::new(Barrier::new(RACERS));
    let handles: Vec<_> = (0..RACERS)
        .map(|_| {
            let value = Arc::clone(&value);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                value.get().unwrap()
            })
        })
        .collect();

    let results: Vec<Arc<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(counter.get(), 1);
    for result in &results {
        assert!(Arc::ptr_eq(result, &results[0]));
    }
}

#[test]
fn test_racing_memoized_access_computes_once_per_key() {
    let storage = StorageManager::new("race");
    let counter = Counter::new();
    let calls = counter.clone();

    let function = Arc::new(storage.create_memoized_function(
        "slow",
        RetentionPolicy::Retain,
        move |key: &u32| -> Result<Arc<u32>, StorageError> {
            calls.bump();
            thread::sleep(Duration::from_millis(10));
            Ok(Arc::new(key * 100))
        },
    ));

    let barrier = Arc::new(Barrier::new(RACERS));
    let handles: Vec<_> = (0..RACERS)
        .map(|i| {
            let function = Arc::clone(&function);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                // Two keys, each requested by half of the threads
                let key = (i % 2) as u32;
                (key, function.get(&key).unwrap())
            })
        })
        .collect();

    let results: Vec<(u32, Arc<u32>)> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(counter.get(), 2);
    for (key, value) in &results {
        let expected = function.peek(key).unwrap();
        assert!(Arc::ptr_eq(value, &expected));
    }
}

#[test]
fn test_distinct_keys_do_not_block_each_other() {
    let storage = StorageManager::new("parallel");
    let rendezvous = Arc::new(Barrier::new(2));
    let inside = Arc::clone(&rendezvous);

    // Each computation waits for the other one to start: this only completes
    // if both keys are being computed at the same time.
    let function = Arc::new(storage.create_memoized_function(
        "rendezvous",
        RetentionPolicy::Retain,
        move |key: &u32| -> Result<u32, StorageError> {
            inside.wait();
            Ok(*key)
        },
    ));

    let handles: Vec<_> = [1u32, 2u32]
        .into_iter()
        .map(|key| {
            let function = Arc::clone(&function);
            thread::spawn(move || function.get(&key).unwrap())
        })
        .collect();

    let mut results: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    results.sort();
    assert_eq!(results, vec![1, 2]);
}

#[test]
fn test_sessions_are_independent() {
    let first = StorageManager::new("first");
    let second = StorageManager::new("second");

    first.cancellation().cancel();

    assert!(first.check_cancelled().is_err());
    assert!(second.check_cancelled().is_ok());
    assert!(!first.is_same_session(&second));
    assert!(first.is_same_session(&first.clone()));
}
