//! Core traits for the ledger's collaborators
//!
//! This module defines the trait abstractions the ledger core is written
//! against, so any storage binding and any time source can be used
//! interchangeably.

use crate::types::StoreError;

/// A flat, lexicographically ordered key-value state store
///
/// The host provides one of these per invocation. Implementations may buffer
/// writes, validate reads at commit, or write through immediately; the core
/// only relies on the three operations below and never special-cases a
/// binding.
pub trait KeyValueStore {
    /// Point lookup
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Unconditional upsert
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// All entries with `low <= key < high`, in ascending key order
    fn range_scan(&mut self, low: &str, high: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn range_scan(&mut self, low: &str, high: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        (**self).range_scan(low, high)
    }
}

/// Source of the current instant, in Unix seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}
