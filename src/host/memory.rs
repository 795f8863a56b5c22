//! In-memory key-value binding
//!
//! A sorted map implementing [`KeyValueStore`] directly. Writes are visible
//! immediately and nothing is ever rolled back, which makes it the simplest
//! store to run the core against in tests and tools.

use crate::core::traits::KeyValueStore;
use crate::types::StoreError;
use std::collections::BTreeMap;
use std::ops::Bound;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn range_scan(&mut self, low: &str, high: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        if low >= high {
            return Ok(Vec::new());
        }
        Ok(self
            .entries
            .range::<str, _>((Bound::Included(low), Bound::Excluded(high)))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
