//! Multi-version key-value host with optimistic validation
//!
//! `VersionedStore` holds the committed state: every key carries the version
//! of the commit that last wrote it. An [`Invocation`] is a private view of
//! that state: reads see committed data plus the invocation's own buffered
//! writes, and every key read and every range scanned is remembered. On
//! [`Invocation::commit`] the read set is validated against the current
//! committed state under a write lock; if anything the invocation observed has
//! changed (including keys appearing in a scanned range) the commit fails with
//! [`StoreError::Conflict`] and nothing is applied. Otherwise all buffered
//! writes land atomically under a new version.
//!
//! # Thread Safety
//!
//! The committed map is behind a `parking_lot::RwLock`, so one store can be
//! shared across tasks behind an `Arc` while invocations run concurrently.

use crate::core::traits::KeyValueStore;
use crate::types::StoreError;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use tracing::{debug, trace};

type Version = u64;

#[derive(Debug, Default)]
struct Committed {
    entries: BTreeMap<String, (Version, Vec<u8>)>,
    version: Version,
}

impl Committed {
    fn range(&self, low: &str, high: &str) -> impl Iterator<Item = (&String, &(Version, Vec<u8>))> {
        // BTreeMap::range panics on inverted bounds.
        let bounds = if low < high { (low, high) } else { (low, low) };
        self.entries.range::<str, _>((Bound::Included(bounds.0), Bound::Excluded(bounds.1)))
    }
}

/// Committed state shared by all invocations
#[derive(Debug, Default)]
pub struct VersionedStore {
    committed: RwLock<Committed>,
}

impl VersionedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an invocation against the current committed state
    pub fn begin(&self) -> Invocation<'_> {
        Invocation {
            store: self,
            reads: BTreeMap::new(),
            ranges: Vec::new(),
            writes: BTreeMap::new(),
        }
    }

    /// Version of the latest commit
    pub fn version(&self) -> Version {
        self.committed.read().version
    }

    /// Number of committed keys
    pub fn len(&self) -> usize {
        self.committed.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.read().entries.is_empty()
    }
}

struct RangeRead {
    low: String,
    high: String,
    seen: Vec<(String, Version)>,
}

/// One invocation's view of a [`VersionedStore`]
///
/// Dropping an invocation without committing discards its writes.
pub struct Invocation<'a> {
    store: &'a VersionedStore,
    reads: BTreeMap<String, Option<Version>>,
    ranges: Vec<RangeRead>,
    writes: BTreeMap<String, Vec<u8>>,
}

impl Invocation<'_> {
    /// Number of buffered writes
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Validate the read set and apply the buffered writes atomically
    ///
    /// # Returns
    ///
    /// The version assigned to this commit (the current version if nothing
    /// was written)
    ///
    /// # Errors
    ///
    /// Returns Conflict naming the first key whose committed state differs
    /// from what this invocation observed.
    pub fn commit(self) -> Result<Version, StoreError> {
        let mut committed = self.store.committed.write();

        for (key, observed) in &self.reads {
            let current = committed.entries.get(key).map(|(v, _)| *v);
            if current != *observed {
                return Err(StoreError::Conflict { key: key.clone() });
            }
        }

        for range in &self.ranges {
            let mut current = committed.range(&range.low, &range.high);
            for (key, version) in &range.seen {
                match current.next() {
                    Some((k, (v, _))) if k == key && v == version => {}
                    Some((k, _)) => return Err(StoreError::Conflict { key: k.clone() }),
                    None => return Err(StoreError::Conflict { key: key.clone() }),
                }
            }
            if let Some((k, _)) = current.next() {
                return Err(StoreError::Conflict { key: k.clone() });
            }
        }

        if self.writes.is_empty() {
            return Ok(committed.version);
        }

        committed.version += 1;
        let version = committed.version;
        let count = self.writes.len();
        for (key, value) in self.writes {
            committed.entries.insert(key, (version, value));
        }
        debug!(version, writes = count, "Committed invocation");
        Ok(version)
    }
}

impl KeyValueStore for Invocation<'_> {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(value) = self.writes.get(key) {
            return Ok(Some(value.clone()));
        }

        let committed = self.store.committed.read();
        let entry = committed.entries.get(key);
        self.reads
            .entry(key.to_string())
            .or_insert_with(|| entry.map(|(v, _)| *v));
        trace!(key = %key.escape_default(), found = entry.is_some(), "Read");
        Ok(entry.map(|(_, value)| value.clone()))
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn range_scan(&mut self, low: &str, high: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        if low >= high {
            return Ok(Vec::new());
        }

        let mut merged: BTreeMap<String, Vec<u8>> = BTreeMap::new();
        let mut seen = Vec::new();
        {
            let committed = self.store.committed.read();
            for (key, (version, value)) in committed.range(low, high) {
                seen.push((key.clone(), *version));
                merged.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in self.writes.range::<str, _>((Bound::Included(low), Bound::Excluded(high))) {
            merged.insert(key.clone(), value.clone());
        }

        self.ranges.push(RangeRead {
            low: low.to_string(),
            high: high.to_string(),
            seen,
        });
        Ok(merged.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(store: &VersionedStore, entries: &[(&str, &str)]) {
        let mut invocation = store.begin();
        for (key, value) in entries {
            invocation.put(key, value.as_bytes().to_vec()).unwrap();
        }
        invocation.commit().unwrap();
    }

    #[test]
    fn test_read_your_writes() {
        let store = VersionedStore::new();
        let mut invocation = store.begin();
        invocation.put("k", b"v".to_vec()).unwrap();

        assert_eq!(invocation.get("k").unwrap(), Some(b"v".to_vec()));
        assert!(store.is_empty());

        invocation.commit().unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_dropped_invocation_discards_writes() {
        let store = VersionedStore::new();
        {
            let mut invocation = store.begin();
            invocation.put("k", b"v".to_vec()).unwrap();
            assert_eq!(invocation.pending_writes(), 1);
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_stale_read_conflicts() {
        let store = VersionedStore::new();
        seed(&store, &[("balance", "100")]);

        let mut first = store.begin();
        let mut second = store.begin();
        first.get("balance").unwrap();
        second.get("balance").unwrap();
        first.put("balance", b"50".to_vec()).unwrap();
        second.put("balance", b"70".to_vec()).unwrap();

        first.commit().unwrap();
        let err = second.commit().unwrap_err();
        assert_eq!(err, StoreError::Conflict { key: "balance".to_string() });

        let mut check = store.begin();
        assert_eq!(check.get("balance").unwrap(), Some(b"50".to_vec()));
    }

    #[test]
    fn test_read_of_absent_key_conflicts_when_created() {
        let store = VersionedStore::new();
        let mut reader = store.begin();
        assert_eq!(reader.get("k").unwrap(), None);
        reader.put("other", b"x".to_vec()).unwrap();

        seed(&store, &[("k", "v")]);
        assert!(matches!(reader.commit(), Err(StoreError::Conflict { .. })));
    }

    #[test]
    fn test_phantom_in_scanned_range_conflicts() {
        let store = VersionedStore::new();
        seed(&store, &[("a1", "x")]);

        let mut scanner = store.begin();
        assert_eq!(scanner.range_scan("a", "b").unwrap().len(), 1);
        scanner.put("summary", b"1".to_vec()).unwrap();

        seed(&store, &[("a2", "y")]);
        let err = scanner.commit().unwrap_err();
        assert_eq!(err, StoreError::Conflict { key: "a2".to_string() });
    }

    #[test]
    fn test_disjoint_invocations_both_commit() {
        let store = VersionedStore::new();
        seed(&store, &[("a", "1"), ("b", "1")]);

        let mut first = store.begin();
        let mut second = store.begin();
        first.get("a").unwrap();
        second.get("b").unwrap();
        first.put("a", b"2".to_vec()).unwrap();
        second.put("b", b"2".to_vec()).unwrap();

        assert!(first.commit().is_ok());
        assert!(second.commit().is_ok());
        assert_eq!(store.version(), 3);
    }

    #[test]
    fn test_range_scan_merges_pending_writes() {
        let store = VersionedStore::new();
        seed(&store, &[("a1", "old"), ("a3", "x")]);

        let mut invocation = store.begin();
        invocation.put("a1", b"new".to_vec()).unwrap();
        invocation.put("a2", b"y".to_vec()).unwrap();

        let entries = invocation.range_scan("a", "b").unwrap();
        assert_eq!(
            entries,
            vec![
                ("a1".to_string(), b"new".to_vec()),
                ("a2".to_string(), b"y".to_vec()),
                ("a3".to_string(), b"x".to_vec()),
            ]
        );
    }

    #[test]
    fn test_read_only_commit_keeps_version() {
        let store = VersionedStore::new();
        seed(&store, &[("a", "1")]);

        let mut reader = store.begin();
        reader.get("a").unwrap();
        assert_eq!(reader.commit().unwrap(), 1);
        assert_eq!(store.version(), 1);
    }
}
