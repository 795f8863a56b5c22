//! Typed access to ledger records over a [`KeyValueStore`]
//!
//! `RecordStore` joins the key codec and the record envelope: records are
//! written under the composite key built from their own key attributes and
//! read back by attribute values or by prefix.

use crate::core::key_codec::{build_key, build_prefix_range};
use crate::core::traits::KeyValueStore;
use crate::types::record::{decode, encode};
use crate::types::{LedgerError, LedgerRecord};
use tracing::warn;

/// Typed view over a borrowed key-value store
pub struct RecordStore<'a, S: KeyValueStore + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: KeyValueStore + ?Sized> RecordStore<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        RecordStore { store }
    }

    /// Persist a record under the key formed by its attributes
    pub fn put<R: LedgerRecord>(&mut self, record: &R) -> Result<(), LedgerError> {
        let key = build_key(R::OBJECT_TYPE, &record.key_attributes())?;
        let value = encode(record)?;
        self.store.put(&key, value)?;
        Ok(())
    }

    /// Point lookup by key attributes
    ///
    /// A stored value that fails to decode is an error here; only scans skip
    /// undecodable entries.
    pub fn get<R: LedgerRecord>(&mut self, attrs: &[&str]) -> Result<Option<R>, LedgerError> {
        let key = build_key(R::OBJECT_TYPE, attrs)?;
        match self.store.get(&key)? {
            Some(bytes) => decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// All records whose keys start with the given attributes, in key order
    ///
    /// Entries that fail to decode are logged and skipped.
    pub fn scan<R: LedgerRecord>(&mut self, attrs: &[&str]) -> Result<Vec<R>, LedgerError> {
        let (low, high) = build_prefix_range(R::OBJECT_TYPE, attrs)?;
        let entries = self.store.range_scan(&low, &high)?;

        let mut records = Vec::with_capacity(entries.len());
        for (key, bytes) in entries {
            match decode::<R>(&bytes) {
                Ok(record) => records.push(record),
                Err(e) => warn!(key = %key.escape_default(), error = %e, "Skipping undecodable entry"),
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryStore;
    use crate::types::{ObjectType, User};

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            name: format!("user {}", id),
        }
    }

    #[test]
    fn test_put_then_get() {
        let mut store = MemoryStore::new();
        let mut records = RecordStore::new(&mut store);
        records.put(&user("1")).unwrap();

        assert_eq!(records.get::<User>(&["1"]).unwrap(), Some(user("1")));
        assert_eq!(records.get::<User>(&["2"]).unwrap(), None);
    }

    #[test]
    fn test_get_propagates_decode_error() {
        let mut store = MemoryStore::new();
        let key = build_key(ObjectType::User, &["1"]).unwrap();
        store.put(&key, b"not json".to_vec()).unwrap();

        let result = RecordStore::new(&mut store).get::<User>(&["1"]);
        assert!(matches!(result, Err(LedgerError::Decode { .. })));
    }

    #[test]
    fn test_scan_skips_undecodable_entries() {
        let mut store = MemoryStore::new();
        let bad_key = build_key(ObjectType::User, &["2"]).unwrap();
        store.put(&bad_key, b"{".to_vec()).unwrap();

        let mut records = RecordStore::new(&mut store);
        records.put(&user("1")).unwrap();
        records.put(&user("3")).unwrap();

        let users: Vec<User> = records.scan(&[]).unwrap();
        assert_eq!(users, vec![user("1"), user("3")]);
    }
}
