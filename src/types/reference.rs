//! Reference records stored alongside accounts and legs
//!
//! These records share the keyspace and envelope of the ledger entities but
//! take no part in transfers. Rates snapshots are informational only; the
//! ledger never converts between currencies.
//!
//! Both kinds are reserved: no ledger operation reads or writes them yet.

use crate::types::record::{LedgerRecord, ObjectType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A ledger participant
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

impl LedgerRecord for User {
    const OBJECT_TYPE: ObjectType = ObjectType::User;

    fn key_attributes(&self) -> Vec<&str> {
        vec![&self.id]
    }
}

/// Exchange rates for a base currency on a given date
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rates {
    /// Base currency code (e.g. "AUD")
    pub base: String,
    /// Snapshot date, `YYYY-MM-DD`
    pub date: String,
    /// Quote currency code to rate
    pub rates: BTreeMap<String, f64>,
}

impl LedgerRecord for Rates {
    const OBJECT_TYPE: ObjectType = ObjectType::Rates;

    fn key_attributes(&self) -> Vec<&str> {
        vec![&self.base, &self.date]
    }
}
