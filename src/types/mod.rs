//! Types module
//!
//! Contains the ledger's data structures and their wire representation.
//! This module organizes types into logical submodules:
//! - `account`: Account entity and its balance operations
//! - `transfer`: Transfer request and its validation
//! - `transaction`: Transaction legs (immutable audit records)
//! - `reference`: User and exchange-rate snapshot records
//! - `record`: Object types and the persisted record envelope
//! - `timestamp`: RFC 3339 serialization boundary for Unix-second fields
//! - `error`: Error types for the ledger and its key-value collaborator

use std::collections::BTreeMap;

pub mod account;
pub mod error;
pub mod record;
pub mod reference;
pub mod timestamp;
pub mod transaction;
pub mod transfer;

pub use account::{Account, AccountList};
pub use error::{ErrorCategory, LedgerError, StoreError};
pub use record::{LedgerRecord, ObjectType};
pub use reference::{Rates, User};
pub use transaction::{FailureCode, Transaction, TransactionList, TxStatus};
pub use transfer::Transfer;

/// Free-form name/value pairs attached to accounts, transfers and legs
///
/// A sorted map keeps the serialized form canonical, which leg IDs depend on.
pub type Params = BTreeMap<String, String>;
