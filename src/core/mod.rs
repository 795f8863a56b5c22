//! Core ledger module
//!
//! This module contains the ledger's business logic, written against the
//! abstract [`KeyValueStore`] collaborator:
//! - `traits` - The key-value store and clock abstractions
//! - `key_codec` - Composite keys and prefix ranges
//! - `id_generator` - Account numbers and content-hash leg IDs
//! - `record_store` - Typed record access over a key-value store
//! - `account_store` - Account CRUD and listings
//! - `transaction_ledger` - Append-only leg storage
//! - `engine` - The transfer state machine and operation entry points
//! - `clock` - System and manual clocks

pub mod account_store;
pub mod clock;
pub mod engine;
pub mod id_generator;
pub mod key_codec;
pub mod record_store;
pub mod traits;
pub mod transaction_ledger;

pub use account_store::AccountStore;
pub use clock::{ManualClock, SystemClock};
pub use engine::{TransferEngine, TransferState};
pub use id_generator::IdGenerator;
pub use traits::{Clock, KeyValueStore};
pub use transaction_ledger::TransactionLedger;
