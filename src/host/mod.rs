//! Reference host
//!
//! Key-value bindings and an invocation lifecycle so the ledger core can run
//! end to end outside a real host runtime:
//! - `memory` - Write-through sorted map
//! - `table` - Legacy row/table API and its key-value adapter
//! - `mvcc` - Versioned store with per-invocation read-set validation
//! - `runner` - Commit policy and conflict retries on the versioned store
//! - `batch_processor` - Concurrent execution of customer-disjoint groups

pub mod batch_processor;
pub mod memory;
pub mod mvcc;
pub mod runner;
pub mod table;

pub use batch_processor::{BatchProcessor, PendingInvocation, ProcessingResult};
pub use memory::MemoryStore;
pub use mvcc::{Invocation, VersionedStore};
pub use runner::InvocationRunner;
pub use table::{TableBinding, TableStore};
