//! I/O module
//!
//! Reads invocation scripts and writes run output.
//!
//! # Components
//!
//! - `csv_format` - Row conversion and output serialization
//! - `sync_reader` - Synchronous script reader with iterator interface
//! - `async_reader` - Asynchronous script reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{convert_fields, write_accounts_csv, write_responses_csv, InvocationRecord};
pub use sync_reader::SyncReader;
