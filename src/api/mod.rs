//! Public operation surface
//!
//! - `request` - The closed set of operations and their argument parsing
//! - `response` - Operation results and their JSON payloads
//! - `service` - Dispatch of requests onto the transfer engine

pub mod request;
pub mod response;
pub mod service;

pub use request::{Request, FUNCTIONS};
pub use response::Response;
pub use service::LedgerService;
