//! Transfer Ledger Library
//! # Overview
//!
//! A double-entry money-transfer ledger written against an abstract
//! key-value store, plus a reference host that runs invocation scripts with
//! a sync and an async strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Data types (Account, Transfer, Transaction, errors)
//! - [`core`] - Business logic components:
//!   - [`core::key_codec`] - Composite keys and prefix ranges
//!   - [`core::id_generator`] - Account numbers and leg IDs
//!   - [`core::account_store`] - Account CRUD and listings
//!   - [`core::transaction_ledger`] - Append-only leg storage
//!   - [`core::engine`] - The transfer state machine
//! - [`api`] - Requests, responses and dispatch
//! - [`host`] - Key-value bindings, versioned store and invocation runner
//! - [`io`] - Script reading and output writing
//! - [`strategy`] - Sync and async script runs
//! - [`cli`] / [`config`] / [`logging`] - Process setup
//!
//! # Operations
//!
//! - **OpenAccount**: Create an account from a JSON document
//! - **CloseAccount**: Mark an account closed; it stays readable
//! - **GetAccount** / **GetAccountList**: Read one account or a customer's accounts
//! - **TopupAccount**: Add cents to a balance
//! - **TransferMoney**: Debit one account, credit another and record both legs
//! - **GetTransaction** / **GetTransactionList**: Read legs, newest first
//!
//! # Money
//!
//! All amounts are integer cents. A transfer debits `amount + fee` and
//! credits `amount`; the fee leaves the system.

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod host;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use api::{LedgerService, Request, Response};
pub use config::LedgerConfig;
pub use core::{KeyValueStore, TransferEngine};
pub use types::{Account, LedgerError, StoreError, Transaction, Transfer};
