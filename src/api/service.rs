//! Request dispatch
//!
//! `LedgerService` turns one [`Request`] into calls on a [`TransferEngine`]
//! bound to the invocation's store. Dispatch is a single exhaustive match, so
//! adding an operation without handling it does not compile.

use crate::api::{Request, Response};
use crate::config::LedgerConfig;
use crate::core::clock::SystemClock;
use crate::core::id_generator::IdGenerator;
use crate::core::traits::{Clock, KeyValueStore};
use crate::core::TransferEngine;
use crate::types::{AccountList, LedgerError, TransactionList};
use std::sync::Arc;
use tracing::debug;

/// Stateless entry point for ledger invocations
#[derive(Clone)]
pub struct LedgerService {
    config: LedgerConfig,
    clock: Arc<dyn Clock>,
}

impl LedgerService {
    /// Create a service using the system clock
    pub fn new(config: LedgerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: LedgerConfig, clock: Arc<dyn Clock>) -> Self {
        LedgerService { config, clock }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Bind an engine to a store for one invocation
    pub fn engine<'a, S: KeyValueStore + ?Sized>(&'a self, store: &'a mut S) -> TransferEngine<'a, S> {
        TransferEngine::new(
            store,
            IdGenerator::new(self.config.account_id_length),
            self.clock.as_ref(),
        )
    }

    /// Execute a parsed request against a store
    pub fn handle<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        request: &Request,
    ) -> Result<Response, LedgerError> {
        debug!(function = %request, "Handling invocation");
        let mut engine = self.engine(store);

        let response = match request {
            Request::OpenAccount { raw } => Response::Account(engine.open_account(raw)?),
            Request::CloseAccount {
                customer_id,
                account_id,
            } => Response::Account(engine.close_account(customer_id, account_id)?),
            Request::GetAccount {
                customer_id,
                account_id,
            } => Response::Account(engine.get_account(customer_id, account_id)?),
            Request::GetAccountList { customer_id } => Response::AccountList(AccountList {
                accounts: engine.get_account_list(customer_id)?,
            }),
            Request::TopupAccount {
                customer_id,
                account_id,
                amount,
            } => Response::Account(engine.topup_account(customer_id, account_id, *amount)?),
            Request::TransferMoney { transfer } => {
                engine.transfer(transfer)?;
                Response::Empty
            }
            Request::GetTransaction {
                customer_id,
                account_id,
                leg_id,
            } => Response::Transaction(engine.get_transaction(customer_id, account_id, leg_id)?),
            Request::GetTransactionList {
                customer_id,
                account_id,
            } => Response::TransactionList(TransactionList {
                transactions: engine.get_transaction_list(customer_id, account_id)?,
            }),
        };
        Ok(response)
    }

    /// Parse and execute a `(function, args)` invocation
    pub fn invoke<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        function: &str,
        args: &[String],
    ) -> Result<Response, LedgerError> {
        let request = Request::parse(function, args)?;
        self.handle(store, &request)
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}
