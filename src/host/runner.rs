//! Invocation lifecycle on the versioned host
//!
//! Each invocation runs against a fresh [`Invocation`](super::Invocation) and
//! is committed as a unit. The write set is committed when the operation
//! succeeds or is rejected by a business rule, so failure legs persist; any
//! other error discards it. A commit that loses a read conflict is retried
//! from scratch up to `max_retries` times.

use crate::api::{LedgerService, Request, Response};
use crate::host::VersionedStore;
use crate::types::{Account, LedgerError, StoreError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs requests against a shared [`VersionedStore`]
#[derive(Clone)]
pub struct InvocationRunner {
    store: Arc<VersionedStore>,
    service: LedgerService,
    max_retries: usize,
}

impl InvocationRunner {
    /// Create a new InvocationRunner
    ///
    /// # Arguments
    ///
    /// * `store` - Committed state shared with other runners
    /// * `service` - Dispatcher for parsed requests
    /// * `max_retries` - Extra attempts after a commit conflict
    pub fn new(store: Arc<VersionedStore>, service: LedgerService, max_retries: usize) -> Self {
        InvocationRunner {
            store,
            service,
            max_retries,
        }
    }

    pub fn store(&self) -> &Arc<VersionedStore> {
        &self.store
    }

    /// Execute one request and commit its effects
    ///
    /// # Returns
    ///
    /// The operation's own result once its write set (if any) is committed
    ///
    /// # Errors
    ///
    /// Returns the operation's error, or `Store(Conflict)` if every attempt
    /// lost a commit conflict.
    pub fn run(&self, request: &Request) -> Result<Response, LedgerError> {
        let mut attempt = 0;
        loop {
            let mut invocation = self.store.begin();
            let result = self.service.handle(&mut invocation, request);

            let keep = match &result {
                Ok(_) => true,
                Err(e) => e.is_business_rule(),
            };
            if !keep {
                debug!(function = %request, "Discarding invocation writes");
                return result;
            }

            match invocation.commit() {
                Ok(_) => return result,
                Err(StoreError::Conflict { key }) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        function = %request,
                        key = %key.escape_default(),
                        attempt,
                        "Commit conflict, retrying invocation"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Every committed account, in key order
    pub fn accounts(&self) -> Result<Vec<Account>, LedgerError> {
        let mut invocation = self.store.begin();
        let mut engine = self.service.engine(&mut invocation);
        engine.all_accounts()
    }
}
