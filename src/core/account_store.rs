//! Account storage
//!
//! This module provides the `AccountStore`, which maintains accounts in the
//! key-value store under `Account\0<customer_id>\0<account_id>\0`.
//!
//! The AccountStore is responsible for:
//! - Opening accounts (ID assignment, creation time defaulting)
//! - Point lookups and per-customer listings
//! - Soft-closing accounts and unconditional top-ups
//! - Persisting balances changed by the transfer engine

use crate::core::id_generator::IdGenerator;
use crate::core::record_store::RecordStore;
use crate::core::traits::{Clock, KeyValueStore};
use crate::types::{Account, LedgerError};
use tracing::{debug, warn};

/// Account CRUD over a borrowed key-value store
///
/// An AccountStore is a short-lived view: it is created per invocation and
/// holds no state of its own beyond its collaborators.
pub struct AccountStore<'a, S: KeyValueStore + ?Sized> {
    records: RecordStore<'a, S>,
    ids: IdGenerator,
    clock: &'a dyn Clock,
}

impl<'a, S: KeyValueStore + ?Sized> AccountStore<'a, S> {
    /// Create a new AccountStore view
    ///
    /// # Arguments
    ///
    /// * `store` - The key-value store to read and write
    /// * `ids` - Generator used for accounts opened without an ID
    /// * `clock` - Time source for creation timestamps
    pub fn new(store: &'a mut S, ids: IdGenerator, clock: &'a dyn Clock) -> Self {
        AccountStore {
            records: RecordStore::new(store),
            ids,
            clock,
        }
    }

    /// Open a new account from its JSON representation
    ///
    /// An absent `id` is replaced with a generated account number and an
    /// absent or zero `created` with the current time. A non-positive initial
    /// balance is accepted but logged.
    ///
    /// # Arguments
    ///
    /// * `raw` - Account JSON; `customer_id` is required
    ///
    /// # Returns
    ///
    /// The account as stored
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The JSON is malformed or has mistyped fields (Decode)
    /// - `customer_id` is empty (Validation)
    /// - An account with the same identity already exists (AccountExists)
    /// - The store rejects the read or write
    pub fn open(&mut self, raw: &str) -> Result<Account, LedgerError> {
        let mut account: Account =
            serde_json::from_str(raw).map_err(|e| LedgerError::decode("account", e))?;

        if account.customer_id.is_empty() {
            return Err(LedgerError::validation("missing customer_id"));
        }
        if account.id.is_empty() {
            account.id = self.ids.new_account_id();
        }
        if account.created_at == 0 {
            account.created_at = self.clock.now();
        }

        if self
            .records
            .get::<Account>(&[account.customer_id.as_str(), account.id.as_str()])?
            .is_some()
        {
            return Err(LedgerError::account_exists(&account.customer_id, &account.id));
        }

        if account.balance_cents() <= 0 {
            warn!(
                customer_id = %account.customer_id,
                account_id = %account.id,
                balance = account.balance_cents(),
                "Opening account with non-positive balance"
            );
        }

        self.records.put(&account)?;
        debug!(customer_id = %account.customer_id, account_id = %account.id, "Opened account");
        Ok(account)
    }

    /// Look up an account
    ///
    /// # Errors
    ///
    /// Returns AccountNotFound if no such account exists.
    pub fn get(&mut self, customer_id: &str, account_id: &str) -> Result<Account, LedgerError> {
        self.records
            .get(&[customer_id, account_id])?
            .ok_or_else(|| LedgerError::account_not_found(customer_id, account_id))
    }

    /// All accounts of one customer, in key order
    pub fn list(&mut self, customer_id: &str) -> Result<Vec<Account>, LedgerError> {
        self.records.scan(&[customer_id])
    }

    /// Every account in the store, in key order
    pub fn list_all(&mut self) -> Result<Vec<Account>, LedgerError> {
        self.records.scan(&[])
    }

    /// Mark an account closed
    ///
    /// Closing is a soft delete: the record, its balance and its legs stay.
    pub fn close(&mut self, customer_id: &str, account_id: &str) -> Result<Account, LedgerError> {
        let mut account = self.get(customer_id, account_id)?;
        account.is_closed = true;
        self.records.put(&account)?;
        debug!(customer_id, account_id, "Closed account");
        Ok(account)
    }

    /// Credit an account without any business-rule checks
    ///
    /// No leg is recorded and closed accounts are credited too.
    pub fn topup(
        &mut self,
        customer_id: &str,
        account_id: &str,
        amount: i64,
    ) -> Result<Account, LedgerError> {
        let mut account = self.get(customer_id, account_id)?;
        account.credit(amount);
        self.records.put(&account)?;
        debug!(customer_id, account_id, amount, balance = account.balance_cents(), "Topped up account");
        Ok(account)
    }

    /// Overwrite an account with its in-memory state
    pub fn save(&mut self, account: &Account) -> Result<(), LedgerError> {
        self.records.put(account)
    }
}
