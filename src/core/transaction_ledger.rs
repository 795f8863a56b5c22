//! Append-only storage for transaction legs
//!
//! Legs are keyed by `Transaction\0<customer_id>\0<account_id>\0<leg_id>\0`,
//! so all legs of one account share a prefix and can be listed with a single
//! range scan. A leg's ID is the SHA-256 of its stored encoding with the ID
//! left empty.

use crate::core::id_generator::IdGenerator;
use crate::core::record_store::RecordStore;
use crate::core::traits::{Clock, KeyValueStore};
use crate::types::record::encode;
use crate::types::transaction::sort_newest_first;
use crate::types::{FailureCode, LedgerError, Transaction, Transfer, TxStatus};
use tracing::debug;

/// Leg storage over a borrowed key-value store
pub struct TransactionLedger<'a, S: KeyValueStore + ?Sized> {
    records: RecordStore<'a, S>,
    ids: IdGenerator,
    clock: &'a dyn Clock,
}

impl<'a, S: KeyValueStore + ?Sized> TransactionLedger<'a, S> {
    pub fn new(store: &'a mut S, ids: IdGenerator, clock: &'a dyn Clock) -> Self {
        TransactionLedger {
            records: RecordStore::new(store),
            ids,
            clock,
        }
    }

    /// Record one leg of a transfer against an account
    ///
    /// # Arguments
    ///
    /// * `customer_id` / `account_id` - The account the leg belongs to
    /// * `transfer` - The originating request
    /// * `failure_code` - Why the transfer was rejected, for `failed` legs
    /// * `status` - Outcome of this side
    ///
    /// # Returns
    ///
    /// The stored leg, with its content-derived ID
    pub fn record_leg(
        &mut self,
        customer_id: &str,
        account_id: &str,
        transfer: &Transfer,
        failure_code: Option<FailureCode>,
        status: TxStatus,
    ) -> Result<Transaction, LedgerError> {
        let mut leg = Transaction::from_transfer(
            customer_id,
            account_id,
            transfer,
            failure_code,
            status,
            self.clock.now(),
        );
        leg.id = self.ids.new_leg_id(&encode(&leg)?);

        self.records.put(&leg)?;
        debug!(customer_id, account_id, leg_id = %leg.id, %status, "Recorded leg");
        Ok(leg)
    }

    /// Look up a leg
    ///
    /// # Errors
    ///
    /// Returns TransactionNotFound if no such leg exists.
    pub fn get(
        &mut self,
        customer_id: &str,
        account_id: &str,
        leg_id: &str,
    ) -> Result<Transaction, LedgerError> {
        self.records
            .get(&[customer_id, account_id, leg_id])?
            .ok_or_else(|| LedgerError::transaction_not_found(customer_id, account_id, leg_id))
    }

    /// All legs of an account, newest first
    ///
    /// Legs created in the same second keep their key order.
    pub fn list(&mut self, customer_id: &str, account_id: &str) -> Result<Vec<Transaction>, LedgerError> {
        let mut legs = self.records.scan(&[customer_id, account_id])?;
        sort_newest_first(&mut legs);
        Ok(legs)
    }
}
