//! Transfer engine
//!
//! This module provides the TransferEngine, which orchestrates every ledger
//! operation by coordinating the AccountStore and TransactionLedger views of
//! one invocation's key-value store.
//!
//! A transfer moves through these states:
//!
//! ```text
//! Validating -> LoadingAccounts -> EvaluatingRules -> Committing -> Done
//!      |              |                  |
//!      +--------------+------------------+--> Rejected
//! ```
//!
//! The engine enforces business rules such as:
//! - Every read needed for a decision happens before the first write
//! - A closed account on either side rejects the transfer
//! - The paying account must cover amount plus fee
//! - A rejection after the accounts were loaded is recorded as a failure leg
//!   before the error is returned, and no balance changes

use crate::core::account_store::AccountStore;
use crate::core::id_generator::IdGenerator;
use crate::core::traits::{Clock, KeyValueStore};
use crate::core::transaction_ledger::TransactionLedger;
use crate::types::{Account, FailureCode, LedgerError, Transaction, Transfer, TxStatus};
use tracing::{debug, instrument};

/// Stages of a single transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    Validating,
    LoadingAccounts,
    EvaluatingRules,
    Committing,
    Done,
    Rejected,
}

/// Ledger operations over one invocation's store
///
/// The engine borrows the store for the duration of an invocation and keeps
/// no copies of accounts or legs between calls.
pub struct TransferEngine<'a, S: KeyValueStore + ?Sized> {
    store: &'a mut S,
    ids: IdGenerator,
    clock: &'a dyn Clock,
}

impl<'a, S: KeyValueStore + ?Sized> TransferEngine<'a, S> {
    /// Create a new TransferEngine
    ///
    /// # Arguments
    ///
    /// * `store` - The invocation's key-value store
    /// * `ids` - Account and leg ID generator
    /// * `clock` - Time source for `created` fields
    pub fn new(store: &'a mut S, ids: IdGenerator, clock: &'a dyn Clock) -> Self {
        TransferEngine { store, ids, clock }
    }

    fn accounts(&mut self) -> AccountStore<'_, S> {
        AccountStore::new(&mut *self.store, self.ids, self.clock)
    }

    fn ledger(&mut self) -> TransactionLedger<'_, S> {
        TransactionLedger::new(&mut *self.store, self.ids, self.clock)
    }

    /// Open an account from its JSON representation
    pub fn open_account(&mut self, raw: &str) -> Result<Account, LedgerError> {
        self.accounts().open(raw)
    }

    /// Soft-close an account
    pub fn close_account(&mut self, customer_id: &str, account_id: &str) -> Result<Account, LedgerError> {
        self.accounts().close(customer_id, account_id)
    }

    pub fn get_account(&mut self, customer_id: &str, account_id: &str) -> Result<Account, LedgerError> {
        self.accounts().get(customer_id, account_id)
    }

    pub fn get_account_list(&mut self, customer_id: &str) -> Result<Vec<Account>, LedgerError> {
        self.accounts().list(customer_id)
    }

    /// Every account in the store, in key order
    pub fn all_accounts(&mut self) -> Result<Vec<Account>, LedgerError> {
        self.accounts().list_all()
    }

    /// Credit an account directly, without recording a leg
    pub fn topup_account(
        &mut self,
        customer_id: &str,
        account_id: &str,
        amount: i64,
    ) -> Result<Account, LedgerError> {
        self.accounts().topup(customer_id, account_id, amount)
    }

    pub fn get_transaction(
        &mut self,
        customer_id: &str,
        account_id: &str,
        leg_id: &str,
    ) -> Result<Transaction, LedgerError> {
        self.ledger().get(customer_id, account_id, leg_id)
    }

    /// Legs of one account, newest first
    pub fn get_transaction_list(
        &mut self,
        customer_id: &str,
        account_id: &str,
    ) -> Result<Vec<Transaction>, LedgerError> {
        self.ledger().list(customer_id, account_id)
    }

    /// Execute a transfer
    ///
    /// # Arguments
    ///
    /// * `transfer` - The transfer request
    ///
    /// # Returns
    ///
    /// * `Ok(())` once both accounts and both legs are written
    /// * `Err(LedgerError)` if the transfer was rejected
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request is invalid (Validation; nothing read or written)
    /// - Either account is missing (AccountNotFound; nothing written)
    /// - Either account is closed (AccountClosed; failure leg written)
    /// - The paying account cannot cover amount plus fee (InsufficientFunds;
    ///   failure leg written)
    /// - The store rejects a read or write
    #[instrument(
        skip(self, transfer),
        fields(
            from_customer = %transfer.from_customer_id,
            from_account = %transfer.from_account_id,
            to_customer = %transfer.to_customer_id,
            to_account = %transfer.to_account_id,
            amount = transfer.amount_cents,
        )
    )]
    pub fn transfer(&mut self, transfer: &Transfer) -> Result<(), LedgerError> {
        let result = self.run_transfer(transfer);
        if let Err(e) = &result {
            debug!(state = ?TransferState::Rejected, error = %e, "Transfer rejected");
        }
        result
    }

    fn run_transfer(&mut self, transfer: &Transfer) -> Result<(), LedgerError> {
        enter(TransferState::Validating);
        transfer.validate()?;
        let total = transfer
            .total_debit_cents()
            .ok_or_else(|| LedgerError::validation("amount plus fee overflows"))?;

        enter(TransferState::LoadingAccounts);
        let mut from = self
            .accounts()
            .get(&transfer.from_customer_id, &transfer.from_account_id)?;
        let to = if transfer.is_self_transfer() {
            None
        } else {
            Some(
                self.accounts()
                    .get(&transfer.to_customer_id, &transfer.to_account_id)?,
            )
        };

        enter(TransferState::EvaluatingRules);
        let to_closed = to.as_ref().map_or(from.is_closed, |to| to.is_closed);
        if from.is_closed {
            return Err(self.reject(
                &transfer.from_customer_id,
                &transfer.from_account_id,
                transfer,
                FailureCode::AccountClosed,
                LedgerError::account_closed(&transfer.from_customer_id, &transfer.from_account_id),
            ));
        }
        if to_closed {
            return Err(self.reject(
                &transfer.to_customer_id,
                &transfer.to_account_id,
                transfer,
                FailureCode::AccountClosed,
                LedgerError::account_closed(&transfer.to_customer_id, &transfer.to_account_id),
            ));
        }
        let covered = from
            .balance_cents()
            .checked_sub(total)
            .is_some_and(|remaining| remaining >= 0);
        if !covered {
            let balance = from.balance_cents();
            return Err(self.reject(
                &transfer.from_customer_id,
                &transfer.from_account_id,
                transfer,
                FailureCode::InsufficientFunds,
                LedgerError::insufficient_funds(
                    &transfer.from_customer_id,
                    &transfer.from_account_id,
                    balance,
                    total,
                ),
            ));
        }

        enter(TransferState::Committing);
        from.debit(total);
        self.accounts().save(&from)?;
        self.ledger().record_leg(
            &transfer.from_customer_id,
            &transfer.from_account_id,
            transfer,
            None,
            TxStatus::Debited,
        )?;

        // A self-transfer credits the copy that was just debited.
        let mut to = to.unwrap_or(from);
        to.credit(transfer.amount_cents);
        self.accounts().save(&to)?;
        self.ledger().record_leg(
            &transfer.to_customer_id,
            &transfer.to_account_id,
            transfer,
            None,
            TxStatus::Credited,
        )?;

        enter(TransferState::Done);
        Ok(())
    }

    /// Record a failure leg, then hand back the rule error
    ///
    /// A store error while recording takes precedence over the rule error.
    fn reject(
        &mut self,
        customer_id: &str,
        account_id: &str,
        transfer: &Transfer,
        code: FailureCode,
        error: LedgerError,
    ) -> LedgerError {
        match self
            .ledger()
            .record_leg(customer_id, account_id, transfer, Some(code), TxStatus::Failed)
        {
            Ok(_) => error,
            Err(store_error) => store_error,
        }
    }
}

fn enter(state: TransferState) {
    debug!(?state, "Transfer state");
}
