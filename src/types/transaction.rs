//! Transaction leg types
//!
//! A transfer produces one leg per side on success (`debited` on the paying
//! account, `credited` on the receiving one) or a single `failed` leg when a
//! business rule rejects it. Legs are immutable once written.

use crate::types::record::{LedgerRecord, ObjectType};
use crate::types::{timestamp, Params, Transfer};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;

/// Why a transfer was rejected after the accounts were loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCode {
    InsufficientFunds,
    AccountClosed,
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCode::InsufficientFunds => write!(f, "insufficient_funds"),
            FailureCode::AccountClosed => write!(f, "account_closed"),
        }
    }
}

/// Outcome of a leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Debited,
    Credited,
    Failed,
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxStatus::Debited => write!(f, "debited"),
            TxStatus::Credited => write!(f, "credited"),
            TxStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One side of a transfer, as recorded against a single account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Content hash of the leg (empty until recorded)
    #[serde(default)]
    pub id: String,

    pub customer_id: String,

    pub account_id: String,

    #[serde(rename = "amount")]
    pub amount_cents: i64,

    #[serde(rename = "fee", default)]
    pub fee_cents: i64,

    #[serde(rename = "currency")]
    pub currency_code: String,

    /// Recording instant in Unix seconds; required on the wire
    #[serde(rename = "created", with = "timestamp::rfc3339")]
    pub created_at: i64,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub params: Params,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_code: Option<FailureCode>,

    pub status: TxStatus,
}

impl Transaction {
    /// Build an unrecorded leg for one side of a transfer
    ///
    /// The leg copies the transfer's monetary and descriptive fields. Its `id`
    /// is left empty; the ledger derives it from the leg's content.
    ///
    /// # Arguments
    ///
    /// * `customer_id` / `account_id` - The account this leg is recorded against
    /// * `transfer` - The originating request
    /// * `failure_code` - Set only for `failed` legs
    /// * `status` - Outcome of this side
    /// * `created_at` - Recording instant in Unix seconds
    pub fn from_transfer(
        customer_id: &str,
        account_id: &str,
        transfer: &Transfer,
        failure_code: Option<FailureCode>,
        status: TxStatus,
        created_at: i64,
    ) -> Self {
        Transaction {
            id: String::new(),
            customer_id: customer_id.to_string(),
            account_id: account_id.to_string(),
            amount_cents: transfer.amount_cents,
            fee_cents: transfer.fee_cents,
            currency_code: transfer.currency_code.clone(),
            created_at,
            description: transfer.description.clone(),
            params: transfer.params.clone(),
            failure_code,
            status,
        }
    }
}

impl LedgerRecord for Transaction {
    const OBJECT_TYPE: ObjectType = ObjectType::Transaction;

    fn key_attributes(&self) -> Vec<&str> {
        vec![&self.customer_id, &self.account_id, &self.id]
    }
}

/// Order legs newest first; legs created in the same second keep their order
pub fn sort_newest_first(legs: &mut [Transaction]) {
    legs.sort_by_key(|leg| Reverse(leg.created_at));
}

/// Response payload for leg listings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
}
