//! Account-related types for the transfer ledger
//!
//! This module defines the Account entity and its two balance operations.

use crate::types::record::{LedgerRecord, ObjectType};
use crate::types::{timestamp, Params};
use serde::{Deserialize, Serialize};

/// A customer's bank account
///
/// Accounts are addressed by `(customer_id, id)`. The balance is held in
/// cents and can only change through [`Account::debit`] and
/// [`Account::credit`]; closing an account is a soft delete that keeps the
/// balance and its history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    /// Account number, unique per customer
    pub id: String,

    /// Owning customer
    pub customer_id: String,

    pub bank_name: String,

    pub account_holder: String,

    pub description: String,

    /// ISO country code (e.g. "AU")
    #[serde(rename = "country")]
    pub country_code: String,

    /// ISO currency code (e.g. "AUD")
    #[serde(rename = "currency")]
    pub currency_code: String,

    /// Creation instant in Unix seconds; RFC 3339 on the wire
    #[serde(rename = "created", with = "timestamp::rfc3339_or_zero")]
    pub created_at: i64,

    /// Balance in cents
    #[serde(rename = "balance")]
    balance_cents: i64,

    #[serde(rename = "default_account")]
    pub is_default: bool,

    #[serde(rename = "closed")]
    pub is_closed: bool,

    /// Additional name/value pairs, omitted from output when empty
    #[serde(skip_serializing_if = "Params::is_empty")]
    pub params: Params,
}

impl Account {
    /// Create an empty, open account for a customer
    ///
    /// # Arguments
    ///
    /// * `customer_id` - The owning customer
    /// * `id` - The account number (may be empty to have one generated on open)
    pub fn new(customer_id: impl Into<String>, id: impl Into<String>) -> Self {
        Account {
            customer_id: customer_id.into(),
            id: id.into(),
            ..Default::default()
        }
    }

    /// Current balance in cents
    pub fn balance_cents(&self) -> i64 {
        self.balance_cents
    }

    /// Subtract `amount` cents from the balance
    ///
    /// No sign or sufficiency check is performed here; callers apply business
    /// rules first. Arithmetic wraps, so `debit(n)` followed by `credit(n)`
    /// always restores the original balance.
    pub fn debit(&mut self, amount: i64) {
        self.balance_cents = self.balance_cents.wrapping_sub(amount);
    }

    /// Add `amount` cents to the balance
    ///
    /// Like [`Account::debit`], performs no sign validation.
    pub fn credit(&mut self, amount: i64) {
        self.balance_cents = self.balance_cents.wrapping_add(amount);
    }
}

impl LedgerRecord for Account {
    const OBJECT_TYPE: ObjectType = ObjectType::Account;

    fn key_attributes(&self) -> Vec<&str> {
        vec![&self.customer_id, &self.id]
    }
}

/// Response payload for account listings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountList {
    pub accounts: Vec<Account>,
}
