//! Error types for the transfer ledger
//!
//! This module defines the errors raised by the ledger core and by the
//! key-value collaborator it runs on.
//!
//! # Error Categories
//!
//! - **Validation**: missing or malformed input, surfaced before any state is touched
//! - **NotFound**: a referenced account or transaction leg is absent
//! - **BusinessRule**: insufficient funds or a closed account; a failure leg has
//!   already been recorded when this error is returned
//! - **Collaborator**: the key-value store rejected a read or write

use thiserror::Error;

/// Errors raised by a key-value store binding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store failed for a binding-specific reason
    #[error("Store backend error: {message}")]
    Backend {
        /// Description of the failure
        message: String,
    },

    /// `insert_row` found an existing row with the same key
    #[error("Row with given key already exists in table {table}")]
    RowExists {
        /// Table name
        table: String,
    },

    /// `replace_row` found no row with the given key
    #[error("Row with given key does not exist in table {table}")]
    RowMissing {
        /// Table name
        table: String,
    },

    /// A row's key arity does not match the table's key columns
    #[error("Key schema mismatch for table {table}: expected {expected} key columns, got {actual}")]
    KeySchema {
        /// Table name
        table: String,
        /// Number of key columns defined for the table
        expected: usize,
        /// Number of key values supplied
        actual: usize,
    },

    /// A value read by the invocation changed before it could commit
    #[error("Read conflict on key {key:?}")]
    Conflict {
        /// Composite key whose version changed
        key: String,
    },
}

/// Coarse classification of a [`LedgerError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    BusinessRule,
    Collaborator,
}

impl ErrorCategory {
    /// Snake-case label used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::BusinessRule => "business_rule",
            ErrorCategory::Collaborator => "collaborator",
        }
    }
}

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A required field is missing or an input value is malformed
    #[error("{message}")]
    Validation {
        /// Stable, human-readable message (e.g. "missing customer_id")
        message: String,
    },

    /// A JSON payload could not be decoded
    #[error("Error decoding {what}: {message}")]
    Decode {
        /// What was being decoded (e.g. "account")
        what: String,
        /// Decoder message
        message: String,
    },

    /// The invocation named a function the ledger does not expose
    #[error("Handler function with name \"{name}\" not registered")]
    UnknownFunction {
        /// Requested function name
        name: String,
    },

    /// OpenAccount was asked to create an account that already exists
    #[error("Account {account_id} already exists for customer {customer_id}")]
    AccountExists {
        customer_id: String,
        account_id: String,
    },

    /// Referenced account does not exist
    #[error("Account {account_id} for customer {customer_id} not found")]
    AccountNotFound {
        customer_id: String,
        account_id: String,
    },

    /// Referenced transaction leg does not exist
    #[error("Transaction {leg_id} for account {account_id} of customer {customer_id} not found")]
    TransactionNotFound {
        customer_id: String,
        account_id: String,
        leg_id: String,
    },

    /// The paying account cannot cover amount plus fee
    ///
    /// A failure leg with code `insufficient_funds` has been recorded.
    #[error(
        "Insufficient funds in account {account_id} for customer {customer_id}: balance {balance}, requested {requested}"
    )]
    InsufficientFunds {
        customer_id: String,
        account_id: String,
        /// Balance in cents at the time of the check
        balance: i64,
        /// Amount plus fee in cents
        requested: i64,
    },

    /// One side of the transfer is closed
    ///
    /// A failure leg with code `account_closed` has been recorded.
    #[error("Account {account_id} for customer {customer_id} is closed")]
    AccountClosed {
        customer_id: String,
        account_id: String,
    },

    /// The key-value collaborator rejected a read or write
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Classify this error into the ledger's error taxonomy
    pub fn category(&self) -> ErrorCategory {
        match self {
            LedgerError::Validation { .. }
            | LedgerError::Decode { .. }
            | LedgerError::UnknownFunction { .. }
            | LedgerError::AccountExists { .. } => ErrorCategory::Validation,
            LedgerError::AccountNotFound { .. } | LedgerError::TransactionNotFound { .. } => {
                ErrorCategory::NotFound
            }
            LedgerError::InsufficientFunds { .. } | LedgerError::AccountClosed { .. } => {
                ErrorCategory::BusinessRule
            }
            LedgerError::Store(_) => ErrorCategory::Collaborator,
        }
    }

    /// True when a failure leg was written before this error was returned
    pub fn is_business_rule(&self) -> bool {
        self.category() == ErrorCategory::BusinessRule
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation {
            message: message.into(),
        }
    }

    /// Create a Decode error
    pub fn decode(what: &str, error: impl std::fmt::Display) -> Self {
        LedgerError::Decode {
            what: what.to_string(),
            message: error.to_string(),
        }
    }

    /// Create an UnknownFunction error
    pub fn unknown_function(name: &str) -> Self {
        LedgerError::UnknownFunction {
            name: name.to_string(),
        }
    }

    /// Create an AccountExists error
    pub fn account_exists(customer_id: &str, account_id: &str) -> Self {
        LedgerError::AccountExists {
            customer_id: customer_id.to_string(),
            account_id: account_id.to_string(),
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(customer_id: &str, account_id: &str) -> Self {
        LedgerError::AccountNotFound {
            customer_id: customer_id.to_string(),
            account_id: account_id.to_string(),
        }
    }

    /// Create a TransactionNotFound error
    pub fn transaction_not_found(customer_id: &str, account_id: &str, leg_id: &str) -> Self {
        LedgerError::TransactionNotFound {
            customer_id: customer_id.to_string(),
            account_id: account_id.to_string(),
            leg_id: leg_id.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(
        customer_id: &str,
        account_id: &str,
        balance: i64,
        requested: i64,
    ) -> Self {
        LedgerError::InsufficientFunds {
            customer_id: customer_id.to_string(),
            account_id: account_id.to_string(),
            balance,
            requested,
        }
    }

    /// Create an AccountClosed error
    pub fn account_closed(customer_id: &str, account_id: &str) -> Self {
        LedgerError::AccountClosed {
            customer_id: customer_id.to_string(),
            account_id: account_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::validation(
        LedgerError::validation("missing customer_id"),
        "missing customer_id"
    )]
    #[case::unknown_function(
        LedgerError::unknown_function("Foo"),
        "Handler function with name \"Foo\" not registered"
    )]
    #[case::account_not_found(
        LedgerError::account_not_found("1", "1234"),
        "Account 1234 for customer 1 not found"
    )]
    #[case::insufficient_funds(
        LedgerError::insufficient_funds("1", "1234", 100, 1000),
        "Insufficient funds in account 1234 for customer 1: balance 100, requested 1000"
    )]
    #[case::account_closed(
        LedgerError::account_closed("1", "1234"),
        "Account 1234 for customer 1 is closed"
    )]
    #[case::store(
        LedgerError::Store(StoreError::RowMissing { table: "Account".to_string() }),
        "Store error: Row with given key does not exist in table Account"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::validation(LedgerError::validation("x"), ErrorCategory::Validation)]
    #[case::decode(LedgerError::decode("account", "eof"), ErrorCategory::Validation)]
    #[case::exists(LedgerError::account_exists("1", "2"), ErrorCategory::Validation)]
    #[case::not_found(LedgerError::account_not_found("1", "2"), ErrorCategory::NotFound)]
    #[case::leg_not_found(
        LedgerError::transaction_not_found("1", "2", "ab"),
        ErrorCategory::NotFound
    )]
    #[case::funds(LedgerError::insufficient_funds("1", "2", 0, 1), ErrorCategory::BusinessRule)]
    #[case::closed(LedgerError::account_closed("1", "2"), ErrorCategory::BusinessRule)]
    #[case::store(
        LedgerError::Store(StoreError::Conflict { key: "k".to_string() }),
        ErrorCategory::Collaborator
    )]
    fn test_error_category(#[case] error: LedgerError, #[case] expected: ErrorCategory) {
        assert_eq!(error.category(), expected);
    }

    #[test]
    fn test_store_error_conversion() {
        let error: LedgerError = StoreError::Backend {
            message: "disk full".to_string(),
        }
        .into();
        assert!(matches!(error, LedgerError::Store(StoreError::Backend { .. })));
        assert!(!error.is_business_rule());
    }
}
