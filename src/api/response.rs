//! Invocation responses

use crate::types::{Account, AccountList, LedgerError, Transaction, TransactionList};
use serde::Serialize;

/// Result payload of a successful invocation
///
/// Serializes to the bare JSON of the wrapped value; list responses are
/// wrapped in an object (`{"accounts":[…]}`, `{"transactions":[…]}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Account(Account),
    AccountList(AccountList),
    Transaction(Transaction),
    TransactionList(TransactionList),
    /// Successful operation with nothing to return
    Empty,
}

impl Response {
    /// JSON payload, or an empty string for [`Response::Empty`]
    pub fn to_payload(&self) -> Result<String, LedgerError> {
        match self {
            Response::Empty => Ok(String::new()),
            other => serde_json::to_string(other)
                .map_err(|e| LedgerError::validation(format!("Error encoding response: {}", e))),
        }
    }
}
