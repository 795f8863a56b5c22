//! Invocation requests
//!
//! A request arrives as a function name plus positional string arguments and
//! is parsed into the closed [`Request`] enum before anything touches the
//! store.

use crate::types::{LedgerError, Transfer};
use serde::Deserialize;
use std::fmt;

/// One ledger operation with its parsed arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Account JSON, decoded by the account store
    OpenAccount { raw: String },
    CloseAccount { customer_id: String, account_id: String },
    GetAccount { customer_id: String, account_id: String },
    GetAccountList { customer_id: String },
    TopupAccount { customer_id: String, account_id: String, amount: i64 },
    TransferMoney { transfer: Transfer },
    GetTransaction { customer_id: String, account_id: String, leg_id: String },
    GetTransactionList { customer_id: String, account_id: String },
}

/// Operation names, in the order they are documented
pub const FUNCTIONS: [&str; 8] = [
    "OpenAccount",
    "CloseAccount",
    "GetAccount",
    "GetAccountList",
    "TopupAccount",
    "TransferMoney",
    "GetTransaction",
    "GetTransactionList",
];

fn expect_args<'a, const N: usize>(function: &str, args: &'a [String]) -> Result<[&'a str; N], LedgerError> {
    if args.len() != N {
        return Err(LedgerError::validation(format!(
            "{} expects {} argument(s), got {}",
            function,
            N,
            args.len()
        )));
    }
    Ok(std::array::from_fn(|i| args[i].as_str()))
}

impl Request {
    /// Parse a `(function, args)` invocation
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The function name is not one of the eight operations (UnknownFunction)
    /// - The argument count does not match the operation (Validation)
    /// - A top-up amount is not an integer (Validation)
    /// - A transfer payload is not valid transfer JSON (Decode)
    pub fn parse(function: &str, args: &[String]) -> Result<Self, LedgerError> {
        let request = match function {
            "OpenAccount" => {
                let [raw] = expect_args(function, args)?;
                Request::OpenAccount {
                    raw: raw.to_string(),
                }
            }
            "CloseAccount" => {
                let [customer_id, account_id] = expect_args(function, args)?;
                Request::CloseAccount {
                    customer_id: customer_id.to_string(),
                    account_id: account_id.to_string(),
                }
            }
            "GetAccount" => {
                let [customer_id, account_id] = expect_args(function, args)?;
                Request::GetAccount {
                    customer_id: customer_id.to_string(),
                    account_id: account_id.to_string(),
                }
            }
            "GetAccountList" => {
                let [customer_id] = expect_args(function, args)?;
                Request::GetAccountList {
                    customer_id: customer_id.to_string(),
                }
            }
            "TopupAccount" => {
                let [customer_id, account_id, amount] = expect_args(function, args)?;
                let amount = amount.parse::<i64>().map_err(|_| {
                    LedgerError::validation(format!("Error parsing amount value {}", amount))
                })?;
                Request::TopupAccount {
                    customer_id: customer_id.to_string(),
                    account_id: account_id.to_string(),
                    amount,
                }
            }
            "TransferMoney" => {
                let [raw] = expect_args(function, args)?;
                let transfer =
                    serde_json::from_str(raw).map_err(|e| LedgerError::decode("transfer", e))?;
                Request::TransferMoney { transfer }
            }
            "GetTransaction" => {
                let [customer_id, account_id, leg_id] = expect_args(function, args)?;
                Request::GetTransaction {
                    customer_id: customer_id.to_string(),
                    account_id: account_id.to_string(),
                    leg_id: leg_id.to_string(),
                }
            }
            "GetTransactionList" => {
                let [customer_id, account_id] = expect_args(function, args)?;
                Request::GetTransactionList {
                    customer_id: customer_id.to_string(),
                    account_id: account_id.to_string(),
                }
            }
            other => return Err(LedgerError::unknown_function(other)),
        };
        Ok(request)
    }

    /// Operation name
    pub fn function(&self) -> &'static str {
        match self {
            Request::OpenAccount { .. } => "OpenAccount",
            Request::CloseAccount { .. } => "CloseAccount",
            Request::GetAccount { .. } => "GetAccount",
            Request::GetAccountList { .. } => "GetAccountList",
            Request::TopupAccount { .. } => "TopupAccount",
            Request::TransferMoney { .. } => "TransferMoney",
            Request::GetTransaction { .. } => "GetTransaction",
            Request::GetTransactionList { .. } => "GetTransactionList",
        }
    }

    /// Customers whose records this request may read or write
    ///
    /// Requests with disjoint customer sets touch disjoint key ranges. An
    /// account payload that cannot be decoded yields no customer; the request
    /// fails before touching the store.
    pub fn customer_ids(&self) -> Vec<String> {
        match self {
            Request::OpenAccount { raw } => {
                #[derive(Deserialize)]
                struct Owner {
                    #[serde(default)]
                    customer_id: String,
                }
                serde_json::from_str::<Owner>(raw)
                    .ok()
                    .map(|owner| owner.customer_id)
                    .filter(|id| !id.is_empty())
                    .into_iter()
                    .collect()
            }
            Request::CloseAccount { customer_id, .. }
            | Request::GetAccount { customer_id, .. }
            | Request::GetAccountList { customer_id }
            | Request::TopupAccount { customer_id, .. }
            | Request::GetTransaction { customer_id, .. }
            | Request::GetTransactionList { customer_id, .. } => vec![customer_id.clone()],
            Request::TransferMoney { transfer } => vec![
                transfer.from_customer_id.clone(),
                transfer.to_customer_id.clone(),
            ],
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function())
    }
}
