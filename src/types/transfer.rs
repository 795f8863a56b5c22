//! Transfer request type
//!
//! A transfer is the input to `TransferMoney`. It is never persisted; the
//! legs it produces are.

use crate::types::{LedgerError, Params};
use serde::{Deserialize, Serialize};

/// A request to move money between two accounts
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Transfer {
    #[serde(rename = "from_customer")]
    pub from_customer_id: String,

    #[serde(rename = "from_account")]
    pub from_account_id: String,

    #[serde(rename = "to_customer")]
    pub to_customer_id: String,

    #[serde(rename = "to_account")]
    pub to_account_id: String,

    /// Amount credited to the receiving account, in cents
    #[serde(rename = "amount")]
    pub amount_cents: i64,

    /// Fee charged to the paying account on top of the amount, in cents
    #[serde(rename = "fee")]
    pub fee_cents: i64,

    #[serde(rename = "currency")]
    pub currency_code: String,

    pub description: String,

    #[serde(skip_serializing_if = "Params::is_empty")]
    pub params: Params,
}

impl Transfer {
    /// Check the request before any state is read
    ///
    /// # Errors
    ///
    /// Returns a Validation error if:
    /// - Any of the four account identity fields is empty
    /// - The amount is not positive
    /// - The fee is negative
    /// - The currency is empty
    /// - Amount plus fee does not fit in an `i64`
    pub fn validate(&self) -> Result<(), LedgerError> {
        let identity = [
            ("from_customer", &self.from_customer_id),
            ("from_account", &self.from_account_id),
            ("to_customer", &self.to_customer_id),
            ("to_account", &self.to_account_id),
        ];
        if let Some((field, _)) = identity.iter().find(|(_, value)| value.is_empty()) {
            return Err(LedgerError::validation(format!("missing {}", field)));
        }

        if self.amount_cents <= 0 {
            return Err(LedgerError::validation(format!(
                "amount must be positive, got {}",
                self.amount_cents
            )));
        }

        if self.fee_cents < 0 {
            return Err(LedgerError::validation(format!(
                "fee must not be negative, got {}",
                self.fee_cents
            )));
        }

        if self.currency_code.is_empty() {
            return Err(LedgerError::validation("missing currency"));
        }

        self.total_debit_cents()
            .map(|_| ())
            .ok_or_else(|| LedgerError::validation("amount plus fee overflows"))
    }

    /// Amount plus fee: what the paying account is charged
    ///
    /// Returns `None` on overflow.
    pub fn total_debit_cents(&self) -> Option<i64> {
        self.amount_cents.checked_add(self.fee_cents)
    }

    /// True when both sides name the same account
    pub fn is_self_transfer(&self) -> bool {
        self.from_customer_id == self.to_customer_id && self.from_account_id == self.to_account_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn valid_transfer() -> Transfer {
        Transfer {
            from_customer_id: "1".to_string(),
            from_account_id: "1234".to_string(),
            to_customer_id: "2".to_string(),
            to_account_id: "5678".to_string(),
            amount_cents: 1000,
            fee_cents: 0,
            currency_code: "AUD".to_string(),
            description: "rent".to_string(),
            params: Params::new(),
        }
    }

    #[test]
    fn test_valid_transfer() {
        assert!(valid_transfer().validate().is_ok());
    }

    #[rstest]
    #[case::from_customer(|t: &mut Transfer| t.from_customer_id.clear(), "missing from_customer")]
    #[case::from_account(|t: &mut Transfer| t.from_account_id.clear(), "missing from_account")]
    #[case::to_customer(|t: &mut Transfer| t.to_customer_id.clear(), "missing to_customer")]
    #[case::to_account(|t: &mut Transfer| t.to_account_id.clear(), "missing to_account")]
    #[case::zero_amount(|t: &mut Transfer| t.amount_cents = 0, "amount must be positive, got 0")]
    #[case::negative_amount(|t: &mut Transfer| t.amount_cents = -5, "amount must be positive, got -5")]
    #[case::negative_fee(|t: &mut Transfer| t.fee_cents = -1, "fee must not be negative, got -1")]
    #[case::currency(|t: &mut Transfer| t.currency_code.clear(), "missing currency")]
    #[case::overflow(|t: &mut Transfer| { t.amount_cents = i64::MAX; t.fee_cents = 1; }, "amount plus fee overflows")]
    fn test_invalid_transfer(#[case] mutate: fn(&mut Transfer), #[case] expected: &str) {
        let mut transfer = valid_transfer();
        mutate(&mut transfer);
        let err = transfer.validate().unwrap_err();
        assert_eq!(err, LedgerError::validation(expected));
    }

    #[test]
    fn test_decode_transfer() {
        let json = r#"{"from_customer":"1","from_account":"1234","to_customer":"2","to_account":"5678","amount":1000,"currency":"AUD","description":"rent"}"#;
        let transfer: Transfer = serde_json::from_str(json).unwrap();
        assert_eq!(transfer, valid_transfer());
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let mut transfer = valid_transfer();
        transfer.fee_cents = 25;
        transfer.params.insert("ref".to_string(), "inv-7".to_string());

        let encoded = serde_json::to_string(&transfer).unwrap();
        let decoded: Transfer = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, transfer);
        assert_eq!(serde_json::to_string(&decoded).unwrap(), encoded);
    }

    #[rstest]
    #[case("1", "1234", true)]
    #[case("1", "5678", false)]
    #[case("2", "1234", false)]
    fn test_is_self_transfer(#[case] to_customer: &str, #[case] to_account: &str, #[case] expected: bool) {
        let transfer = Transfer {
            to_customer_id: to_customer.to_string(),
            to_account_id: to_account.to_string(),
            ..valid_transfer()
        };
        assert_eq!(transfer.is_self_transfer(), expected);
    }
}
