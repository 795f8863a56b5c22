//! Ledger configuration

use crate::core::id_generator::DEFAULT_ACCOUNT_ID_LENGTH;
use tracing::warn;

/// Settings passed to the ledger core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Number of digits in generated account IDs
    pub account_id_length: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            account_id_length: DEFAULT_ACCOUNT_ID_LENGTH,
        }
    }
}

impl LedgerConfig {
    /// Create a LedgerConfig, falling back to the default for a zero length
    pub fn new(account_id_length: usize) -> Self {
        let default = Self::default();

        let account_id_length = if account_id_length == 0 {
            warn!(
                "Invalid account_id_length ({}), using default ({})",
                account_id_length, default.account_id_length
            );
            default.account_id_length
        } else {
            account_id_length
        };

        Self { account_id_length }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, DEFAULT_ACCOUNT_ID_LENGTH)]
    #[case(4, 4)]
    #[case(12, 12)]
    fn test_new(#[case] input: usize, #[case] expected: usize) {
        assert_eq!(LedgerConfig::new(input).account_id_length, expected);
    }
}
