//! Composite key encoding
//!
//! Every record lives in one flat, sorted keyspace. A composite key is the
//! object type tag followed by each attribute value, each component terminated
//! by U+0000:
//!
//! ```text
//! Account\0 1\0 1234\0
//! ```
//!
//! Because every attribute carries its own terminator, the prefix range for
//! customer `1` can never reach keys of customer `12`.

use crate::types::{LedgerError, ObjectType};

/// Terminates each key component
pub const SEPARATOR: char = '\u{0}';

/// Build the composite key for an object type and ordered attributes
///
/// # Errors
///
/// Returns a Validation error if an attribute contains the separator or
/// `char::MAX`, which bounds prefix ranges.
pub fn build_key<A: AsRef<str>>(object_type: ObjectType, attrs: &[A]) -> Result<String, LedgerError> {
    let tag = object_type.as_str();
    let capacity = tag.len() + 1 + attrs.iter().map(|a| a.as_ref().len() + 1).sum::<usize>();
    let mut key = String::with_capacity(capacity);

    key.push_str(tag);
    key.push(SEPARATOR);
    for attr in attrs {
        let attr = attr.as_ref();
        if attr.contains(SEPARATOR) {
            return Err(LedgerError::validation(format!(
                "key attribute {:?} contains the separator",
                attr
            )));
        }
        if attr.contains(char::MAX) {
            return Err(LedgerError::validation(format!(
                "key attribute {:?} contains U+10FFFF",
                attr
            )));
        }
        key.push_str(attr);
        key.push(SEPARATOR);
    }
    Ok(key)
}

/// Half-open range `[low, high)` covering every key that starts with the
/// given object type and attributes
///
/// `high` is `low` followed by `char::MAX`, which sorts after any character
/// that can follow the prefix.
pub fn build_prefix_range<A: AsRef<str>>(
    object_type: ObjectType,
    attrs: &[A],
) -> Result<(String, String), LedgerError> {
    let low = build_key(object_type, attrs)?;
    let mut high = low.clone();
    high.push(char::MAX);
    Ok((low, high))
}

/// Split a composite key back into its object type and attributes
///
/// # Errors
///
/// Returns a Validation error if the key is not terminated by the separator
/// or does not start with a known object type.
pub fn split_key(key: &str) -> Result<(ObjectType, Vec<String>), LedgerError> {
    let body = key
        .strip_suffix(SEPARATOR)
        .ok_or_else(|| LedgerError::validation(format!("malformed composite key {:?}", key)))?;
    let mut parts = body.split(SEPARATOR);
    let tag = parts.next().unwrap_or_default();
    let object_type = ObjectType::from_tag(tag)
        .ok_or_else(|| LedgerError::validation(format!("unknown object type {:?}", tag)))?;
    Ok((object_type, parts.map(str::to_string).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_build_key() {
        let key = build_key(ObjectType::Account, &["1", "1234"]).unwrap();
        assert_eq!(key, "Account\u{0}1\u{0}1234\u{0}");
    }

    #[test]
    fn test_build_key_without_attributes() {
        let key = build_key::<&str>(ObjectType::Rates, &[]).unwrap();
        assert_eq!(key, "Rates\u{0}");
    }

    #[rstest]
    #[case::separator("1\u{0}2")]
    #[case::range_bound("\u{10FFFF}")]
    #[case::range_bound_inside("12\u{10FFFF}3")]
    fn test_build_key_rejects_reserved_chars(#[case] attr: &str) {
        let result = build_key(ObjectType::Account, &["1", attr]);
        assert!(matches!(result, Err(LedgerError::Validation { .. })));
    }

    #[test]
    fn test_build_key_is_deterministic() {
        let a = build_key(ObjectType::Transaction, &["1", "1234", "ab"]).unwrap();
        let b = build_key(ObjectType::Transaction, &["1", "1234", "ab"]).unwrap();
        assert_eq!(a, b);
    }

    #[rstest]
    #[case::same_customer("Account\u{0}1\u{0}1234\u{0}", true)]
    #[case::empty_account_id("Account\u{0}1\u{0}\u{0}", true)]
    #[case::longer_customer("Account\u{0}12\u{0}1234\u{0}", false)]
    #[case::other_type("Transaction\u{0}1\u{0}1234\u{0}ab\u{0}", false)]
    #[case::bare_prefix("Account\u{0}1", false)]
    fn test_prefix_range_membership(#[case] key: &str, #[case] inside: bool) {
        let (low, high) = build_prefix_range(ObjectType::Account, &["1"]).unwrap();
        assert_eq!(key >= low.as_str() && key < high.as_str(), inside);
    }

    #[test]
    fn test_prefix_range_contains_full_key() {
        let (low, high) = build_prefix_range(ObjectType::Transaction, &["1", "1234"]).unwrap();
        let key = build_key(ObjectType::Transaction, &["1", "1234", "ffff"]).unwrap();
        assert!(low <= key && key < high);
    }

    #[test]
    fn test_split_key_inverts_build_key() {
        let key = build_key(ObjectType::Transaction, &["1", "1234", "ab"]).unwrap();
        let (object_type, attrs) = split_key(&key).unwrap();
        assert_eq!(object_type, ObjectType::Transaction);
        assert_eq!(attrs, vec!["1", "1234", "ab"]);
    }

    #[rstest]
    #[case::unterminated("Account\u{0}1")]
    #[case::unknown_type("Ledger\u{0}1\u{0}")]
    #[case::empty("")]
    fn test_split_key_rejects(#[case] key: &str) {
        assert!(split_key(key).is_err());
    }
}
