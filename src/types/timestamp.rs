//! RFC 3339 serialization boundary for timestamp fields
//!
//! Records hold instants as Unix seconds (`i64`). Only the serde adapters in
//! this module know the formatted string form used on the wire, so the rest of
//! the crate never handles time strings.
//!
//! ```
//! use transfer_ledger::types::timestamp::{format_unix, parse_rfc3339};
//!
//! let secs = parse_rfc3339("2016-10-28T00:00:00+11:00").unwrap();
//! assert_eq!(format_unix(secs).unwrap(), "2016-10-27T13:00:00Z");
//! ```

use chrono::{DateTime, SecondsFormat, Utc};

/// Format Unix seconds as an RFC 3339 string in UTC with second precision
///
/// Returns `None` when the value is outside chrono's representable range.
pub fn format_unix(secs: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(secs, 0).map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Parse an RFC 3339 string (any offset) into Unix seconds
pub fn parse_rfc3339(value: &str) -> Result<i64, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|t| t.timestamp())
}

/// Required timestamp field: must be present and well-formed
pub mod rfc3339 {
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(secs: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = super::format_unix(*secs)
            .ok_or_else(|| S::Error::custom(format!("timestamp {} out of range", secs)))?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        super::parse_rfc3339(&value).map_err(D::Error::custom)
    }
}

/// Optional timestamp field: null or an empty string decode to 0
///
/// Use together with `#[serde(default)]` so an absent field also yields 0.
pub mod rfc3339_or_zero {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    pub use super::rfc3339::serialize;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(value) if !value.is_empty() => {
                super::parse_rfc3339(&value).map_err(D::Error::custom)
            }
            _ => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::utc("2016-10-28T00:00:00Z", 1477612800)]
    #[case::positive_offset("2016-10-28T00:00:00+11:00", 1477573200)]
    #[case::negative_offset("2016-10-27T16:00:00-05:00", 1477602000)]
    #[case::epoch("1970-01-01T00:00:00Z", 0)]
    fn test_parse_rfc3339(#[case] input: &str, #[case] expected: i64) {
        assert_eq!(parse_rfc3339(input).unwrap(), expected);
    }

    #[test]
    fn test_format_parse_format_is_stable() {
        let first = format_unix(1477573200).unwrap();
        let second = format_unix(parse_rfc3339(&first).unwrap()).unwrap();
        assert_eq!(first, "2016-10-27T13:00:00Z");
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_rfc3339("yesterday").is_err());
    }

    #[test]
    fn test_format_out_of_range() {
        assert!(format_unix(i64::MAX).is_none());
    }
}
