//! Persisted record kinds and their stored encoding
//!
//! Every kind of record the ledger persists is one variant of [`ObjectType`].
//! Each record type implements [`LedgerRecord`], which names its object type
//! and the ordered attribute values that address it in the composite key
//! space. Stored values are JSON documents tagged with a `docType` field.

use crate::types::LedgerError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of persisted object types
///
/// The object type is the first component of every composite key, which
/// partitions one flat keyspace into per-kind logical tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectType {
    Account,
    Transaction,
    User,
    Rates,
}

impl ObjectType {
    /// All object types, in declaration order
    pub const ALL: [ObjectType; 4] = [
        ObjectType::Account,
        ObjectType::Transaction,
        ObjectType::User,
        ObjectType::Rates,
    ];

    /// Tag used in composite keys and in the `docType` field
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Account => "Account",
            ObjectType::Transaction => "Transaction",
            ObjectType::User => "User",
            ObjectType::Rates => "Rates",
        }
    }

    /// Look up an object type by its tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record that can be persisted in the ledger's keyspace
pub trait LedgerRecord: Serialize + DeserializeOwned {
    /// Object type of every record of this kind
    const OBJECT_TYPE: ObjectType;

    /// Ordered attribute values forming this record's composite key
    fn key_attributes(&self) -> Vec<&str>;
}

#[derive(Serialize)]
struct Envelope<'a, R> {
    #[serde(rename = "docType")]
    doc_type: ObjectType,
    #[serde(flatten)]
    record: &'a R,
}

#[derive(Deserialize)]
struct OwnedEnvelope<R> {
    #[serde(rename = "docType")]
    doc_type: ObjectType,
    #[serde(flatten)]
    record: R,
}

/// Serialize a record into its stored form (JSON with a `docType` tag)
pub fn encode<R: LedgerRecord>(record: &R) -> Result<Vec<u8>, LedgerError> {
    let envelope = Envelope {
        doc_type: R::OBJECT_TYPE,
        record,
    };
    serde_json::to_vec(&envelope).map_err(|e| {
        LedgerError::validation(format!("Error encoding {}: {}", R::OBJECT_TYPE, e))
    })
}

/// Deserialize a stored value, checking its `docType` tag
pub fn decode<R: LedgerRecord>(bytes: &[u8]) -> Result<R, LedgerError> {
    let envelope: OwnedEnvelope<R> = serde_json::from_slice(bytes)
        .map_err(|e| LedgerError::decode(R::OBJECT_TYPE.as_str(), e))?;
    if envelope.doc_type != R::OBJECT_TYPE {
        return Err(LedgerError::decode(
            R::OBJECT_TYPE.as_str(),
            format!("unexpected docType {}", envelope.doc_type),
        ));
    }
    Ok(envelope.record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Account, User};
    use rstest::rstest;

    #[rstest]
    #[case(ObjectType::Account, "Account")]
    #[case(ObjectType::Transaction, "Transaction")]
    #[case(ObjectType::User, "User")]
    #[case(ObjectType::Rates, "Rates")]
    fn test_tag_round_trip(#[case] object_type: ObjectType, #[case] tag: &str) {
        assert_eq!(object_type.as_str(), tag);
        assert_eq!(ObjectType::from_tag(tag), Some(object_type));
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(ObjectType::from_tag("Ledger"), None);
    }

    #[test]
    fn test_encode_adds_doc_type() {
        let user = User {
            id: "1234".to_string(),
            name: "John Smith".to_string(),
        };
        let bytes = encode(&user).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"docType":"User","id":"1234","name":"John Smith"}"#
        );
    }

    #[test]
    fn test_decode_checks_doc_type() {
        let bytes = br#"{"docType":"User","id":"1234","name":"John Smith"}"#;
        let result = decode::<Account>(bytes);
        assert!(matches!(result, Err(LedgerError::Decode { .. })));
    }

    #[test]
    fn test_decode_requires_doc_type() {
        let bytes = br#"{"id":"1234","name":"John Smith"}"#;
        assert!(decode::<User>(bytes).is_err());
    }
}
