//! Identifier generation
//!
//! Account numbers are short random digit strings. Leg identifiers are the
//! SHA-256 digest of the leg's stored encoding, so the same content always
//! yields the same ID.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Default number of digits in a generated account ID
pub const DEFAULT_ACCOUNT_ID_LENGTH: usize = 8;

/// Generates account and leg identifiers
#[derive(Debug, Clone, Copy)]
pub struct IdGenerator {
    account_id_length: usize,
}

impl IdGenerator {
    /// Create a generator producing account IDs of the given length
    pub fn new(account_id_length: usize) -> Self {
        IdGenerator { account_id_length }
    }

    /// Random string of decimal digits
    ///
    /// Uses a non-cryptographic thread-local RNG. Collisions are not checked.
    pub fn new_account_id(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.account_id_length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }

    /// Lowercase hex SHA-256 of `content`
    pub fn new_leg_id(&self, content: &[u8]) -> String {
        hex::encode(Sha256::digest(content))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        IdGenerator::new(DEFAULT_ACCOUNT_ID_LENGTH)
    }
}
