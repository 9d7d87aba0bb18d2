//! Secret digests for the removal gate
//!
//! Settings never hold the secret itself, only its SHA-256 digest.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `secret`.
pub fn secret_digest(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// True when `candidate` hashes to `expected_digest` (hex, any case).
pub fn verify_secret(candidate: &str, expected_digest: &str) -> bool {
    let expected = match hex::decode(expected_digest.trim()) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let actual = Sha256::digest(candidate.as_bytes());

    // compare every byte
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
