//! Opaque session tokens.
//!
//! The plaintext token is returned to the client once at login. Only its
//! SHA-256 hex digest is persisted, so a leaked `sessions` table cannot be
//! replayed.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Random bytes per token before hex encoding.
const TOKEN_BYTES: usize = 64;

/// Generate a new session token.
///
/// Returns `(plaintext_token, sha256_hex_hash)`.
pub fn generate_session_token() -> (String, String) {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    let plaintext = hex::encode(bytes);
    let hash = hash_session_token(&plaintext);
    (plaintext, hash)
}

/// Compute the SHA-256 hex digest of a session token.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
