//! Login session model.

use chardb_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    /// SHA-256 hex digest of the bearer token; the plaintext is never stored.
    pub token_hash: String,
    pub created_at: Timestamp,
    pub last_used: Timestamp,
}
