//! Repository for the `sessions` table.

use chardb_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::Session;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, token_hash, created_at, last_used";

/// Provides creation, validation and removal of login sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
    ) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (user_id, token_hash)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(user_id)
            .bind(token_hash)
            .fetch_one(pool)
            .await
    }

    /// Validate a (user, token hash) pair and touch `last_used` in the same statement.
    ///
    /// Returns `None` if no matching session exists.
    pub async fn validate(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "UPDATE sessions SET last_used = NOW()
             WHERE user_id = $1 AND token_hash = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(user_id)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Delete a single session. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND token_hash = $2")
            .bind(user_id)
            .bind(token_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count the sessions currently held by a user.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
