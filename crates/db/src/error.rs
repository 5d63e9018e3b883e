//! Errors from repository operations that enforce domain rules.

use chardb_core::error::CoreError;

/// Either a domain rule rejected the input or the database call failed.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
