//! Transport-independent domain errors.

use crate::types::DbId;

/// Errors raised by domain rules and lookups.
///
/// The API crate maps each variant onto an HTTP status code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A row with the given id does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed a domain rule (name length, self-relationship, ...).
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid session.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Valid session, but the user lacks the required capability.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound { entity, id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }
}
