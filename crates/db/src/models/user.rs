//! User entity model and DTOs.

use chardb_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::role::Role;

/// Full user row from the `users` table.
///
/// Contains the password hash, so it is deliberately not `Serialize`.
/// Use [`UserProfile`] for anything that leaves the server.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub created_at: Timestamp,
}

/// A user without its credential, with the assigned roles attached.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub username: String,
    pub created_at: Timestamp,
    pub roles: Vec<Role>,
}

impl UserProfile {
    pub fn new(user: User, roles: Vec<Role>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
            roles,
        }
    }
}

/// Public fields returned by registration.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub id: DbId,
    pub username: String,
}

impl From<&User> for NewUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
}
