//! Role entity model.

use chardb_core::roles::RoleCapabilities;
use chardb_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A role row from the `roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub can_create: bool,
}

impl RoleCapabilities for Role {
    fn can_create(&self) -> bool {
        self.can_create
    }
}
