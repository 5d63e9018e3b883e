//! Image model and DTOs.

use chardb_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    pub image_url: String,
    /// Identifier on the remote image host, if the file was uploaded through it.
    pub remote_id: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting an image row.
#[derive(Debug, Clone)]
pub struct CreateImage {
    pub image_url: String,
    pub remote_id: Option<String>,
}
