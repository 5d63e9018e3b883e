//! Source (the work a character appears in) model.

use chardb_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `sources` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Source {
    pub id: DbId,
    pub name: String,
}

/// A source together with the characters linked to it.
///
/// `C` is either a bare [`Character`](crate::models::character::Character)
/// row or a full [`CharacterView`](crate::models::character::CharacterView).
#[derive(Debug, Clone, Serialize)]
pub struct SourceWithCharacters<C: Serialize> {
    #[serde(flatten)]
    pub source: Source,
    pub characters: Vec<C>,
}
