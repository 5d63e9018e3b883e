//! Relationship model, DTOs and per-character views.

use chardb_core::relationship::RelationshipEdge;
use chardb_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::character::CharacterView;

/// A row from the `relationships` table. Always stored with `from_id < to_id`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Relationship {
    pub id: DbId,
    pub from_id: DbId,
    pub to_id: DbId,
    pub relationship_type: String,
    pub reciprocal_relationship_type: String,
    pub visualize: bool,
}

impl Relationship {
    pub fn edge(&self) -> RelationshipEdge {
        RelationshipEdge::new(
            self.from_id,
            self.to_id,
            self.relationship_type.clone(),
            self.reciprocal_relationship_type.clone(),
            self.visualize,
        )
    }
}

/// One desired relationship in an upsert or reconciliation request.
///
/// `from_id` defaults to the character being edited when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipInput {
    pub id: Option<DbId>,
    pub from_id: Option<DbId>,
    pub to_id: DbId,
    pub relationship_type: String,
    pub reciprocal_relationship_type: String,
    #[serde(default)]
    pub visualize: bool,
}

impl RelationshipInput {
    /// The directed edge this input describes, with `from_id` falling back to `owner`.
    pub fn edge_for(&self, owner: DbId) -> RelationshipEdge {
        RelationshipEdge::new(
            self.from_id.unwrap_or(owner),
            self.to_id,
            self.relationship_type.clone(),
            self.reciprocal_relationship_type.clone(),
            self.visualize,
        )
    }
}

/// A relationship as seen from one character: that character is always `from_id`.
#[derive(Debug, Clone, Serialize)]
pub struct RelationshipView {
    pub id: DbId,
    pub from_id: DbId,
    pub to_id: DbId,
    pub relationship_type: String,
    pub reciprocal_relationship_type: String,
    pub visualize: bool,
    /// The other character (without its own relationships).
    pub character: Option<CharacterView>,
}

impl RelationshipView {
    /// Orient a stored row for `character_id`.
    pub fn oriented(row: &Relationship, character_id: DbId) -> Self {
        let edge = row.edge().oriented_for(character_id);
        Self {
            id: row.id,
            from_id: edge.from_id,
            to_id: edge.to_id,
            relationship_type: edge.relationship_type,
            reciprocal_relationship_type: edge.reciprocal_relationship_type,
            visualize: edge.visualize,
            character: None,
        }
    }
}

/// Result of a single relationship upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(Relationship),
    Updated(Relationship),
    /// The stored row already matched; nothing was written.
    Unchanged(Relationship),
}

impl UpsertOutcome {
    pub fn relationship(&self) -> &Relationship {
        match self {
            UpsertOutcome::Created(r) | UpsertOutcome::Updated(r) | UpsertOutcome::Unchanged(r) => r,
        }
    }
}

/// Counts reported by a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub created: u64,
    pub updated: u64,
    pub unchanged: u64,
    pub deleted: u64,
}
