//! Character entity model, DTOs and the composed read view.

use chardb_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::relationship::RelationshipView;
use crate::models::source::Source;
use crate::models::tag::Tag;

/// A character row from the `characters` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub name: String,
    pub jp_name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub image_url: Option<String>,
    pub birth_place: Option<String>,
    pub birth_date: Option<String>,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub cup_size: Option<String>,
    pub blood_type: Option<String>,
    pub bust: Option<i32>,
    pub waist: Option<i32>,
    pub hip: Option<i32>,
    pub description: Option<String>,
}

/// Column values written by create and update.
///
/// Update is a full replacement: every `None` is written as NULL.
#[derive(Debug, Clone, Default)]
pub struct CharacterFields {
    pub name: String,
    pub jp_name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub image_url: Option<String>,
    pub birth_place: Option<String>,
    pub birth_date: Option<String>,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub cup_size: Option<String>,
    pub blood_type: Option<String>,
    pub bust: Option<i32>,
    pub waist: Option<i32>,
    pub hip: Option<i32>,
    pub description: Option<String>,
}

/// A character with its sources and tags, and optionally its relationships.
///
/// Related characters inside `relationships` are loaded without their own
/// relationships, so the view is at most two levels deep.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterView {
    #[serde(flatten)]
    pub character: Character,
    pub sources: Vec<Source>,
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<RelationshipView>>,
}
