//! Tag, tag category and character-tag models and DTOs.

use chardb_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `tag_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TagCategory {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// A row from the `tags` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub category_id: DbId,
}

/// A tag joined with its category.
#[derive(Debug, Clone, Serialize)]
pub struct TagWithCategory {
    #[serde(flatten)]
    pub tag: Tag,
    pub category: TagCategory,
}

/// A category with all of its tags.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithTags {
    #[serde(flatten)]
    pub category: TagCategory,
    pub tags: Vec<Tag>,
}

/// A row from the `character_tags` junction table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct CharacterTag {
    pub character_id: DbId,
    pub tag_id: DbId,
}

/// DTO for creating a tag.
#[derive(Debug, Clone)]
pub struct CreateTag {
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub category_id: DbId,
}

/// DTO for creating a tag category.
#[derive(Debug, Clone)]
pub struct CreateTagCategory {
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
}
