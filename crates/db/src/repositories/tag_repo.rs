//! Repository for tag categories, tags and the `character_tags` junction.

use chardb_core::types::DbId;
use sqlx::PgPool;

use crate::models::tag::{
    CategoryWithTags, CharacterTag, CreateTag, CreateTagCategory, Tag, TagCategory,
    TagWithCategory,
};

/// Column list for `tag_categories`.
const CATEGORY_COLUMNS: &str = "id, title, description, color";

/// Column list for `tags`.
const TAG_COLUMNS: &str = "id, title, description, color, category_id";

/// Provides CRUD operations for tags and their categories.
pub struct TagRepo;

impl TagRepo {
    // -- categories --

    /// List all categories ordered by ID ascending.
    pub async fn list_categories(pool: &PgPool) -> Result<Vec<TagCategory>, sqlx::Error> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM tag_categories ORDER BY id ASC");
        sqlx::query_as::<_, TagCategory>(&query).fetch_all(pool).await
    }

    pub async fn find_category(pool: &PgPool, id: DbId) -> Result<Option<TagCategory>, sqlx::Error> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM tag_categories WHERE id = $1");
        sqlx::query_as::<_, TagCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A category with all of its tags, or `None` if the category does not exist.
    pub async fn find_category_with_tags(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CategoryWithTags>, sqlx::Error> {
        let Some(category) = Self::find_category(pool, id).await? else {
            return Ok(None);
        };
        let tags = Self::list_tags_in_category(pool, id).await?;
        Ok(Some(CategoryWithTags { category, tags }))
    }

    /// Insert a new category. A duplicate title fails on `uq_tag_categories_title`.
    pub async fn create_category(
        pool: &PgPool,
        input: &CreateTagCategory,
    ) -> Result<TagCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO tag_categories (title, description, color)
             VALUES ($1, $2, $3)
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, TagCategory>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    // -- tags --

    pub async fn find_tag(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A tag joined with its category.
    pub async fn find_tag_with_category(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TagWithCategory>, sqlx::Error> {
        let Some(tag) = Self::find_tag(pool, id).await? else {
            return Ok(None);
        };
        // Category deletes cascade to tags, so the category always exists.
        let category = Self::find_category(pool, tag.category_id).await?;
        Ok(category.map(|category| TagWithCategory { tag, category }))
    }

    pub async fn list_tags_in_category(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE category_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Tag>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a tag unless one with the same title already exists in the category.
    ///
    /// Returns `None` when the tag already existed.
    pub async fn create_tag(pool: &PgPool, input: &CreateTag) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (title, description, color, category_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_tags_category_title DO NOTHING
             RETURNING {TAG_COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.color)
            .bind(input.category_id)
            .fetch_optional(pool)
            .await
    }

    // -- character tags --

    /// Link a tag to a character. Returns `None` if the link already existed.
    pub async fn add_to_character(
        pool: &PgPool,
        character_id: DbId,
        tag_id: DbId,
    ) -> Result<Option<CharacterTag>, sqlx::Error> {
        sqlx::query_as::<_, CharacterTag>(
            "INSERT INTO character_tags (character_id, tag_id) VALUES ($1, $2)
             ON CONFLICT (character_id, tag_id) DO NOTHING
             RETURNING character_id, tag_id",
        )
        .bind(character_id)
        .bind(tag_id)
        .fetch_optional(pool)
        .await
    }

    /// Unlink a tag from a character. Returns `None` if there was no link.
    pub async fn remove_from_character(
        pool: &PgPool,
        character_id: DbId,
        tag_id: DbId,
    ) -> Result<Option<CharacterTag>, sqlx::Error> {
        sqlx::query_as::<_, CharacterTag>(
            "DELETE FROM character_tags WHERE character_id = $1 AND tag_id = $2
             RETURNING character_id, tag_id",
        )
        .bind(character_id)
        .bind(tag_id)
        .fetch_optional(pool)
        .await
    }

    /// The tags linked to a character, ordered by ID ascending.
    pub async fn tags_for_character(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.title, t.description, t.color, t.category_id
             FROM character_tags ct
             JOIN tags t ON t.id = ct.tag_id
             WHERE ct.character_id = $1
             ORDER BY t.id ASC",
        )
        .bind(character_id)
        .fetch_all(pool)
        .await
    }
}
