//! Repository for the `characters` table and the composed character view.

use chardb_core::types::DbId;
use sqlx::PgPool;

use crate::models::character::{Character, CharacterFields, CharacterView};
use crate::repositories::{RelationshipRepo, SourceRepo, TagRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, jp_name, gender, age, image_url, birth_place, birth_date, \
                       height, weight, cup_size, blood_type, bust, waist, hip, description";

/// Provides CRUD operations for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character, returning the created row.
    pub async fn create(pool: &PgPool, input: &CharacterFields) -> Result<Character, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters
                (name, jp_name, gender, age, image_url, birth_place, birth_date,
                 height, weight, cup_size, blood_type, bust, waist, hip, description)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        Self::bind_fields(sqlx::query_as::<_, Character>(&query), input)
            .fetch_one(pool)
            .await
    }

    /// Replace every column of a character.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CharacterFields,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET
                name = $1, jp_name = $2, gender = $3, age = $4, image_url = $5,
                birth_place = $6, birth_date = $7, height = $8, weight = $9,
                cup_size = $10, blood_type = $11, bust = $12, waist = $13, hip = $14,
                description = $15
             WHERE id = $16
             RETURNING {COLUMNS}"
        );
        Self::bind_fields(sqlx::query_as::<_, Character>(&query), input)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a character row by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load the characters with the given ids, ordered by ID ascending.
    ///
    /// Ids with no matching row are silently skipped.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = ANY($1) ORDER BY id ASC");
        sqlx::query_as::<_, Character>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Return the ids from `ids` that have no character row, in input order.
    pub async fn missing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        let found: Vec<DbId> =
            sqlx::query_scalar("SELECT id FROM characters WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(pool)
                .await?;
        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }

    /// List the characters linked to a source, ordered by ID ascending.
    pub async fn list_by_source(
        pool: &PgPool,
        source_id: DbId,
    ) -> Result<Vec<Character>, sqlx::Error> {
        sqlx::query_as::<_, Character>(
            "SELECT c.id, c.name, c.jp_name, c.gender, c.age, c.image_url, c.birth_place,
                    c.birth_date, c.height, c.weight, c.cup_size, c.blood_type, c.bust,
                    c.waist, c.hip, c.description
             FROM character_sources cs
             JOIN characters c ON c.id = cs.character_id
             WHERE cs.source_id = $1
             ORDER BY c.id ASC",
        )
        .bind(source_id)
        .fetch_all(pool)
        .await
    }

    /// Load a character with its sources and tags, never its relationships.
    ///
    /// This is the shape embedded inside each relationship of a full view.
    pub async fn find_summary(pool: &PgPool, id: DbId) -> Result<Option<CharacterView>, sqlx::Error> {
        let Some(character) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let sources = SourceRepo::list_for_character(pool, id).await?;
        let tags = TagRepo::tags_for_character(pool, id).await?;
        Ok(Some(CharacterView {
            character,
            sources,
            tags,
            relationships: None,
        }))
    }

    /// Load the composed character view.
    ///
    /// With `include_relationships`, each relationship is oriented toward this
    /// character and carries a summary of the other character.
    pub async fn find_view(
        pool: &PgPool,
        id: DbId,
        include_relationships: bool,
    ) -> Result<Option<CharacterView>, sqlx::Error> {
        let Some(mut view) = Self::find_summary(pool, id).await? else {
            return Ok(None);
        };
        if include_relationships {
            view.relationships = Some(RelationshipRepo::relationships_for(pool, id).await?);
        }
        Ok(Some(view))
    }

    fn bind_fields<'q, O>(
        query: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
        input: &'q CharacterFields,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
        query
            .bind(&input.name)
            .bind(&input.jp_name)
            .bind(&input.gender)
            .bind(input.age)
            .bind(&input.image_url)
            .bind(&input.birth_place)
            .bind(&input.birth_date)
            .bind(input.height)
            .bind(input.weight)
            .bind(&input.cup_size)
            .bind(&input.blood_type)
            .bind(input.bust)
            .bind(input.waist)
            .bind(input.hip)
            .bind(&input.description)
    }
}
