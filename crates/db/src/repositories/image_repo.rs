//! Repository for the `images` and `image_characters` tables.

use chardb_core::error::CoreError;
use chardb_core::types::{entity, DbId};
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::image::{CreateImage, Image};
use crate::repositories::CharacterRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, image_url, remote_id, created_at";

/// Provides CRUD operations for images and their character links.
pub struct ImageRepo;

impl ImageRepo {
    /// Insert a new image row, returning it.
    pub async fn create(pool: &PgPool, input: &CreateImage) -> Result<Image, sqlx::Error> {
        let query = format!(
            "INSERT INTO images (image_url, remote_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(&input.image_url)
            .bind(&input.remote_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE id = $1");
        sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an image row. Character links are removed by cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Link characters to an image, skipping existing links.
    ///
    /// Fails with [`CoreError::NotFound`] before writing anything if the image
    /// or any of the characters is missing. Returns the number of links created.
    pub async fn add_characters(
        pool: &PgPool,
        image_id: DbId,
        character_ids: &[DbId],
    ) -> Result<u64, DbError> {
        if Self::find_by_id(pool, image_id).await?.is_none() {
            return Err(CoreError::not_found(entity::IMAGE, image_id).into());
        }
        if let Some(&missing) = CharacterRepo::missing_ids(pool, character_ids).await?.first() {
            return Err(CoreError::not_found(entity::CHARACTER, missing).into());
        }

        let result = sqlx::query(
            "INSERT INTO image_characters (image_id, character_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT (image_id, character_id) DO NOTHING",
        )
        .bind(image_id)
        .bind(character_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Unlink characters from an image. Returns the number of links removed.
    pub async fn remove_characters(
        pool: &PgPool,
        image_id: DbId,
        character_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM image_characters WHERE image_id = $1 AND character_id = ANY($2)",
        )
        .bind(image_id)
        .bind(character_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Images linked to a character, newest first.
    pub async fn list_for_character(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<Image>, sqlx::Error> {
        sqlx::query_as::<_, Image>(
            "SELECT i.id, i.image_url, i.remote_id, i.created_at
             FROM image_characters ic
             JOIN images i ON i.id = ic.image_id
             WHERE ic.character_id = $1
             ORDER BY i.created_at DESC, i.id DESC",
        )
        .bind(character_id)
        .fetch_all(pool)
        .await
    }

    /// Images linked to any character of a source, newest first, without duplicates.
    pub async fn list_for_source(
        pool: &PgPool,
        source_id: DbId,
    ) -> Result<Vec<Image>, sqlx::Error> {
        sqlx::query_as::<_, Image>(
            "SELECT DISTINCT i.id, i.image_url, i.remote_id, i.created_at
             FROM character_sources cs
             JOIN image_characters ic ON ic.character_id = cs.character_id
             JOIN images i ON i.id = ic.image_id
             WHERE cs.source_id = $1
             ORDER BY i.created_at DESC, i.id DESC",
        )
        .bind(source_id)
        .fetch_all(pool)
        .await
    }

    /// Ids of the characters linked to an image, ascending.
    pub async fn character_ids(pool: &PgPool, image_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT character_id FROM image_characters WHERE image_id = $1 ORDER BY character_id ASC",
        )
        .bind(image_id)
        .fetch_all(pool)
        .await
    }
}
