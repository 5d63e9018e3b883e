//! Repository for the `sources` and `character_sources` tables.

use chardb_core::types::DbId;
use sqlx::PgPool;

use crate::models::source::Source;

/// Provides lookup, get-or-create and character linking for sources.
pub struct SourceRepo;

impl SourceRepo {
    /// Return the source with the given name, creating it if absent.
    pub async fn find_or_create(pool: &PgPool, name: &str) -> Result<Source, sqlx::Error> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        sqlx::query_as::<_, Source>(
            "INSERT INTO sources (name) VALUES ($1)
             ON CONFLICT ON CONSTRAINT uq_sources_name DO UPDATE SET name = EXCLUDED.name
             RETURNING id, name",
        )
        .bind(name)
        .fetch_one(pool)
        .await
    }

    /// Find a source by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Source>, sqlx::Error> {
        sqlx::query_as::<_, Source>("SELECT id, name FROM sources WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all sources ordered by ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Source>, sqlx::Error> {
        sqlx::query_as::<_, Source>("SELECT id, name FROM sources ORDER BY id ASC")
            .fetch_all(pool)
            .await
    }

    /// Link a character to a source. Idempotent; returns `true` if a new link was made.
    pub async fn link_character(
        pool: &PgPool,
        character_id: DbId,
        source_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO character_sources (character_id, source_id) VALUES ($1, $2)
             ON CONFLICT (character_id, source_id) DO NOTHING",
        )
        .bind(character_id)
        .bind(source_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the sources a character is linked to, ordered by ID ascending.
    pub async fn list_for_character(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<Source>, sqlx::Error> {
        sqlx::query_as::<_, Source>(
            "SELECT s.id, s.name
             FROM character_sources cs
             JOIN sources s ON s.id = cs.source_id
             WHERE cs.character_id = $1
             ORDER BY s.id ASC",
        )
        .bind(character_id)
        .fetch_all(pool)
        .await
    }
}
