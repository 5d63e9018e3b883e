//! Repository for the `relationships` table.
//!
//! Every write canonicalizes the edge first, so a pair of characters maps to
//! exactly one row regardless of the direction it was submitted in. Reads
//! orient rows toward the character being queried.

use std::collections::HashMap;

use chardb_core::error::CoreError;
use chardb_core::relationship::{stale_ids, RelationshipEdge};
use chardb_core::types::{entity, DbId};
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::character::CharacterView;
use crate::models::relationship::{
    ReconcileSummary, Relationship, RelationshipInput, RelationshipView, UpsertOutcome,
};
use crate::repositories::CharacterRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, from_id, to_id, relationship_type, reciprocal_relationship_type, visualize";

/// Provides upsert, reconciliation and oriented reads for relationships.
pub struct RelationshipRepo;

impl RelationshipRepo {
    /// Find a relationship by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Relationship>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM relationships WHERE id = $1");
        sqlx::query_as::<_, Relationship>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the row connecting two characters, in either direction.
    pub async fn find_by_pair(
        pool: &PgPool,
        a: DbId,
        b: DbId,
    ) -> Result<Option<Relationship>, sqlx::Error> {
        let (from_id, to_id) = if a < b { (a, b) } else { (b, a) };
        let query = format!("SELECT {COLUMNS} FROM relationships WHERE from_id = $1 AND to_id = $2");
        sqlx::query_as::<_, Relationship>(&query)
            .bind(from_id)
            .bind(to_id)
            .fetch_optional(pool)
            .await
    }

    /// List the stored rows involving a character, ordered by ID ascending.
    pub async fn list_for_character(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<Relationship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM relationships
             WHERE from_id = $1 OR to_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(character_id)
            .fetch_all(pool)
            .await
    }

    /// Create or update a relationship.
    ///
    /// The row already connecting the pair wins. Otherwise the row named by
    /// `id` is moved onto the pair, and with neither a new row is inserted.
    /// The edge must already have passed [`RelationshipEdge::validate`].
    pub async fn upsert(
        pool: &PgPool,
        id: Option<DbId>,
        edge: RelationshipEdge,
    ) -> Result<UpsertOutcome, sqlx::Error> {
        let edge = edge.canonicalize();

        let mut existing = Self::find_by_pair(pool, edge.from_id, edge.to_id).await?;
        if existing.is_none() {
            if let Some(id) = id {
                existing = Self::find_by_id(pool, id).await?;
            }
        }

        match existing {
            Some(row) => {
                let stored = row.edge();
                if stored.same_pair(&edge) && stored.same_labels(&edge) {
                    return Ok(UpsertOutcome::Unchanged(row));
                }
                let updated = Self::update(pool, row.id, &edge).await?;
                Ok(UpsertOutcome::Updated(updated))
            }
            None => {
                let created = Self::insert(pool, &edge).await?;
                Ok(UpsertOutcome::Created(created))
            }
        }
    }

    /// Make `desired` the complete relationship set of `character_id`.
    ///
    /// Every input is validated before anything is written: each must involve
    /// `character_id`, pass [`RelationshipEdge::validate`], point at an
    /// existing character, and any `id` it carries must name a row of
    /// `character_id` (or nothing). Each desired edge is then upserted and every other row involving the character is
    /// deleted. The steps are not wrapped in a transaction.
    pub async fn reconcile(
        pool: &PgPool,
        character_id: DbId,
        desired: &[RelationshipInput],
    ) -> Result<ReconcileSummary, DbError> {
        let mut edges = Vec::with_capacity(desired.len());
        for input in desired {
            let edge = input.edge_for(character_id);
            if !edge.involves(character_id) {
                return Err(CoreError::validation(format!(
                    "Relationship between {} and {} does not involve character {character_id}",
                    edge.from_id, edge.to_id
                ))
                .into());
            }
            edge.validate()?;
            if let Some(id) = input.id {
                Self::ensure_owned(pool, id, character_id).await?;
            }
            edges.push((input.id, edge));
        }

        let partners: Vec<DbId> = edges
            .iter()
            .filter_map(|(_, edge)| edge.other_end(character_id))
            .collect();
        if let Some(&missing) = CharacterRepo::missing_ids(pool, &partners).await?.first() {
            return Err(CoreError::not_found(entity::CHARACTER, missing).into());
        }

        let mut summary = ReconcileSummary::default();
        let mut kept: Vec<DbId> = Vec::with_capacity(edges.len());

        for (id, edge) in edges {
            let outcome = Self::upsert(pool, id, edge).await?;
            match &outcome {
                UpsertOutcome::Created(_) => summary.created += 1,
                UpsertOutcome::Updated(_) => summary.updated += 1,
                UpsertOutcome::Unchanged(_) => summary.unchanged += 1,
            }
            kept.push(outcome.relationship().id);
        }

        let existing: Vec<DbId> = Self::list_for_character(pool, character_id)
            .await?
            .iter()
            .map(|row| row.id)
            .collect();
        let stale = stale_ids(&existing, &kept);
        if !stale.is_empty() {
            summary.deleted = Self::delete_many(pool, &stale).await?;
        }

        tracing::debug!(
            character_id,
            created = summary.created,
            updated = summary.updated,
            unchanged = summary.unchanged,
            deleted = summary.deleted,
            "Reconciled relationships",
        );
        Ok(summary)
    }

    /// The relationships of a character, oriented toward it, each carrying a
    /// summary of the other character.
    pub async fn relationships_for(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<RelationshipView>, sqlx::Error> {
        let rows = Self::list_for_character(pool, character_id).await?;
        let mut partners: HashMap<DbId, Option<CharacterView>> = HashMap::new();
        let mut views = Vec::with_capacity(rows.len());

        for row in &rows {
            let mut view = RelationshipView::oriented(row, character_id);
            let partner_id = view.to_id;
            if !partners.contains_key(&partner_id) {
                let summary = CharacterRepo::find_summary(pool, partner_id).await?;
                partners.insert(partner_id, summary);
            }
            view.character = partners.get(&partner_id).cloned().flatten();
            views.push(view);
        }
        Ok(views)
    }

    /// Fail unless row `id` is absent or involves `character_id`.
    async fn ensure_owned(pool: &PgPool, id: DbId, character_id: DbId) -> Result<(), DbError> {
        match Self::find_by_id(pool, id).await? {
            Some(row) if !row.edge().involves(character_id) => Err(CoreError::validation(
                format!("Relationship {id} does not belong to character {character_id}"),
            )
            .into()),
            _ => Ok(()),
        }
    }

    async fn delete_many(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM relationships WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert(pool: &PgPool, edge: &RelationshipEdge) -> Result<Relationship, sqlx::Error> {
        debug_assert!(edge.is_canonical());
        let query = format!(
            "INSERT INTO relationships
                (from_id, to_id, relationship_type, reciprocal_relationship_type, visualize)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(edge.from_id)
            .bind(edge.to_id)
            .bind(&edge.relationship_type)
            .bind(&edge.reciprocal_relationship_type)
            .bind(edge.visualize)
            .fetch_one(pool)
            .await
    }

    async fn update(
        pool: &PgPool,
        id: DbId,
        edge: &RelationshipEdge,
    ) -> Result<Relationship, sqlx::Error> {
        debug_assert!(edge.is_canonical());
        let query = format!(
            "UPDATE relationships SET
                from_id = $2, to_id = $3, relationship_type = $4,
                reciprocal_relationship_type = $5, visualize = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(id)
            .bind(edge.from_id)
            .bind(edge.to_id)
            .bind(&edge.relationship_type)
            .bind(&edge.reciprocal_relationship_type)
            .bind(edge.visualize)
            .fetch_one(pool)
            .await
    }
}
