//! Handlers for the `/characters` resource.
//!
//! Covers character create/edit/read, character-tag links and relationship
//! reconciliation. Mutations require the `can_create` capability.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chardb_core::error::CoreError;
use chardb_core::input::{empty_as_none, optional_int};
use chardb_core::types::{entity, DbId};
use chardb_db::models::character::{CharacterFields, CharacterView};
use chardb_db::models::relationship::{ReconcileSummary, RelationshipInput};
use chardb_db::repositories::{CharacterRepo, RelationshipRepo, SourceRepo, TagRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::path::AppPath;
use crate::middleware::rbac::RequireCreator;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Character form fields shared by create and edit.
///
/// Optional text fields submitted as `""` are stored as NULL. Numeric fields
/// accept numbers, numeric strings or `""`.
#[derive(Debug, Deserialize, Validate)]
pub struct CharacterForm {
    #[validate(length(min = 3, max = 50, message = "Name must be between 3 and 50 characters"))]
    pub name: String,
    #[serde(default)]
    pub jp_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "optional_int::deserialize")]
    pub age: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub birth_place: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default, deserialize_with = "optional_int::deserialize")]
    pub height: Option<i32>,
    #[serde(default, deserialize_with = "optional_int::deserialize")]
    pub weight: Option<i32>,
    #[serde(default)]
    pub cup_size: Option<String>,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default, deserialize_with = "optional_int::deserialize")]
    pub bust: Option<i32>,
    #[serde(default, deserialize_with = "optional_int::deserialize")]
    pub waist: Option<i32>,
    #[serde(default, deserialize_with = "optional_int::deserialize")]
    pub hip: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    /// Name of the work the character appears in; created on first use.
    #[serde(default)]
    pub source: Option<String>,
}

impl CharacterForm {
    /// Split into column values and the optional source name.
    fn into_parts(self) -> (CharacterFields, Option<String>) {
        let fields = CharacterFields {
            name: self.name,
            jp_name: empty_as_none(self.jp_name),
            gender: empty_as_none(self.gender),
            age: self.age,
            image_url: empty_as_none(self.image_url),
            birth_place: empty_as_none(self.birth_place),
            birth_date: empty_as_none(self.birth_date),
            height: self.height,
            weight: self.weight,
            cup_size: empty_as_none(self.cup_size),
            blood_type: empty_as_none(self.blood_type),
            bust: self.bust,
            waist: self.waist,
            hip: self.hip,
            description: empty_as_none(self.description),
        };
        let source = self
            .source
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        (fields, source)
    }
}

/// Request body for `POST /characters/edit`.
#[derive(Debug, Deserialize)]
pub struct EditCharacterRequest {
    pub id: DbId,
    #[serde(flatten)]
    pub form: CharacterForm,
}

/// Request body for `POST /characters/tags/add` and `/characters/tags/remove`.
#[derive(Debug, Deserialize)]
pub struct CharacterTagRequest {
    pub character_id: DbId,
    pub tag_id: DbId,
}

/// Request body for `POST /characters/relationships/update`.
#[derive(Debug, Deserialize)]
pub struct UpdateRelationshipsRequest {
    pub character_id: DbId,
    #[serde(default)]
    pub relationships: Vec<RelationshipInput>,
}

#[derive(Debug, Serialize)]
pub struct UpdateRelationshipsResponse {
    pub summary: ReconcileSummary,
    pub character: CharacterView,
}

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

/// POST /characters/create
///
/// Create a character, link it to its source, and return the full view.
pub async fn create_character(
    State(state): State<AppState>,
    RequireCreator(auth): RequireCreator<CharacterForm>,
) -> AppResult<(StatusCode, Json<CharacterView>)> {
    auth.payload.validate()?;
    let (fields, source) = auth.payload.into_parts();

    let character = CharacterRepo::create(&state.pool, &fields).await?;
    link_source(&state, character.id, source.as_deref()).await?;

    tracing::info!(
        character_id = character.id,
        user_id = auth.session.user_id(),
        "Character created",
    );

    let view = load_view(&state, character.id).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// POST /characters/edit
///
/// Replace every column of a character. Omitted optional fields become NULL.
/// A given source is linked in addition to existing ones.
pub async fn edit_character(
    State(state): State<AppState>,
    RequireCreator(auth): RequireCreator<EditCharacterRequest>,
) -> AppResult<Json<CharacterView>> {
    let EditCharacterRequest { id, form } = auth.payload;
    form.validate()?;
    let (fields, source) = form.into_parts();

    CharacterRepo::update(&state.pool, id, &fields)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(entity::CHARACTER, id)))?;
    link_source(&state, id, source.as_deref()).await?;

    tracing::info!(character_id = id, user_id = auth.session.user_id(), "Character updated");

    Ok(Json(load_view(&state, id).await?))
}

/// GET /characters/get/{id}
///
/// Full character view including oriented relationships.
pub async fn get_character(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<CharacterView>> {
    Ok(Json(load_view(&state, id).await?))
}

// ---------------------------------------------------------------------------
// Character tags
// ---------------------------------------------------------------------------

/// POST /characters/tags/add
///
/// 201 with the new link, or 200 with a message when it already existed.
pub async fn add_character_tag(
    State(state): State<AppState>,
    RequireCreator(auth): RequireCreator<CharacterTagRequest>,
) -> AppResult<Response> {
    let CharacterTagRequest { character_id, tag_id } = auth.payload;

    ensure_character_exists(&state, character_id).await?;
    TagRepo::find_tag(&state.pool, tag_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(entity::TAG, tag_id)))?;

    match TagRepo::add_to_character(&state.pool, character_id, tag_id).await? {
        Some(link) => {
            tracing::info!(character_id, tag_id, user_id = auth.session.user_id(), "Tag added to character");
            Ok((StatusCode::CREATED, Json(link)).into_response())
        }
        None => Ok(Json(MessageResponse::new("Tag already added to character")).into_response()),
    }
}

/// POST /characters/tags/remove
pub async fn remove_character_tag(
    State(state): State<AppState>,
    RequireCreator(auth): RequireCreator<CharacterTagRequest>,
) -> AppResult<impl IntoResponse> {
    let CharacterTagRequest { character_id, tag_id } = auth.payload;

    let link = TagRepo::remove_from_character(&state.pool, character_id, tag_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: entity::CHARACTER_TAG,
                id: tag_id,
            })
        })?;

    tracing::info!(character_id, tag_id, user_id = auth.session.user_id(), "Tag removed from character");

    Ok(Json(link))
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

/// POST /characters/relationships/update
///
/// Make the submitted list the character's complete relationship set.
pub async fn update_relationships(
    State(state): State<AppState>,
    RequireCreator(auth): RequireCreator<UpdateRelationshipsRequest>,
) -> AppResult<Json<UpdateRelationshipsResponse>> {
    let UpdateRelationshipsRequest {
        character_id,
        relationships,
    } = auth.payload;

    ensure_character_exists(&state, character_id).await?;
    let summary = RelationshipRepo::reconcile(&state.pool, character_id, &relationships).await?;

    tracing::info!(
        character_id,
        user_id = auth.session.user_id(),
        created = summary.created,
        updated = summary.updated,
        deleted = summary.deleted,
        "Relationships updated",
    );

    let character = load_view(&state, character_id).await?;
    Ok(Json(UpdateRelationshipsResponse { summary, character }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_view(state: &AppState, id: DbId) -> AppResult<CharacterView> {
    CharacterRepo::find_view(&state.pool, id, true)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(entity::CHARACTER, id)))
}

async fn ensure_character_exists(state: &AppState, id: DbId) -> AppResult<()> {
    CharacterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(entity::CHARACTER, id)))?;
    Ok(())
}

async fn link_source(state: &AppState, character_id: DbId, name: Option<&str>) -> AppResult<()> {
    if let Some(name) = name {
        let source = SourceRepo::find_or_create(&state.pool, name).await?;
        SourceRepo::link_character(&state.pool, character_id, source.id).await?;
    }
    Ok(())
}
