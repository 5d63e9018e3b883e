//! Handlers for tag categories and tags.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chardb_core::error::CoreError;
use chardb_core::input::empty_as_none;
use chardb_core::types::{entity, DbId};
use chardb_db::models::tag::{
    CategoryWithTags, CreateTag, CreateTagCategory, TagCategory, TagWithCategory,
};
use chardb_db::repositories::TagRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::path::AppPath;
use crate::middleware::rbac::RequireCreator;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Request body for `POST /tags/categories/create`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub color: Option<String>,
}

/// Request body for `POST /tags/create`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub color: Option<String>,
    pub category_id: DbId,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// GET /tags/categories
///
/// 404 when no category exists yet.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<TagCategory>>> {
    let categories = TagRepo::list_categories(&state.pool).await?;
    if categories.is_empty() {
        return Err(AppError::NotFound("Categories not found".into()));
    }
    Ok(Json(categories))
}

/// GET /tags/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<CategoryWithTags>> {
    let category = TagRepo::find_category_with_tags(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(entity::TAG_CATEGORY, id)))?;
    Ok(Json(category))
}

/// POST /tags/categories/create
///
/// A duplicate title is rejected with 409 by `uq_tag_categories_title`.
pub async fn create_category(
    State(state): State<AppState>,
    RequireCreator(auth): RequireCreator<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<TagCategory>)> {
    let input = auth.payload;
    input.validate()?;

    let category = TagRepo::create_category(
        &state.pool,
        &CreateTagCategory {
            title: input.title,
            description: empty_as_none(input.description),
            color: empty_as_none(input.color),
        },
    )
    .await?;

    tracing::info!(
        category_id = category.id,
        user_id = auth.session.user_id(),
        "Tag category created",
    );

    Ok((StatusCode::CREATED, Json(category)))
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// GET /tags/get/{id}
pub async fn get_tag(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<TagWithCategory>> {
    let tag = TagRepo::find_tag_with_category(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(entity::TAG, id)))?;
    Ok(Json(tag))
}

/// POST /tags/create
///
/// 201 with the tag, or 200 with a message when the category already has a
/// tag with that title.
pub async fn create_tag(
    State(state): State<AppState>,
    RequireCreator(auth): RequireCreator<CreateTagRequest>,
) -> AppResult<Response> {
    let input = auth.payload;
    input.validate()?;

    TagRepo::find_category(&state.pool, input.category_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(
            entity::TAG_CATEGORY,
            input.category_id,
        )))?;

    let created = TagRepo::create_tag(
        &state.pool,
        &CreateTag {
            title: input.title,
            description: empty_as_none(input.description),
            color: empty_as_none(input.color),
            category_id: input.category_id,
        },
    )
    .await?;

    match created {
        Some(tag) => {
            tracing::info!(tag_id = tag.id, user_id = auth.session.user_id(), "Tag created");
            Ok((StatusCode::CREATED, Json(tag)).into_response())
        }
        None => Ok(Json(MessageResponse::new("Tag already exists")).into_response()),
    }
}
