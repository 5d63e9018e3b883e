//! Handlers for the `/images` resource.
//!
//! Images are either external URLs registered with `/images/new` or files
//! uploaded through the configured image host.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chardb_core::error::CoreError;
use chardb_core::roles::Capability;
use chardb_core::types::{entity, DbId};
use chardb_db::models::character::Character;
use chardb_db::models::image::{CreateImage, Image};
use chardb_db::repositories::{CharacterRepo, ImageRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::image_host::{is_allowed_content_type, ALLOWED_CONTENT_TYPES};
use crate::middleware::path::AppPath;
use crate::middleware::rbac::{require_capability, RequireCreator};
use crate::middleware::session::authenticate;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Upper bound on an uploaded file, enforced on the upload route.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /images/new`.
#[derive(Debug, Deserialize)]
pub struct NewImageRequest {
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub characters: Vec<DbId>,
}

/// Request body for `POST /images/delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteImageRequest {
    pub image_id: DbId,
}

/// Request body for `POST /images/characters/add` and `/images/characters/remove`.
#[derive(Debug, Deserialize)]
pub struct ImageCharactersRequest {
    pub image_id: DbId,
    pub characters: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct ImageCreatedResponse {
    pub message: &'static str,
    pub image: Image,
    pub characters: Vec<Character>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /images/new
///
/// Register an externally hosted image and link it to characters.
pub async fn new_image(
    State(state): State<AppState>,
    RequireCreator(auth): RequireCreator<NewImageRequest>,
) -> AppResult<(StatusCode, Json<ImageCreatedResponse>)> {
    let NewImageRequest {
        image_url,
        characters,
    } = auth.payload;

    if !image_url.starts_with("http") {
        return Err(AppError::BadRequest("Invalid image URL".into()));
    }
    let characters = checked_characters(&state, characters).await?;

    let response = store_image(
        &state,
        CreateImage {
            image_url,
            remote_id: None,
        },
        characters,
    )
    .await?;

    tracing::info!(
        image_id = response.image.id,
        user_id = auth.session.user_id(),
        "Image added",
    );

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /images/upload
///
/// Multipart form with `user_id`, `token`, `characters` (JSON array or
/// comma-separated ids) and an `image` file. The file is stored on the image
/// host and linked like `/images/new`.
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<ImageCreatedResponse>)> {
    let mut multipart = multipart.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let mut form = UploadForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                form.file = Some(UploadedFile {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "user_id" | "token" | "characters" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                match name.as_str() {
                    "user_id" => form.user_id = text.trim().parse().ok(),
                    "token" => form.token = Some(text).filter(|t| !t.is_empty()),
                    _ => form.characters = Some(text),
                }
            }
            _ => {}
        }
    }

    let (Some(user_id), Some(token)) = (form.user_id, form.token.as_deref()) else {
        return Err(AppError::BadRequest("User ID and token are required".into()));
    };
    let session = authenticate(&state, user_id, token).await?;
    require_capability(&session, Capability::Create)?;

    let file = form
        .file
        .ok_or_else(|| AppError::BadRequest("Image file is required".into()))?;
    if !is_allowed_content_type(&file.content_type) {
        return Err(AppError::BadRequest(format!(
            "Invalid image type '{}', expected one of: {}",
            file.content_type,
            ALLOWED_CONTENT_TYPES.join(", ")
        )));
    }
    let ids = parse_character_ids(form.characters.as_deref().unwrap_or_default())
        .map_err(AppError::BadRequest)?;
    let characters = checked_characters(&state, ids).await?;

    let host = state.image_host()?;
    let uploaded = host
        .upload(&file.filename, &file.content_type, file.bytes)
        .await?;

    let remote_id = uploaded.remote_id.clone();
    let stored = store_image(
        &state,
        CreateImage {
            image_url: uploaded.url,
            remote_id: Some(uploaded.remote_id),
        },
        characters,
    )
    .await;
    let response = match stored {
        Ok(response) => response,
        Err(err) => {
            // Nothing references the hosted file now.
            if let Err(cleanup) = host.delete(&remote_id).await {
                tracing::warn!(remote_id = %remote_id, error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(err);
        }
    };

    tracing::info!(
        image_id = response.image.id,
        user_id = session.user_id(),
        "Image uploaded",
    );

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /images/delete
///
/// Remove the file from the image host (if it was uploaded there), then the row.
pub async fn delete_image(
    State(state): State<AppState>,
    RequireCreator(auth): RequireCreator<DeleteImageRequest>,
) -> AppResult<Json<MessageResponse>> {
    let image_id = auth.payload.image_id;
    let image = ImageRepo::find_by_id(&state.pool, image_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(entity::IMAGE, image_id)))?;

    if let Some(remote_id) = &image.remote_id {
        state.image_host()?.delete(remote_id).await?;
    }
    ImageRepo::delete(&state.pool, image_id).await?;

    tracing::info!(image_id, user_id = auth.session.user_id(), "Image deleted");

    Ok(Json(MessageResponse::new("Image deleted successfully")))
}

/// POST /images/characters/add
pub async fn add_image_characters(
    State(state): State<AppState>,
    RequireCreator(auth): RequireCreator<ImageCharactersRequest>,
) -> AppResult<Json<MessageResponse>> {
    let ImageCharactersRequest {
        image_id,
        characters,
    } = auth.payload;

    let linked = ImageRepo::add_characters(&state.pool, image_id, &characters).await?;

    tracing::info!(image_id, linked, user_id = auth.session.user_id(), "Characters added to image");

    Ok(Json(MessageResponse::new("Characters added to image successfully")))
}

/// POST /images/characters/remove
pub async fn remove_image_characters(
    State(state): State<AppState>,
    RequireCreator(auth): RequireCreator<ImageCharactersRequest>,
) -> AppResult<Json<MessageResponse>> {
    let ImageCharactersRequest {
        image_id,
        characters,
    } = auth.payload;

    let removed = ImageRepo::remove_characters(&state.pool, image_id, &characters).await?;

    tracing::info!(image_id, removed, user_id = auth.session.user_id(), "Characters removed from image");

    Ok(Json(MessageResponse::new("Characters removed from image successfully")))
}

/// GET /images/character/{id}
pub async fn character_images(
    State(state): State<AppState>,
    AppPath(character_id): AppPath<DbId>,
) -> AppResult<Json<Vec<Image>>> {
    Ok(Json(ImageRepo::list_for_character(&state.pool, character_id).await?))
}

/// GET /images/source/{id}
pub async fn source_images(
    State(state): State<AppState>,
    AppPath(source_id): AppPath<DbId>,
) -> AppResult<Json<Vec<Image>>> {
    Ok(Json(ImageRepo::list_for_source(&state.pool, source_id).await?))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Default)]
struct UploadForm {
    user_id: Option<DbId>,
    token: Option<String>,
    characters: Option<String>,
    file: Option<UploadedFile>,
}

struct UploadedFile {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Parse character ids from a multipart text field.
///
/// Accepts a JSON array (`[1, 2]`) or a comma-separated list (`1,2`).
pub fn parse_character_ids(raw: &str) -> Result<Vec<DbId>, String> {
    let raw = raw.trim();
    if raw.starts_with('[') {
        return serde_json::from_str(raw).map_err(|e| format!("Invalid characters array: {e}"));
    }
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<DbId>()
                .map_err(|_| format!("Invalid character id '{s}'"))
        })
        .collect()
}

/// Reject an empty list, then load the characters or fail with 404 naming the missing ids.
async fn checked_characters(state: &AppState, ids: Vec<DbId>) -> AppResult<Vec<Character>> {
    if ids.is_empty() {
        return Err(AppError::BadRequest("Invalid characters array".into()));
    }
    let missing = CharacterRepo::missing_ids(&state.pool, &ids).await?;
    if !missing.is_empty() {
        return Err(AppError::NotFound(format!(
            "Some characters not found: {missing:?}"
        )));
    }
    Ok(CharacterRepo::find_many(&state.pool, &ids).await?)
}

/// Insert the image row and link the already-checked characters.
///
/// A failed link removes the fresh row again.
async fn store_image(
    state: &AppState,
    input: CreateImage,
    characters: Vec<Character>,
) -> AppResult<ImageCreatedResponse> {
    let image = ImageRepo::create(&state.pool, &input).await?;
    let ids: Vec<DbId> = characters.iter().map(|c| c.id).collect();
    if let Err(err) = ImageRepo::add_characters(&state.pool, image.id, &ids).await {
        if let Err(cleanup) = ImageRepo::delete(&state.pool, image.id).await {
            tracing::warn!(image_id = image.id, error = %cleanup, "Failed to remove unlinked image");
        }
        return Err(err.into());
    }

    Ok(ImageCreatedResponse {
        message: "Image added successfully",
        image,
        characters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_ids_from_json_array() {
        assert_eq!(parse_character_ids("[1, 2, 3]").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn character_ids_from_comma_list() {
        assert_eq!(parse_character_ids(" 4, 5 ,").unwrap(), vec![4, 5]);
        assert!(parse_character_ids("").unwrap().is_empty());
    }

    #[test]
    fn character_ids_reject_garbage() {
        assert!(parse_character_ids("1,two").is_err());
        assert!(parse_character_ids("[1, \"x\"]").is_err());
    }
}
