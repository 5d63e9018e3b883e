//! Route definitions for the `/images` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// Routes mounted at `/images`.
///
/// ```text
/// POST /new                -> new_image
/// POST /upload             -> upload_image (multipart)
/// POST /delete             -> delete_image
/// POST /characters/add     -> add_image_characters
/// POST /characters/remove  -> remove_image_characters
/// GET  /character/{id}     -> character_images
/// GET  /source/{id}        -> source_images
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/new", post(images::new_image))
        .route(
            "/upload",
            post(images::upload_image).layer(DefaultBodyLimit::max(images::MAX_UPLOAD_BYTES)),
        )
        .route("/delete", post(images::delete_image))
        .route("/characters/add", post(images::add_image_characters))
        .route("/characters/remove", post(images::remove_image_characters))
        .route("/character/{id}", get(images::character_images))
        .route("/source/{id}", get(images::source_images))
}
