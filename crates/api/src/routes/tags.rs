//! Route definitions for tag categories and tags.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// Routes mounted at `/tags`.
///
/// ```text
/// GET  /categories          -> list_categories
/// GET  /categories/{id}     -> get_category
/// POST /categories/create   -> create_category
/// GET  /get/{id}            -> get_tag
/// POST /create              -> create_tag
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(tags::list_categories))
        .route("/categories/{id}", get(tags::get_category))
        .route("/categories/create", post(tags::create_category))
        .route("/get/{id}", get(tags::get_tag))
        .route("/create", post(tags::create_tag))
}
