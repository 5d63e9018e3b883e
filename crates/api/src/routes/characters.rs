//! Route definitions for the `/characters` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::character;
use crate::state::AppState;

/// Routes mounted at `/characters`.
///
/// ```text
/// POST /create                 -> create_character
/// POST /edit                   -> edit_character
/// GET  /get/{id}               -> get_character
/// POST /tags/add               -> add_character_tag
/// POST /tags/remove            -> remove_character_tag
/// POST /relationships/update   -> update_relationships
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(character::create_character))
        .route("/edit", post(character::edit_character))
        .route("/get/{id}", get(character::get_character))
        .route("/tags/add", post(character::add_character_tag))
        .route("/tags/remove", post(character::remove_character_tag))
        .route("/relationships/update", post(character::update_relationships))
}
