use axum::routing::get;
use axum::Router;

use crate::handlers::sources;
use crate::state::AppState;

/// Routes mounted at `/sources`.
///
/// `/get/all` is registered alongside `/get/{id}`; the static segment wins.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/get/all", get(sources::list_sources))
        .route("/get/{id}", get(sources::get_source))
}
