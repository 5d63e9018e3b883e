//! Handlers for the `/sources` resource. Read-only; sources are created
//! implicitly by character create/edit.

use axum::extract::State;
use axum::Json;
use chardb_core::error::CoreError;
use chardb_core::types::{entity, DbId};
use chardb_db::models::character::{Character, CharacterView};
use chardb_db::models::source::SourceWithCharacters;
use chardb_db::repositories::{CharacterRepo, SourceRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::path::AppPath;
use crate::state::AppState;

/// GET /sources/get/all
///
/// Every source with its plain character rows.
pub async fn list_sources(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SourceWithCharacters<Character>>>> {
    let sources = SourceRepo::list(&state.pool).await?;

    let mut result = Vec::with_capacity(sources.len());
    for source in sources {
        let characters = CharacterRepo::list_by_source(&state.pool, source.id).await?;
        result.push(SourceWithCharacters { source, characters });
    }
    Ok(Json(result))
}

/// GET /sources/get/{id}
///
/// One source with full character views (sources, tags, relationships).
pub async fn get_source(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<SourceWithCharacters<CharacterView>>> {
    let source = SourceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(entity::SOURCE, id)))?;

    let members = CharacterRepo::list_by_source(&state.pool, id).await?;
    let mut characters = Vec::with_capacity(members.len());
    for member in members {
        if let Some(view) = CharacterRepo::find_view(&state.pool, member.id, true).await? {
            characters.push(view);
        }
    }

    Ok(Json(SourceWithCharacters { source, characters }))
}
