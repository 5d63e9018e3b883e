//! Path parameter extractor with JSON error bodies.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::state::AppState;

/// Like [`Path`], but an unparseable segment rejects with a 400 [`AppError`].
///
/// ```ignore
/// async fn get_character(AppPath(id): AppPath<DbId>) -> AppResult<Json<()>> { ... }
/// ```
pub struct AppPath<T>(pub T);

impl<T> FromRequestParts<AppState> for AppPath<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(AppPath(value))
    }
}
