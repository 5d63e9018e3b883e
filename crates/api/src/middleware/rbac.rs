//! Capability-based access control extractors.
//!
//! Each extractor wraps [`SessionAuth`] and rejects requests whose role set
//! does not grant the required capability.

use axum::extract::{FromRequest, Request};
use chardb_core::roles::{authorize, Capability};
use serde::de::{DeserializeOwned, IgnoredAny};

use super::session::{decode_payload, read_session_body, AuthSession, SessionAuth};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Fail with 403 unless the session's user holds `capability`.
pub fn require_capability(session: &AuthSession, capability: Capability) -> AppResult<()> {
    authorize(&session.user.roles, capability).map_err(AppError::Core)
}

/// Requires a role with `can_create`. Rejects with 403 Forbidden otherwise.
///
/// The capability is checked before the payload is decoded.
///
/// ```ignore
/// async fn create(RequireCreator(auth): RequireCreator<CharacterForm>) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireCreator<T = IgnoredAny>(pub SessionAuth<T>);

impl<T> FromRequest<AppState> for RequireCreator<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (session, body) = read_session_body(req, state).await?;
        require_capability(&session, Capability::Create)?;
        let payload = decode_payload(body)?;
        Ok(RequireCreator(SessionAuth { session, payload }))
    }
}
