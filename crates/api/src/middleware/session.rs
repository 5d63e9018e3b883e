//! Body-based session authentication.
//!
//! Clients send `user_id` and `token` inside the JSON body of every
//! authenticated request, next to the endpoint's own fields.

use axum::extract::{FromRequest, Request};
use axum::Json;
use chardb_core::error::CoreError;
use chardb_core::types::DbId;
use chardb_db::models::user::UserProfile;
use chardb_db::repositories::{SessionRepo, UserRepo};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;

use crate::auth::token::hash_session_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A validated session and the user that owns it.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserProfile,
    /// Digest of the presented token, identifying the session row.
    pub token_hash: String,
}

impl AuthSession {
    pub fn user_id(&self) -> DbId {
        self.user.id
    }
}

/// Validate a (user id, plaintext token) pair and load the user with its roles.
///
/// Rejects with 401 when no session matches or the user no longer exists.
pub async fn authenticate(state: &AppState, user_id: DbId, token: &str) -> AppResult<AuthSession> {
    let token_hash = hash_session_token(token);

    SessionRepo::validate(&state.pool, user_id, &token_hash)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid token".into())))?;

    let user = UserRepo::find_profile(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    Ok(AuthSession { user, token_hash })
}

/// Parse a `user_id` that may arrive as a JSON number or a numeric string.
pub fn parse_user_id(value: Option<&Value>) -> Option<DbId> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Authenticated request whose JSON body is `{ user_id, token, ...T }`.
///
/// The session is checked before `T` is deserialized, so an invalid token is
/// reported as 401 even when the rest of the body is malformed.
///
/// ```ignore
/// async fn logout(State(state): State<AppState>, auth: SessionAuth) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.session.user_id(), "logging out");
///     Ok(Json(()))
/// }
/// ```
pub struct SessionAuth<T = IgnoredAny> {
    pub session: AuthSession,
    pub payload: T,
}

impl<T> FromRequest<AppState> for SessionAuth<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (session, body) = read_session_body(req, state).await?;
        let payload = decode_payload(body)?;
        Ok(SessionAuth { session, payload })
    }
}

/// Read a JSON body, authenticate its `user_id` + `token`, and return the
/// session with the remaining fields.
pub(crate) async fn read_session_body(
    req: Request,
    state: &AppState,
) -> AppResult<(AuthSession, Value)> {
    let Json(mut body) = Json::<Value>::from_request(req, state)
        .await
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let user_id = parse_user_id(body.get("user_id"));
    let token = body
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_owned);
    let (Some(user_id), Some(token)) = (user_id, token) else {
        return Err(AppError::BadRequest("User ID and token are required".into()));
    };

    let session = authenticate(state, user_id, &token).await?;

    if let Value::Object(map) = &mut body {
        map.remove("user_id");
        map.remove("token");
    }
    Ok((session, body))
}

/// Deserialize the endpoint-specific part of an authenticated body.
pub(crate) fn decode_payload<T: DeserializeOwned>(body: Value) -> AppResult<T> {
    serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
}
