#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chardb_api::auth::password::hash_password;
use chardb_api::config::ServerConfig;
use chardb_api::image_host::{ImageHost, ImageHostError, UploadedImage};
use chardb_api::router::build_app_router;
use chardb_api::state::AppState;
use chardb_db::models::user::{CreateUser, User};
use chardb_db::repositories::{RoleRepo, UserRepo};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        min_password_length: 8,
        db_max_connections: 5,
        picsur: None,
    }
}

/// Build the full application router, with no image host configured.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app(pool, None)
}

/// Build the full application router backed by the given image host.
pub fn build_test_app_with_host(pool: PgPool, host: Arc<dyn ImageHost>) -> Router {
    build_app(pool, Some(host))
}

fn build_app(pool: PgPool, image_host: Option<Arc<dyn ImageHost>>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        image_host,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a `multipart/form-data` body built from text fields and one optional file.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> Response<Body> {
    const BOUNDARY: &str = "chardb-test-boundary";
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

/// Create a user directly in the database, optionally granting a seeded role.
pub async fn create_user(pool: &PgPool, username: &str, role: Option<&str>) -> User {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash: hashed,
        },
    )
    .await
    .expect("user creation should succeed");

    if let Some(name) = role {
        let role = RoleRepo::find_by_name(pool, name)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("role {name} should be seeded"));
        UserRepo::assign_role(pool, user.id, role.id).await.unwrap();
    }
    user
}

/// Log in through the API and return the plaintext session token.
pub async fn login(app: Router, username: &str) -> String {
    let response = post_json(
        app,
        "/auth/login",
        json!({ "username": username, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), 200, "login should succeed");
    body_json(response).await["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}

/// Create a user with the given role and log it in. Returns `(user_id, token)`.
pub async fn session_for(pool: &PgPool, username: &str, role: Option<&str>) -> (i64, String) {
    let user = create_user(pool, username, role).await;
    let token = login(build_test_app(pool.clone()), username).await;
    (user.id, token)
}

/// Merge `user_id` and `token` into a JSON object body.
pub fn authed(user_id: i64, token: &str, mut body: Value) -> Value {
    let map = body.as_object_mut().expect("body must be an object");
    map.insert("user_id".into(), json!(user_id));
    map.insert("token".into(), json!(token));
    body
}

// ---------------------------------------------------------------------------
// Fake image host
// ---------------------------------------------------------------------------

/// In-memory [`ImageHost`] recording uploads and deletions.
#[derive(Default)]
pub struct FakeImageHost {
    pub uploads: Mutex<Vec<(String, String, usize)>>,
    pub deleted: Mutex<Vec<String>>,
    /// When set, every call fails with this status.
    pub fail_with: Option<u16>,
}

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedImage, ImageHostError> {
        if let Some(status) = self.fail_with {
            return Err(ImageHostError::ApiError {
                status,
                body: "upstream failure".into(),
            });
        }
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((filename.to_string(), content_type.to_string(), bytes.len()));
        let remote_id = format!("remote-{}", uploads.len());
        Ok(UploadedImage {
            url: format!("https://pics.test/i/{remote_id}"),
            remote_id,
        })
    }

    async fn delete(&self, remote_id: &str) -> Result<(), ImageHostError> {
        if let Some(status) = self.fail_with {
            return Err(ImageHostError::ApiError {
                status,
                body: "upstream failure".into(),
            });
        }
        self.deleted.lock().unwrap().push(remote_id.to_string());
        Ok(())
    }
}
