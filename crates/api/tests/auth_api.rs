//! HTTP-level integration tests for registration, login, logout and profile.

mod common;

use axum::http::StatusCode;
use chardb_core::roles::ROLE_EDITOR;
use chardb_db::repositories::{SessionRepo, UserRepo};
use common::{authed, body_json, build_test_app, create_user, post_json, session_for, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_creates_user_without_roles(pool: PgPool) {
    let response = post_json(
        build_test_app(pool.clone()),
        "/auth/register",
        json!({ "username": "newbie", "password": "long-enough-pw" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["username"], "newbie");
    assert!(json.get("password_hash").is_none());

    let id = json["id"].as_i64().unwrap();
    let profile = UserRepo::find_profile(&pool, id).await.unwrap().unwrap();
    assert!(profile.roles.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_duplicate_username_is_400(pool: PgPool) {
    create_user(&pool, "taken", None).await;

    let response = post_json(
        build_test_app(pool),
        "/auth/register",
        json!({ "username": "taken", "password": "long-enough-pw" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "User already exists");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_rejects_short_password(pool: PgPool) {
    let response = post_json(
        build_test_app(pool.clone()),
        "/auth/register",
        json!({ "username": "shorty", "password": "abc" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(UserRepo::find_by_username(&pool, "shorty").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_rejects_short_username(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/auth/register",
        json!({ "username": "ab", "password": "long-enough-pw" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_missing_field_is_400(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/auth/register",
        json!({ "username": "nopass" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_returns_token_and_roles(pool: PgPool) {
    let user = create_user(&pool, "editor1", Some(ROLE_EDITOR)).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/auth/login",
        json!({ "username": "editor1", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Logged in successfully");
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["roles"][0]["name"], ROLE_EDITOR);
    assert_eq!(json["token"].as_str().unwrap().len(), 128);
    assert_eq!(SessionRepo::count_for_user(&pool, user.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_twice_opens_two_sessions(pool: PgPool) {
    let user = create_user(&pool, "twice", None).await;
    let body = json!({ "username": "twice", "password": TEST_PASSWORD });

    let first = body_json(post_json(build_test_app(pool.clone()), "/auth/login", body.clone()).await).await;
    let second = body_json(post_json(build_test_app(pool.clone()), "/auth/login", body).await).await;

    assert_ne!(first["token"], second["token"]);
    assert_eq!(SessionRepo::count_for_user(&pool, user.id).await.unwrap(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password_is_401_without_session(pool: PgPool) {
    let user = create_user(&pool, "wrongpw", None).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/auth/login",
        json!({ "username": "wrongpw", "password": "not-the-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid credentials");
    assert_eq!(SessionRepo::count_for_user(&pool, user.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_unknown_user_is_401(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/auth/login",
        json!({ "username": "ghost", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Profile and logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_with_valid_token(pool: PgPool) {
    let (user_id, token) = session_for(&pool, "profiled", Some(ROLE_EDITOR)).await;

    let response = post_json(build_test_app(pool), "/auth/profile", authed(user_id, &token, json!({}))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Token is valid");
    assert_eq!(json["user"]["username"], "profiled");
    assert_eq!(json["user"]["roles"][0]["can_create"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_accepts_string_user_id(pool: PgPool) {
    let (user_id, token) = session_for(&pool, "stringy", None).await;

    let response = post_json(
        build_test_app(pool),
        "/auth/profile",
        json!({ "user_id": user_id.to_string(), "token": token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_with_wrong_token_is_401(pool: PgPool) {
    let (user_id, _) = session_for(&pool, "forged", None).await;

    let response = post_json(
        build_test_app(pool),
        "/auth/profile",
        authed(user_id, &"ab".repeat(64), json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_of_other_user_is_401(pool: PgPool) {
    let (_, token) = session_for(&pool, "owner", None).await;
    let other = create_user(&pool, "thief", None).await;

    let response = post_json(build_test_app(pool), "/auth/profile", authed(other.id, &token, json!({}))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_without_token_is_400(pool: PgPool) {
    let response = post_json(build_test_app(pool), "/auth/profile", json!({ "user_id": 1 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "User ID and token are required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_invalidates_only_that_session(pool: PgPool) {
    let (user_id, token) = session_for(&pool, "leaver", None).await;
    let other_token = common::login(build_test_app(pool.clone()), "leaver").await;

    let response = post_json(build_test_app(pool.clone()), "/auth/logout", authed(user_id, &token, json!({}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Logged out successfully");

    let reused = post_json(build_test_app(pool.clone()), "/auth/profile", authed(user_id, &token, json!({}))).await;
    assert_eq!(reused.status(), StatusCode::UNAUTHORIZED);

    let still_valid = post_json(build_test_app(pool), "/auth/profile", authed(user_id, &other_token, json!({}))).await;
    assert_eq!(still_valid.status(), StatusCode::OK);
}
