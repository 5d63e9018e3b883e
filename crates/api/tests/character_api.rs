//! HTTP-level integration tests for characters, character tags and sources.

mod common;

use axum::http::StatusCode;
use chardb_core::roles::{ROLE_EDITOR, ROLE_VIEWER};
use chardb_db::models::tag::{CreateTag, CreateTagCategory};
use chardb_db::repositories::TagRepo;
use common::{authed, body_json, build_test_app, get, post_json, session_for};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a character through the API as an editor and return the response JSON.
async fn create_character(pool: &PgPool, user_id: i64, token: &str, form: Value) -> Value {
    let response = post_json(
        build_test_app(pool.clone()),
        "/characters/create",
        authed(user_id, token, form),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn seed_tag(pool: &PgPool) -> i64 {
    let category = TagRepo::create_category(
        pool,
        &CreateTagCategory {
            title: "Hair".into(),
            description: None,
            color: None,
        },
    )
    .await
    .unwrap();
    TagRepo::create_tag(
        pool,
        &CreateTag {
            title: "Twin tails".into(),
            description: None,
            color: Some("#39c5bb".into()),
            category_id: category.id,
        },
    )
    .await
    .unwrap()
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Create / edit / get
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_character_normalizes_form_input(pool: PgPool) {
    let (user_id, token) = session_for(&pool, "editor", Some(ROLE_EDITOR)).await;

    let json = create_character(
        &pool,
        user_id,
        &token,
        json!({
            "name": "Hatsune Miku",
            "jp_name": "初音ミク",
            "gender": "",
            "age": "16",
            "height": 158,
            "weight": "",
            "source": "Vocaloid",
        }),
    )
    .await;

    assert_eq!(json["name"], "Hatsune Miku");
    assert_eq!(json["jp_name"], "初音ミク");
    assert_eq!(json["gender"], Value::Null);
    assert_eq!(json["age"], 16);
    assert_eq!(json["height"], 158);
    assert_eq!(json["weight"], Value::Null);
    assert_eq!(json["sources"][0]["name"], "Vocaloid");
    assert_eq!(json["tags"], json!([]));
    assert_eq!(json["relationships"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_character_rejects_short_name(pool: PgPool) {
    let (user_id, token) = session_for(&pool, "editor", Some(ROLE_EDITOR)).await;

    let response = post_json(
        build_test_app(pool),
        "/characters/create",
        authed(user_id, &token, json!({ "name": "Al" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_character_rejects_non_numeric_age(pool: PgPool) {
    let (user_id, token) = session_for(&pool, "editor", Some(ROLE_EDITOR)).await;

    let response = post_json(
        build_test_app(pool),
        "/characters/create",
        authed(user_id, &token, json!({ "name": "Kagamine Rin", "age": "fourteen" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_character_as_viewer_is_403(pool: PgPool) {
    let (user_id, token) = session_for(&pool, "viewer", Some(ROLE_VIEWER)).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/characters/create",
        authed(user_id, &token, json!({ "name": "Megurine Luka" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM characters")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_viewer_is_rejected_before_payload_validation(pool: PgPool) {
    let (user_id, token) = session_for(&pool, "viewer", Some(ROLE_VIEWER)).await;

    let response = post_json(
        build_test_app(pool),
        "/characters/create",
        authed(user_id, &token, json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_character_with_bad_token_is_401(pool: PgPool) {
    let (user_id, _) = session_for(&pool, "editor", Some(ROLE_EDITOR)).await;

    let response = post_json(
        build_test_app(pool),
        "/characters/create",
        authed(user_id, "not-a-token", json!({ "name": "Kaito" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_character_replaces_fields_and_adds_source(pool: PgPool) {
    let (user_id, token) = session_for(&pool, "editor", Some(ROLE_EDITOR)).await;
    let created = create_character(
        &pool,
        user_id,
        &token,
        json!({ "name": "Hatsune Miku", "age": 16, "blood_type": "A", "source": "Vocaloid" }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = post_json(
        build_test_app(pool.clone()),
        "/characters/edit",
        authed(
            user_id,
            &token,
            json!({ "id": id, "name": "Miku Hatsune", "age": "17", "source": "Project DIVA" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["name"], "Miku Hatsune");
    assert_eq!(json["age"], 17);
    assert_eq!(json["blood_type"], Value::Null, "omitted field is cleared");
    let sources: Vec<&str> = json["sources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(sources.len(), 2);
    assert!(sources.contains(&"Vocaloid"));
    assert!(sources.contains(&"Project DIVA"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_missing_character_is_404(pool: PgPool) {
    let (user_id, token) = session_for(&pool, "editor", Some(ROLE_EDITOR)).await;

    let response = post_json(
        build_test_app(pool),
        "/characters/edit",
        authed(user_id, &token, json!({ "id": 999_999, "name": "Nobody Here" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_character_is_public(pool: PgPool) {
    let (user_id, token) = session_for(&pool, "editor", Some(ROLE_EDITOR)).await;
    let created = create_character(&pool, user_id, &token, json!({ "name": "Kagamine Len" })).await;
    let id = created["id"].as_i64().unwrap();

    let response = get(build_test_app(pool), &format!("/characters/get/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "Kagamine Len");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_numeric_id_is_json_400(pool: PgPool) {
    for uri in ["/characters/get/abc", "/sources/get/x1", "/tags/get/1.5", "/tags/categories/nope"] {
        let response = get(build_test_app(pool.clone()), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("application/json"), "{uri}: {content_type}");
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST", "{uri}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_character_is_404(pool: PgPool) {
    let response = get(build_test_app(pool), "/characters/get/424242").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Character tags
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_and_remove_character_tag(pool: PgPool) {
    let (user_id, token) = session_for(&pool, "editor", Some(ROLE_EDITOR)).await;
    let created = create_character(&pool, user_id, &token, json!({ "name": "Hatsune Miku" })).await;
    let character_id = created["id"].as_i64().unwrap();
    let tag_id = seed_tag(&pool).await;
    let link = json!({ "character_id": character_id, "tag_id": tag_id });

    let added = post_json(build_test_app(pool.clone()), "/characters/tags/add", authed(user_id, &token, link.clone())).await;
    assert_eq!(added.status(), StatusCode::CREATED);

    let again = post_json(build_test_app(pool.clone()), "/characters/tags/add", authed(user_id, &token, link.clone())).await;
    assert_eq!(again.status(), StatusCode::OK);
    assert_eq!(body_json(again).await["message"], "Tag already added to character");

    let view = body_json(get(build_test_app(pool.clone()), &format!("/characters/get/{character_id}")).await).await;
    assert_eq!(view["tags"][0]["title"], "Twin tails");

    let removed = post_json(build_test_app(pool.clone()), "/characters/tags/remove", authed(user_id, &token, link.clone())).await;
    assert_eq!(removed.status(), StatusCode::OK);

    let missing = post_json(build_test_app(pool), "/characters/tags/remove", authed(user_id, &token, link)).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_unknown_tag_is_404(pool: PgPool) {
    let (user_id, token) = session_for(&pool, "editor", Some(ROLE_EDITOR)).await;
    let created = create_character(&pool, user_id, &token, json!({ "name": "Hatsune Miku" })).await;

    let response = post_json(
        build_test_app(pool),
        "/characters/tags/add",
        authed(user_id, &token, json!({ "character_id": created["id"], "tag_id": 777 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sources_list_and_detail(pool: PgPool) {
    let empty = get(build_test_app(pool.clone()), "/sources/get/all").await;
    assert_eq!(empty.status(), StatusCode::OK);
    assert_eq!(body_json(empty).await, json!([]));

    let (user_id, token) = session_for(&pool, "editor", Some(ROLE_EDITOR)).await;
    let created = create_character(
        &pool,
        user_id,
        &token,
        json!({ "name": "Hatsune Miku", "source": "Vocaloid" }),
    )
    .await;
    let source_id = created["sources"][0]["id"].as_i64().unwrap();

    let all = body_json(get(build_test_app(pool.clone()), "/sources/get/all").await).await;
    assert_eq!(all[0]["name"], "Vocaloid");
    assert_eq!(all[0]["characters"][0]["name"], "Hatsune Miku");

    let detail = get(build_test_app(pool.clone()), &format!("/sources/get/{source_id}")).await;
    assert_eq!(detail.status(), StatusCode::OK);
    let detail = body_json(detail).await;
    assert_eq!(detail["characters"][0]["sources"][0]["name"], "Vocaloid");

    let missing = get(build_test_app(pool), "/sources/get/31337").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
