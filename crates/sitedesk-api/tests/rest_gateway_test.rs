// Integration tests for `RestGateway` using wiremock.
#![allow(clippy::unwrap_used)]

use bytes::Bytes;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitedesk_api::{
    Embed, Error, Filter, Gateway, Order, RestGateway, RowId, Select, TransportConfig,
    UploadOptions, to_row,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RestGateway) {
    let server = MockServer::start().await;
    let gateway = RestGateway::new(
        &server.uri(),
        &SecretString::from("anon-key"),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, gateway)
}

// ── Tables ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_select_renders_embed_filter_and_order() {
    let (server, gateway) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/hero_images"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .and(query_param(
            "select",
            "*,media_asset:media_assets!hero_images_media_id_fkey(*)",
        ))
        .and(query_param("hero_id", "in.(h1,h2)"))
        .and(query_param("order", "position.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "i1", "hero_id": "h1", "media_id": 4, "position": 0,
              "media_asset": { "id": 4, "url": "https://cdn/x.jpg", "alt": "x.jpg" } }
        ])))
        .mount(&server)
        .await;

    let ids = [RowId::from("h1"), RowId::from("h2")];
    let query = Select::from("hero_images")
        .embed(Embed::new(
            "media_asset",
            "media_assets",
            "hero_images",
            "media_id",
        ))
        .filter(Filter::in_ids("hero_id", &ids))
        .order(Order::asc("position"));

    let rows = gateway.select(&query).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["media_asset"]["url"], json!("https://cdn/x.jpg"));
}

#[tokio::test]
async fn test_missing_table_code_is_preserved() {
    let (server, gateway) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/timeline_items"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "PGRST205",
            "details": null,
            "hint": "Perhaps you meant the table 'public.timeline'",
            "message": "Could not find the table 'public.timeline_items' in the schema cache"
        })))
        .mount(&server)
        .await;

    let err = gateway
        .select(&Select::from("timeline_items").limit(1))
        .await
        .unwrap_err();
    assert!(err.is_table_missing());
    assert!(err.to_string().contains("schema cache"));
}

#[tokio::test]
async fn test_permission_error_is_not_table_missing() {
    let (server, gateway) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/projects"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "42501",
            "message": "permission denied for table projects"
        })))
        .mount(&server)
        .await;

    let err = gateway.select(&Select::from("projects")).await.unwrap_err();
    assert!(!err.is_table_missing());
    assert!(err.is_auth_expired());
}

#[tokio::test]
async fn test_insert_returns_representation() {
    let (server, gateway) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/heroes"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!([{ "is_enabled": true, "sort_order": 2 }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            { "id": "h-new", "is_enabled": true, "sort_order": 2 }
        ])))
        .mount(&server)
        .await;

    let row = to_row(&json!({ "is_enabled": true, "sort_order": 2 })).unwrap();
    let stored = gateway.insert("heroes", vec![row]).await.unwrap();
    assert_eq!(stored[0]["id"], json!("h-new"));
}

#[tokio::test]
async fn test_update_and_delete_send_filters() {
    let (server, gateway) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/project_images"))
        .and(query_param("project_id", "eq.p1"))
        .and(body_json(json!({ "is_cover": false })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/media_assets"))
        .and(query_param("id", "eq.12"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let patch = to_row(&json!({ "is_cover": false })).unwrap();
    gateway
        .update("project_images", patch, &[Filter::eq("project_id", "p1")])
        .await
        .unwrap();
    gateway
        .delete("media_assets", &[Filter::eq("id", 12)])
        .await
        .unwrap();
}

// ── Storage ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_sends_cache_and_upsert_headers() {
    let (server, gateway) = setup().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/site-images/hero/h1_1700000000000_0.png"))
        .and(header("cache-control", "max-age=3600"))
        .and(header("x-upsert", "false"))
        .and(header("content-type", "image/png"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Key": "site-images/hero/h1_1700000000000_0.png"
        })))
        .mount(&server)
        .await;

    let options = UploadOptions {
        content_type: Some("image/png".into()),
        ..UploadOptions::default()
    };
    gateway
        .upload(
            "site-images",
            "hero/h1_1700000000000_0.png",
            Bytes::from_static(b"\x89PNG"),
            &options,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_upload_conflict_is_storage_error() {
    let (server, gateway) = setup().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/site-images/a.jpg"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "statusCode": "409",
            "error": "Duplicate",
            "message": "The resource already exists"
        })))
        .mount(&server)
        .await;

    let err = gateway
        .upload(
            "site-images",
            "a.jpg",
            Bytes::from_static(b"x"),
            &UploadOptions::default(),
        )
        .await
        .unwrap_err();

    match err {
        Error::Storage { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "The resource already exists");
        }
        other => panic!("expected storage error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_remove_sends_prefixes() {
    let (server, gateway) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/storage/v1/object/site-images"))
        .and(body_json(json!({ "prefixes": ["hero/a.jpg", "hero/b.jpg"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    gateway
        .remove("site-images", &["hero/a.jpg".into(), "hero/b.jpg".into()])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_public_url_shape() {
    let (server, gateway) = setup().await;
    assert_eq!(
        gateway.public_url("site-images", "about/x.jpg"),
        format!("{}/storage/v1/object/public/site-images/about/x.jpg", server.uri())
    );
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_sign_in_switches_bearer_and_notifies() {
    let (server, gateway) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_json(json!({ "email": "admin@example.com", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "user-jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r1",
            "user": { "id": "u-1", "email": "admin@example.com" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/heroes"))
        .and(header("authorization", "Bearer user-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer user-jwt"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut rx = gateway.subscribe_auth();
    let session = gateway
        .sign_in_with_password("admin@example.com", &SecretString::from("pw"))
        .await
        .unwrap();
    assert_eq!(session.user.email.as_deref(), Some("admin@example.com"));
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().as_ref().unwrap().user.id, "u-1");

    gateway.select(&Select::from("heroes")).await.unwrap();

    gateway.sign_out().await.unwrap();
    assert!(gateway.get_session().await.unwrap().is_none());
}

#[tokio::test]
async fn test_sign_in_rejection_is_authentication_error() {
    let (server, gateway) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let err = gateway
        .sign_in_with_password("admin@example.com", &SecretString::from("bad"))
        .await
        .unwrap_err();

    match err {
        Error::Authentication { message } => assert_eq!(message, "Invalid login credentials"),
        other => panic!("expected authentication error, got {other:?}"),
    }
    assert!(gateway.get_session().await.unwrap().is_none());
}
