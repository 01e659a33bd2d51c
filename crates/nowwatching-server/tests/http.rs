use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use mockito::{Matcher, Server, ServerGuard};
use nowwatching_core::config::AppConfig;
use nowwatching_core::db::DbHandle;
use nowwatching_core::models::CredentialRecord;
use nowwatching_core::store::CredentialStore;
use nowwatching_server::{router, AppContext};
use tower::ServiceExt;

struct Harness {
    upstream: ServerGuard,
    db: DbHandle,
    app: Router,
}

async fn harness() -> Harness {
    let upstream = Server::new_async().await;

    let mut config = AppConfig::default();
    config.server.base_url = "https://badge.example/api".into();
    config.trakt.client_id = "cid".into();
    config.trakt.client_secret = "secret".into();
    config.trakt.api_base = upstream.url();
    config.tmdb.api_key = "tmdb-key".into();
    config.tmdb.api_base = format!("{}/3", upstream.url());
    config.tmdb.image_base = format!("{}/img", upstream.url());

    let db = DbHandle::open_memory().unwrap();
    let ctx: Arc<AppContext> = AppContext::new(config, db.clone()).unwrap();
    Harness {
        upstream,
        db,
        app: router(ctx),
    }
}

async fn seed(db: &DbHandle, uid: &str) {
    db.save(
        uid,
        CredentialRecord {
            access_token: "live-token".into(),
            refresh_token: "refresh-token".into(),
            expired_ts: Some(Utc::now().timestamp() + 3600),
        },
    )
    .await
    .unwrap();
}

async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_missing_uid_is_not_ok() {
    let h = harness().await;
    let (status, _, body) = get(&h.app, "/api/view").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "not ok");
}

#[tokio::test]
async fn test_unknown_user_renders_offline_widget() {
    let h = harness().await;
    let (status, headers, body) = get(&h.app, "/api/view?uid=U1&show_offline=true").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/svg+xml");
    assert_eq!(headers[header::CACHE_CONTROL], "s-maxage=1");
    assert!(body.contains(r#"<div class="heading">Not playing</div>"#));
    assert!(body.contains(r#"<div class="title">Currently not playing on Stremio</div>"#));
    assert!(body.contains(r#"<div class="info">Offline</div>"#));
}

#[tokio::test]
async fn test_fallback_path_serves_widget() {
    let h = harness().await;
    let (_, headers, body) = get(&h.app, "/?uid=U1").await;
    assert_eq!(headers[header::CONTENT_TYPE], "image/svg+xml");
    assert!(body.contains("Recently played"));
}

#[tokio::test]
async fn test_interchange_swaps_movie_fields() {
    let mut h = harness().await;
    seed(&h.db, "sean").await;

    let watching = h
        .upstream
        .mock("GET", "/users/me/watching")
        .match_header("authorization", "Bearer live-token")
        .match_header("trakt-api-key", "cid")
        .with_status(200)
        .with_body(r#"{"type":"movie","movie":{"title":"Inception","year":2010,"ids":{"tmdb":27205,"slug":"inception-2010"}}}"#)
        .create_async()
        .await;
    let details = h
        .upstream
        .mock("GET", "/3/movie/27205")
        .match_query(Matcher::UrlEncoded("api_key".into(), "tmdb-key".into()))
        .with_status(200)
        .with_body(r#"{"genres":[{"id":878,"name":"Sci-Fi"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let (status, _, body) = get(
        &h.app,
        "/api/view?uid=sean&interchange=true&cover_image=false",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<div class="heading">Now playing</div>"#));
    assert!(body.contains(r#"<div class="title">2010 • Sci-Fi</div><div class="info">Inception</div>"#));
    assert_eq!(body.matches("class='bar'").count(), 75);
    watching.assert_async().await;
    details.assert_async().await;
}

#[tokio::test]
async fn test_redirect_to_trakt_page() {
    let mut h = harness().await;
    seed(&h.db, "sean").await;
    h.upstream
        .mock("GET", "/users/me/watching")
        .with_status(200)
        .with_body(r#"{"type":"movie","movie":{"title":"Inception","year":2010,"ids":{"slug":"inception-2010"}}}"#)
        .create_async()
        .await;

    let (status, headers, _) = get(&h.app, "/api/view?uid=sean&redirect=true").await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(headers[header::LOCATION], "https://trakt.tv/movies/inception-2010");
}

#[tokio::test]
async fn test_refresh_transport_failure_shows_relogin_text() {
    let mut h = harness().await;
    h.db.save(
        "sean",
        CredentialRecord {
            access_token: "old".into(),
            refresh_token: "refresh-token".into(),
            expired_ts: Some(0),
        },
    )
    .await
    .unwrap();
    // A non-JSON 5xx from the token endpoint is a transport-level failure.
    h.upstream
        .mock("POST", "/oauth/token")
        .with_status(502)
        .with_body("bad gateway")
        .create_async()
        .await;

    let (status, headers, body) = get(&h.app, "/api/view?uid=sean").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert!(body.starts_with("Error: Invalid Trakt access_token or refresh_token."));
    assert!(body.ends_with("Please re-login at /api/login"));
    assert!(h.db.load("sean").await.unwrap().is_some());
}

#[tokio::test]
async fn test_unavailable_token_endpoint_keeps_credential() {
    let mut h = harness().await;
    h.db.save(
        "sean",
        CredentialRecord {
            access_token: "old".into(),
            refresh_token: "refresh-token".into(),
            expired_ts: Some(0),
        },
    )
    .await
    .unwrap();
    h.upstream
        .mock("POST", "/oauth/token")
        .with_status(503)
        .with_body(r#"{"message":"Service Unavailable"}"#)
        .create_async()
        .await;

    let (status, _, body) = get(&h.app, "/api/view?uid=sean").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("Error: Invalid Trakt access_token or refresh_token."));

    let stored = h.db.load("sean").await.unwrap().unwrap();
    assert_eq!(stored.refresh_token, "refresh-token");
}

#[tokio::test]
async fn test_rejected_refresh_drops_credential() {
    let mut h = harness().await;
    h.db.save(
        "sean",
        CredentialRecord {
            access_token: "old".into(),
            refresh_token: "revoked".into(),
            expired_ts: None,
        },
    )
    .await
    .unwrap();
    h.upstream
        .mock("POST", "/oauth/token")
        .with_status(401)
        .with_body(r#"{"error":"invalid_grant","error_description":"revoked"}"#)
        .create_async()
        .await;

    let (_, headers, body) = get(&h.app, "/api/view?uid=sean&show_offline=true").await;
    assert_eq!(headers[header::CONTENT_TYPE], "image/svg+xml");
    assert!(body.contains("Not playing"));
    assert!(h.db.load("sean").await.unwrap().is_none());
}

#[tokio::test]
async fn test_login_redirects_to_consent_page() {
    let h = harness().await;
    for path in ["/api/login", "/api/trakt_login"] {
        let (status, headers, _) = get(&h.app, path).await;
        assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
        let location = headers[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("https://trakt.tv/oauth/authorize?response_type=code&client_id=cid"));
        assert!(location.contains("redirect_uri=https%3A%2F%2Fbadge.example%2Fapi%2Ftrakt_callback"));
    }
}

#[tokio::test]
async fn test_callback_without_code_is_not_ok() {
    let h = harness().await;
    let (_, _, body) = get(&h.app, "/api/trakt_callback").await;
    assert_eq!(body, "not ok");
}

#[tokio::test]
async fn test_callback_stores_credential() {
    let mut h = harness().await;
    let token = h
        .upstream
        .mock("POST", "/oauth/token")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "code": "abc",
            "grant_type": "authorization_code",
        })))
        .with_status(200)
        .with_body(r#"{"access_token":"new-access","refresh_token":"new-refresh","expires_in":7776000}"#)
        .create_async()
        .await;
    h.upstream
        .mock("GET", "/users/me")
        .match_header("authorization", "Bearer new-access")
        .with_status(200)
        .with_body(r#"{"username":"sean","ids":{"slug":"sean"}}"#)
        .create_async()
        .await;

    let (status, headers, body) = get(&h.app, "/api/trakt_callback?code=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    assert!(body.contains("<code>sean</code>"));
    assert!(body.contains("https://badge.example/api/view?uid=sean"));
    token.assert_async().await;

    let stored = h.db.load("sean").await.unwrap().unwrap();
    assert_eq!(stored.access_token, "new-access");
    assert_eq!(stored.refresh_token, "new-refresh");
    assert!(stored.expired_ts.unwrap() > Utc::now().timestamp());
}

#[tokio::test]
async fn test_callback_rejected_code_is_client_error() {
    let mut h = harness().await;
    h.upstream
        .mock("POST", "/oauth/token")
        .with_status(401)
        .with_body(r#"{"error":"invalid_grant"}"#)
        .create_async()
        .await;

    let (status, _, body) = get(&h.app, "/api/trakt_callback?code=stale").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("invalid_grant"));
    assert_eq!(h.db.credential_count().await.unwrap(), 0);
}
