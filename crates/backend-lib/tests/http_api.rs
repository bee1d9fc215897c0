//! The HTTP surface, driven through the router with `oneshot`.
mod common;

use axum::http::StatusCode;
use chirpy_backend_lib::config::Platform;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{bearer, send, test_app, test_settings, POLKA_KEY};

async fn create_user(app: &axum::Router, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/users",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn login(app: &axum::Router, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_healthz() {
    let (app, _, _) = test_app(test_settings());
    let (status, _) = send(&app, "GET", "/api/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_user_and_login() {
    let (app, _, _) = test_app(test_settings());
    let user = create_user(&app, "walt@breakingbad.com", "04234").await;
    assert_eq!(user["email"], "walt@breakingbad.com");
    assert_eq!(user["is_chirpy_red"], false);
    assert!(user.get("hashed_password").is_none());
    assert!(user.get("password").is_none());

    let session = login(&app, "walt@breakingbad.com", "04234").await;
    assert_eq!(session["id"], user["id"]);
    assert!(session["token"].as_str().unwrap().split('.').count() == 3);
    assert_eq!(session["refresh_token"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_duplicate_user_conflicts() {
    let (app, _, _) = test_app(test_settings());
    create_user(&app, "walt@breakingbad.com", "04234").await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        None,
        Some(json!({ "email": "walt@breakingbad.com", "password": "other" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_bad_login_is_generic_401() {
    let (app, _, _) = test_app(test_settings());
    create_user(&app, "walt@breakingbad.com", "04234").await;

    let (wrong_status, wrong) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "email": "walt@breakingbad.com", "password": "nope" })),
    )
    .await;
    let (unknown_status, unknown) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "email": "jesse@breakingbad.com", "password": "04234" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong, unknown);
    assert_eq!(wrong["error"]["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_refresh_and_revoke() {
    let (app, _, _) = test_app(test_settings());
    create_user(&app, "walt@breakingbad.com", "04234").await;
    let session = login(&app, "walt@breakingbad.com", "04234").await;
    let refresh_token = session["refresh_token"].as_str().unwrap();

    let (status, body) = send(&app, "POST", "/api/refresh", Some(&bearer(refresh_token)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    let (status, _) = send(&app, "POST", "/api/revoke", Some(&bearer(refresh_token)), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "POST", "/api/revoke", Some(&bearer(refresh_token)), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "POST", "/api/refresh", Some(&bearer(refresh_token)), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_revoke_unknown_token_is_401() {
    let (app, _, _) = test_app(test_settings());
    let (status, _) = send(&app, "POST", "/api/revoke", Some(&bearer(&"0".repeat(64))), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_authorization_header_shapes() {
    let (app, _, _) = test_app(test_settings());
    let (status, _) = send(&app, "POST", "/api/refresh", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "POST", "/api/refresh", Some("Bearer"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/refresh", Some("bearer garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_access_token_expires() {
    let (app, _, clock) = test_app(test_settings());
    create_user(&app, "walt@breakingbad.com", "04234").await;
    let session = login(&app, "walt@breakingbad.com", "04234").await;
    let token = session["token"].as_str().unwrap().to_string();

    clock.advance(chrono::Duration::hours(1));
    let (status, body) = send(
        &app,
        "POST",
        "/api/chirps",
        Some(&bearer(&token)),
        Some(json!({ "body": "too late" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid or expired token");

    // The refresh token still works and mints a usable access token.
    let refresh_token = session["refresh_token"].as_str().unwrap();
    let (_, body) = send(&app, "POST", "/api/refresh", Some(&bearer(refresh_token)), None).await;
    let fresh = body["token"].as_str().unwrap();
    let (status, _) = send(
        &app,
        "POST",
        "/api/chirps",
        Some(&bearer(fresh)),
        Some(json!({ "body": "just in time" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_update_user() {
    let (app, _, _) = test_app(test_settings());
    create_user(&app, "walt@breakingbad.com", "04234").await;
    let session = login(&app, "walt@breakingbad.com", "04234").await;
    let token = session["token"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        "/api/users",
        Some(&bearer(token)),
        Some(json!({ "email": "heisenberg@breakingbad.com", "password": "losPollos" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "heisenberg@breakingbad.com");

    login(&app, "heisenberg@breakingbad.com", "losPollos").await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "email": "walt@breakingbad.com", "password": "04234" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_chirp_lifecycle() {
    let (app, _, _) = test_app(test_settings());
    let walt = create_user(&app, "walt@breakingbad.com", "04234").await;
    create_user(&app, "jesse@breakingbad.com", "yo").await;
    let walt_token = login(&app, "walt@breakingbad.com", "04234").await["token"]
        .as_str()
        .unwrap()
        .to_string();
    let jesse_token = login(&app, "jesse@breakingbad.com", "yo").await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, first) = send(
        &app,
        "POST",
        "/api/chirps",
        Some(&bearer(&walt_token)),
        Some(json!({ "body": "I am the one who kerfuffle knocks" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["body"], "I am the one who **** knocks");
    assert_eq!(first["user_id"], walt["id"]);

    let (status, _) = send(
        &app,
        "POST",
        "/api/chirps",
        Some(&bearer(&jesse_token)),
        Some(json!({ "body": "Yeah science!" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/chirps",
        Some(&bearer(&walt_token)),
        Some(json!({ "body": "x".repeat(141) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, all) = send(&app, "GET", "/api/chirps?sort=desc", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let uri = format!("/api/chirps?author_id={}", walt["id"].as_str().unwrap());
    let (_, mine) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "GET", "/api/chirps?author_id=nope", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let chirp_uri = format!("/api/chirps/{}", first["id"].as_str().unwrap());
    let (status, fetched) = send(&app, "GET", &chirp_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, first);

    let (status, _) = send(&app, "DELETE", &chirp_uri, Some(&bearer(&jesse_token)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "DELETE", &chirp_uri, Some(&bearer(&walt_token)), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &chirp_uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/chirps/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chirps_sorted_by_creation() {
    let (app, _, _) = test_app(test_settings());
    create_user(&app, "walt@breakingbad.com", "04234").await;
    let token = login(&app, "walt@breakingbad.com", "04234").await["token"]
        .as_str()
        .unwrap()
        .to_string();

    for body in ["one", "two", "three"] {
        // Storage timestamps use the wall clock; keep them apart.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let (status, _) = send(
            &app,
            "POST",
            "/api/chirps",
            Some(&bearer(&token)),
            Some(json!({ "body": body })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let bodies = |v: &Value| -> Vec<String> {
        v.as_array()
            .unwrap()
            .iter()
            .map(|c| c["body"].as_str().unwrap().to_string())
            .collect()
    };
    let (_, asc) = send(&app, "GET", "/api/chirps", None, None).await;
    assert_eq!(bodies(&asc), ["one", "two", "three"]);
    let (_, desc) = send(&app, "GET", "/api/chirps?sort=desc", None, None).await;
    assert_eq!(bodies(&desc), ["three", "two", "one"]);
    let (_, lenient) = send(&app, "GET", "/api/chirps?sort=sideways", None, None).await;
    assert_eq!(bodies(&lenient), ["one", "two", "three"]);
}

#[tokio::test]
async fn test_polka_webhook() {
    let (app, _, _) = test_app(test_settings());
    let user = create_user(&app, "walt@breakingbad.com", "04234").await;
    let upgrade = json!({ "event": "user.upgraded", "data": { "user_id": user["id"] } });
    let api_key = format!("ApiKey {POLKA_KEY}");

    let (status, _) = send(&app, "POST", "/api/polka/webhooks", None, Some(upgrade.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(
        &app,
        "POST",
        "/api/polka/webhooks",
        Some("ApiKey wrong"),
        Some(upgrade.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let ignored = json!({ "event": "user.payment_failed", "data": { "user_id": user["id"] } });
    let (status, _) = send(&app, "POST", "/api/polka/webhooks", Some(&api_key), Some(ignored)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let session = login(&app, "walt@breakingbad.com", "04234").await;
    assert_eq!(session["is_chirpy_red"], false);

    let (status, _) = send(&app, "POST", "/api/polka/webhooks", Some(&api_key), Some(upgrade)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let session = login(&app, "walt@breakingbad.com", "04234").await;
    assert_eq!(session["is_chirpy_red"], true);

    let stranger = json!({ "event": "user.upgraded", "data": { "user_id": Uuid::new_v4() } });
    let (status, _) = send(&app, "POST", "/api/polka/webhooks", Some(&api_key), Some(stranger)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_reset_only_in_dev() {
    let mut settings = test_settings();
    settings.platform = Platform::Prod;
    let (app, _, _) = test_app(settings);
    let (status, _) = send(&app, "POST", "/admin/reset", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (app, state, _) = test_app(test_settings());
    create_user(&app, "walt@breakingbad.com", "04234").await;
    state.hits.store(7, std::sync::atomic::Ordering::Relaxed);

    let (status, _) = send(&app, "POST", "/admin/reset", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state.hits.load(std::sync::atomic::Ordering::Relaxed), 0);

    let (status, _) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "email": "walt@breakingbad.com", "password": "04234" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_file_server_counts_hits() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Chirpy</h1>").unwrap();
    let mut settings = test_settings();
    settings.static_dir = dir.path().to_path_buf();
    let (app, state, _) = test_app(settings);

    let (status, _) = send(&app, "GET", "/app/index.html", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/app/missing.png", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(state.hits.load(std::sync::atomic::Ordering::Relaxed), 2);

    let (status, _) = send(&app, "GET", "/admin/metrics", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
