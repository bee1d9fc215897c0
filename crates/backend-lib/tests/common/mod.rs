//! Shared setup for the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chirpy_backend_lib::{
    auth::{ManualClock, SigningSecret},
    config::{Platform, Settings},
    router,
    storage::MemoryStorage,
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

/// Dev settings with test secrets and a cheap password hash.
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.platform = Platform::Dev;
    settings.auth.jwt_secret = SigningSecret::new("integration-test-secret");
    settings.auth.polka_key = SigningSecret::new(POLKA_KEY);
    settings.auth.password_cost = 4;
    settings
}

/// The full router over in-memory storage, plus the state and clock behind it.
pub fn test_app(
    settings: Settings,
) -> (Router, Arc<AppState<MemoryStorage>>, ManualClock) {
    let clock = ManualClock::default();
    let state = Arc::new(
        AppState::with_clock(MemoryStorage::new(), settings, Arc::new(clock.clone())).unwrap(),
    );
    (router::create_router(state.clone()), state, clock)
}

/// Send one request and return the status and the body parsed as JSON
/// (`Value::Null` for an empty or non-JSON body).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
