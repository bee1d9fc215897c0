// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers.

pub mod admin;
pub mod auth;
pub mod chirps;
pub mod extract;
pub mod users;
pub mod webhooks;

/// `GET /api/healthz`
pub async fn healthz() -> &'static str {
    "OK"
}
