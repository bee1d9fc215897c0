// ================
// common/src/lib.rs
// ================
//! Request and response bodies exchanged between Chirpy clients and the
//! HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /api/users`, `PUT /api/users` and `POST /api/login`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// A user as rendered to clients. Never carries the password hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

/// Successful login: the user plus both tokens
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    /// Short-lived signed access token
    pub token: String,
    /// Long-lived opaque refresh token
    pub refresh_token: String,
}

/// Successful refresh: a new access token only
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RefreshResponse {
    pub token: String,
}

/// Body of `POST /api/chirps`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateChirpRequest {
    pub body: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChirpResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

/// Sort direction accepted by `GET /api/chirps`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Anything other than `desc` sorts ascending.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

/// Query string of `GET /api/chirps`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ListChirpsQuery {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

/// Event name that upgrades a user to Chirpy Red
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

/// Payment provider webhook body
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WebhookEvent {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WebhookData {
    pub user_id: String,
}
