// ============================
// crates/backend-lib/src/handlers/extract.rs
// ============================
//! `Authorization` header extractors.
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

/// Pull the credential out of `Authorization: <scheme> <value>`.
///
/// The scheme matches case-insensitively. A missing header is
/// `MissingAuthHeader`; anything not of that shape, or with a different
/// scheme, is `MalformedAuthHeader`.
pub fn parse_authorization(headers: &HeaderMap, scheme: &str) -> Result<String, AppError> {
    let raw = headers
        .get(AUTHORIZATION)
        .ok_or(AppError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AppError::MalformedAuthHeader)?;

    let (given, value) = raw
        .trim()
        .split_once(' ')
        .ok_or(AppError::MalformedAuthHeader)?;
    let value = value.trim();
    if !given.eq_ignore_ascii_case(scheme) || value.is_empty() {
        return Err(AppError::MalformedAuthHeader);
    }
    Ok(value.to_string())
}

/// `Authorization: Bearer <token>`, unvalidated.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_authorization(&parts.headers, "Bearer").map(Self)
    }
}

/// `Authorization: ApiKey <key>`, unvalidated.
#[derive(Debug, Clone)]
pub struct ApiKey(pub String);

impl<S> FromRequestParts<S> for ApiKey
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_authorization(&parts.headers, "ApiKey").map(Self)
    }
}

/// The user behind a valid bearer access token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

impl<S: Storage> FromRequestParts<Arc<AppState<S>>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        let token = parse_authorization(&parts.headers, "Bearer")?;
        let user_id = state.sessions.authenticate(&token)?;
        Ok(Self(user_id))
    }
}
