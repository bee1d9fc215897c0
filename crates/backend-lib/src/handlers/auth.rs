// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Login, refresh and revoke endpoints.
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chirpy_common::{Credentials, LoginResponse, RefreshResponse};

use super::extract::BearerToken;
use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

/// `POST /api/login`
pub async fn login<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<LoginResponse>, AppError> {
    let grant = state
        .sessions
        .login(&credentials.email, &credentials.password)
        .await?;

    Ok(Json(LoginResponse {
        user: (&grant.user).into(),
        token: grant.access_token,
        refresh_token: grant.refresh_token,
    }))
}

/// `POST /api/refresh` with the refresh token as bearer
pub async fn refresh<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    BearerToken(token): BearerToken,
) -> Result<Json<RefreshResponse>, AppError> {
    let token = state.sessions.refresh(&token).await?;
    Ok(Json(RefreshResponse { token }))
}

/// `POST /api/revoke` with the refresh token as bearer
pub async fn revoke<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode, AppError> {
    state.sessions.revoke(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}
