// ============================
// crates/backend-lib/src/handlers/users.rs
// ============================
//! Account creation and update.
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chirpy_common::{Credentials, UserResponse};
use metrics::counter;

use super::extract::AuthUser;
use crate::error::AppError;
use crate::metrics::USER_CREATED;
use crate::storage::Storage;
use crate::AppState;

fn validate_credentials(credentials: &Credentials) -> Result<(), AppError> {
    let email = credentials.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::InvalidInput("email must be a valid address".into()));
    }
    if credentials.password.is_empty() {
        return Err(AppError::InvalidInput("password must not be empty".into()));
    }
    Ok(())
}

/// `POST /api/users`
pub async fn create_user<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    validate_credentials(&credentials)?;
    let hash = state.sessions.hash_password(&credentials.password).await?;
    let user = state
        .storage
        .create_user(credentials.email.trim(), &hash)
        .await?;

    counter!(USER_CREATED).increment(1);
    tracing::info!(user_id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json((&user).into())))
}

/// `PUT /api/users`: replace the caller's email and password
pub async fn update_user<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    AuthUser(user_id): AuthUser,
    Json(credentials): Json<Credentials>,
) -> Result<Json<UserResponse>, AppError> {
    validate_credentials(&credentials)?;
    let hash = state.sessions.hash_password(&credentials.password).await?;
    let user = state
        .storage
        .update_user(user_id, credentials.email.trim(), &hash)
        .await?;

    tracing::info!(user_id = %user.id, "user updated");
    Ok(Json((&user).into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials(&credentials("walt@breakingbad.com", "04234")).is_ok());
        assert!(validate_credentials(&credentials("", "04234")).is_err());
        assert!(validate_credentials(&credentials("not-an-email", "04234")).is_err());
        assert!(validate_credentials(&credentials("walt@breakingbad.com", "")).is_err());
    }
}
