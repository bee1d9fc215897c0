// ============================
// crates/backend-lib/src/auth/refresh_token.rs
// ============================
//! Opaque, persisted refresh tokens.
use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use uuid::Uuid;

use super::token_generator::{generate_refresh_token, is_well_formed};
use super::{AuthError, Clock};
use crate::models::RefreshTokenRecord;
use crate::storage::{RefreshTokenRepository, StorageError};

/// Default refresh token lifetime (60 days)
pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 60);

/// Issues, resolves and revokes refresh tokens on top of a repository.
#[derive(Clone)]
pub struct RefreshTokenStore<R> {
    repo: R,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl<R: RefreshTokenRepository> RefreshTokenStore<R> {
    pub fn new(repo: R, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self { repo, clock, ttl }
    }

    /// Mint and persist a new token for `user_id`.
    pub async fn issue(&self, user_id: Uuid) -> Result<String, AuthError> {
        let token = generate_refresh_token()?;
        let now = self.clock.now();
        let expires_at = ChronoDuration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AuthError::GenerationFailure("refresh token expiry overflow".into()))?;

        self.repo
            .insert_refresh_token(RefreshTokenRecord {
                token: token.clone(),
                user_id,
                created_at: now,
                updated_at: now,
                expires_at,
                revoked_at: None,
            })
            .await?;

        tracing::debug!(%user_id, %expires_at, "refresh token issued");
        Ok(token)
    }

    /// The user a live token belongs to.
    ///
    /// A revoked token reports `TokenRevoked` even once it is also past its
    /// expiry.
    pub async fn resolve(&self, token: &str) -> Result<Uuid, AuthError> {
        if !is_well_formed(token) {
            return Err(AuthError::TokenNotFound);
        }
        let record = self
            .repo
            .find_refresh_token(token)
            .await?
            .ok_or(AuthError::TokenNotFound)?;

        if record.is_revoked() {
            return Err(AuthError::TokenRevoked);
        }
        if record.is_expired_at(self.clock.now()) {
            return Err(AuthError::TokenExpired);
        }
        Ok(record.user_id)
    }

    /// Revoke a token. Revoking an already revoked token succeeds and keeps
    /// the original revocation time.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        if !is_well_formed(token) {
            return Err(AuthError::TokenNotFound);
        }
        match self
            .repo
            .mark_refresh_token_revoked(token, self.clock.now())
            .await
        {
            Ok(record) => {
                tracing::debug!(user_id = %record.user_id, "refresh token revoked");
                Ok(())
            },
            Err(StorageError::NotFound) => Err(AuthError::TokenNotFound),
            Err(e) => Err(e.into()),
        }
    }
}
