// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Login, refresh and revoke.
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::{
    AccessTokenCodec, AuthError, Clock, PasswordHasher, RefreshTokenStore, SigningSecret,
    REFRESH_TOKEN_TTL,
};
use crate::metrics::{LOGIN_REJECTED, LOGIN_SUCCESS, REFRESH_REJECTED, REFRESH_SUCCESS, REVOKE};
use crate::models::User;
use crate::storage::{Storage, StorageError, UserRepository};

/// Hashed once and verified against when an email is unknown, so a miss
/// costs the same scrypt work as a wrong password.
const DUMMY_PASSWORD: &str = "chirpy-dummy-password";

/// Access token lifetime (1 hour)
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Secret and lifetimes the session service runs with
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: SigningSecret,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl SessionConfig {
    pub fn new(secret: SigningSecret) -> Self {
        Self {
            secret,
            access_token_ttl: ACCESS_TOKEN_TTL,
            refresh_token_ttl: REFRESH_TOKEN_TTL,
        }
    }
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Ties password checks, access tokens and refresh tokens together.
///
/// Refresh only mints a new access token; the refresh token itself is
/// reused until it expires or is revoked.
#[derive(Clone)]
pub struct SessionService<S> {
    storage: S,
    hasher: PasswordHasher,
    codec: AccessTokenCodec,
    refresh_tokens: RefreshTokenStore<S>,
    secret: SigningSecret,
    access_token_ttl: Duration,
    dummy_hash: Arc<OnceCell<String>>,
}

impl<S: Storage> SessionService<S> {
    pub fn new(
        storage: S,
        hasher: PasswordHasher,
        config: &SessionConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            refresh_tokens: RefreshTokenStore::new(
                storage.clone(),
                clock.clone(),
                config.refresh_token_ttl,
            ),
            codec: AccessTokenCodec::new(clock),
            storage,
            hasher,
            secret: config.secret.clone(),
            access_token_ttl: config.access_token_ttl,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Check `email`/`password` and hand out a fresh token pair.
    ///
    /// Unknown email and wrong password are the same `CredentialInvalid`.
    /// Failures after the password matched are never `CredentialInvalid`.
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, AuthError> {
        let Some(credential) = self.storage.find_credential_by_email(email).await? else {
            let dummy = self.dummy_hash().await?;
            self.verify_password(password, dummy).await?;
            counter!(LOGIN_REJECTED).increment(1);
            tracing::info!("login rejected: unknown email");
            return Err(AuthError::CredentialInvalid);
        };

        if !self.verify_password(password, credential.password_hash).await? {
            counter!(LOGIN_REJECTED).increment(1);
            tracing::info!(user_id = %credential.identity_id, "login rejected: wrong password");
            return Err(AuthError::CredentialInvalid);
        }

        let user = self
            .storage
            .get_user(credential.identity_id)
            .await?
            .ok_or(AuthError::Persistence(StorageError::NotFound))?;

        let access_token = self.issue_access_token(user.id)?;
        let refresh_token = self.refresh_tokens.issue(user.id).await?;

        counter!(LOGIN_SUCCESS).increment(1);
        tracing::info!(user_id = %user.id, "login succeeded");
        Ok(LoginGrant {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Exchange a refresh token for a new access token.
    #[tracing::instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let user_id = match self.refresh_tokens.resolve(refresh_token).await {
            Ok(user_id) => user_id,
            Err(e) => {
                if e.is_token_rejection() {
                    counter!(REFRESH_REJECTED, "reason" => e.kind()).increment(1);
                    tracing::info!(reason = e.kind(), "refresh rejected");
                }
                return Err(e);
            },
        };

        let access_token = self.issue_access_token(user_id)?;
        counter!(REFRESH_SUCCESS).increment(1);
        Ok(access_token)
    }

    /// Revoke a refresh token. Unknown tokens are `TokenNotFound`; revoking
    /// twice is fine.
    #[tracing::instrument(skip_all)]
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.refresh_tokens.revoke(refresh_token).await?;
        counter!(REVOKE).increment(1);
        Ok(())
    }

    /// The user an access token was issued to.
    pub fn authenticate(&self, access_token: &str) -> Result<Uuid, AuthError> {
        self.codec.validate(access_token, &self.secret)
    }

    /// Hash a password off the async runtime.
    pub async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::HashingFailure(e.to_string()))?
    }

    async fn dummy_hash(&self) -> Result<String, AuthError> {
        self.dummy_hash
            .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD))
            .await
            .cloned()
    }

    async fn verify_password(&self, password: &str, hash: String) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::HashingFailure(e.to_string()))
    }

    fn issue_access_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        self.codec
            .issue(user_id, &self.secret, self.access_token_ttl)
    }
}
