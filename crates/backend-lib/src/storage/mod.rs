// ============================
// crates/backend-lib/src/storage/mod.rs
// ============================
//! Storage abstraction with in-memory and flat-file implementations.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Chirp, Credential, RefreshTokenRecord, User};

mod flat_file;
mod memory;
mod tables;

pub use flat_file::FlatFileStorage;
pub use memory::MemoryStorage;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("refresh token already exists")]
    DuplicateToken,

    #[error("email already registered")]
    DuplicateEmail,

    #[error("record not found")]
    NotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Users and their credentials
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DuplicateEmail` if the email is taken.
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StorageError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    async fn find_credential_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Credential>, StorageError> {
        Ok(self
            .find_user_by_email(email)
            .await?
            .map(|user| user.credential()))
    }

    /// Replace email and password hash. `NotFound` for an unknown id,
    /// `DuplicateEmail` if another user holds the new email.
    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, StorageError>;

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<User, StorageError>;
}

/// Refresh tokens, keyed by token value
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Fails with `DuplicateToken` rather than overwrite an existing row.
    async fn insert_refresh_token(&self, record: RefreshTokenRecord) -> Result<(), StorageError>;

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StorageError>;

    /// Set `revoked_at` unless already set; returns the stored record.
    /// `NotFound` for an unknown token.
    async fn mark_refresh_token_revoked(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, StorageError>;
}

#[async_trait]
pub trait ChirpRepository: Send + Sync {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, StorageError>;

    /// In insertion order, optionally restricted to one author.
    async fn list_chirps(&self, author_id: Option<Uuid>) -> Result<Vec<Chirp>, StorageError>;

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, StorageError>;

    async fn delete_chirp(&self, id: Uuid) -> Result<(), StorageError>;
}

/// Everything the service persists
#[async_trait]
pub trait Storage:
    UserRepository + RefreshTokenRepository + ChirpRepository + Clone + 'static
{
    /// Drop every user, chirp and refresh token.
    async fn reset(&self) -> Result<(), StorageError>;
}
