//! In-memory storage. Each operation takes the table lock once, so a
//! read-modify-write is atomic.
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::tables::Tables;
use super::{ChirpRepository, RefreshTokenRepository, Storage, StorageError, UserRepository};
use crate::models::{Chirp, RefreshTokenRecord, User};

#[derive(Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStorage {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StorageError> {
        self.tables
            .write()
            .await
            .create_user(email, hashed_password, Utc::now())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        Ok(self.tables.read().await.get_user(id))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        Ok(self.tables.read().await.find_user_by_email(email))
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, StorageError> {
        self.tables
            .write()
            .await
            .update_user(id, email, hashed_password, Utc::now())
    }

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<User, StorageError> {
        self.tables
            .write()
            .await
            .upgrade_to_chirpy_red(id, Utc::now())
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryStorage {
    async fn insert_refresh_token(&self, record: RefreshTokenRecord) -> Result<(), StorageError> {
        self.tables.write().await.insert_refresh_token(record)
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StorageError> {
        Ok(self.tables.read().await.find_refresh_token(token))
    }

    async fn mark_refresh_token_revoked(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, StorageError> {
        self.tables
            .write()
            .await
            .mark_refresh_token_revoked(token, revoked_at)
    }
}

#[async_trait]
impl ChirpRepository for MemoryStorage {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, StorageError> {
        Ok(self
            .tables
            .write()
            .await
            .create_chirp(user_id, body, Utc::now()))
    }

    async fn list_chirps(&self, author_id: Option<Uuid>) -> Result<Vec<Chirp>, StorageError> {
        Ok(self.tables.read().await.list_chirps(author_id))
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, StorageError> {
        Ok(self.tables.read().await.get_chirp(id))
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<(), StorageError> {
        self.tables.write().await.delete_chirp(id)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn reset(&self) -> Result<(), StorageError> {
        self.tables.write().await.clear();
        Ok(())
    }
}
