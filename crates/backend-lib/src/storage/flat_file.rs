// ============================
// crates/backend-lib/src/storage/flat_file.rs
// ============================
//! Flat-file storage: the whole database as one JSON snapshot.
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::{fs as tokio_fs, sync::Mutex};
use uuid::Uuid;

use super::tables::Tables;
use super::{ChirpRepository, RefreshTokenRepository, Storage, StorageError, UserRepository};
use crate::models::{Chirp, RefreshTokenRecord, User};

const SNAPSHOT_FILE: &str = "chirpy.json";

/// File-backed implementation of the Storage trait.
///
/// Every mutation is applied to a copy of the tables, written to disk, and
/// only then made visible. The snapshot is replaced with write-then-rename
/// so a crash never leaves a torn file.
#[derive(Clone)]
pub struct FlatFileStorage {
    path: PathBuf,
    tables: Arc<Mutex<Tables>>,
}

impl FlatFileStorage {
    /// Open (or create) the store under `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        let path = root.join(SNAPSHOT_FILE);

        let tables = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Tables::default()
        };

        tracing::debug!(path = %path.display(), "opened flat-file storage");
        Ok(Self {
            path,
            tables: Arc::new(Mutex::new(tables)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, tables: &Tables) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(tables)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn mutate<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut Tables) -> Result<T, StorageError> + Send,
        T: Send,
    {
        let mut tables = self.tables.lock().await;
        let mut next = tables.clone();
        let out = f(&mut next)?;
        self.persist(&next).await?;
        *tables = next;
        Ok(out)
    }
}

#[async_trait]
impl UserRepository for FlatFileStorage {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StorageError> {
        self.mutate(|t| t.create_user(email, hashed_password, Utc::now()))
            .await
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        Ok(self.tables.lock().await.get_user(id))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        Ok(self.tables.lock().await.find_user_by_email(email))
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, StorageError> {
        self.mutate(|t| t.update_user(id, email, hashed_password, Utc::now()))
            .await
    }

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<User, StorageError> {
        self.mutate(|t| t.upgrade_to_chirpy_red(id, Utc::now()))
            .await
    }
}

#[async_trait]
impl RefreshTokenRepository for FlatFileStorage {
    async fn insert_refresh_token(&self, record: RefreshTokenRecord) -> Result<(), StorageError> {
        self.mutate(|t| t.insert_refresh_token(record)).await
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StorageError> {
        Ok(self.tables.lock().await.find_refresh_token(token))
    }

    async fn mark_refresh_token_revoked(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, StorageError> {
        self.mutate(|t| t.mark_refresh_token_revoked(token, revoked_at))
            .await
    }
}

#[async_trait]
impl ChirpRepository for FlatFileStorage {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, StorageError> {
        self.mutate(|t| Ok(t.create_chirp(user_id, body, Utc::now())))
            .await
    }

    async fn list_chirps(&self, author_id: Option<Uuid>) -> Result<Vec<Chirp>, StorageError> {
        Ok(self.tables.lock().await.list_chirps(author_id))
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, StorageError> {
        Ok(self.tables.lock().await.get_chirp(id))
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<(), StorageError> {
        self.mutate(|t| t.delete_chirp(id)).await
    }
}

#[async_trait]
impl Storage for FlatFileStorage {
    async fn reset(&self) -> Result<(), StorageError> {
        self.mutate(|t| {
            t.clear();
            Ok(())
        })
        .await
    }
}
