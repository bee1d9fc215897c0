//! The tables shared by every storage backend.
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StorageError;
use crate::models::{Chirp, RefreshTokenRecord, User};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Tables {
    users: HashMap<Uuid, User>,
    chirps: Vec<Chirp>,
    refresh_tokens: HashMap<String, RefreshTokenRecord>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    pub fn create_user(
        &mut self,
        email: &str,
        hashed_password: &str,
        now: DateTime<Utc>,
    ) -> Result<User, StorageError> {
        if self.email_taken(email, None) {
            return Err(StorageError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn get_user(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).cloned()
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.users.values().find(|u| u.email == email).cloned()
    }

    pub fn update_user(
        &mut self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
        now: DateTime<Utc>,
    ) -> Result<User, StorageError> {
        if self.email_taken(email, Some(id)) {
            return Err(StorageError::DuplicateEmail);
        }
        let user = self.users.get_mut(&id).ok_or(StorageError::NotFound)?;
        user.email = email.to_string();
        user.hashed_password = hashed_password.to_string();
        user.updated_at = now;
        Ok(user.clone())
    }

    pub fn upgrade_to_chirpy_red(
        &mut self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<User, StorageError> {
        let user = self.users.get_mut(&id).ok_or(StorageError::NotFound)?;
        user.is_chirpy_red = true;
        user.updated_at = now;
        Ok(user.clone())
    }

    pub fn insert_refresh_token(&mut self, record: RefreshTokenRecord) -> Result<(), StorageError> {
        if self.refresh_tokens.contains_key(&record.token) {
            return Err(StorageError::DuplicateToken);
        }
        self.refresh_tokens.insert(record.token.clone(), record);
        Ok(())
    }

    pub fn find_refresh_token(&self, token: &str) -> Option<RefreshTokenRecord> {
        self.refresh_tokens.get(token).cloned()
    }

    pub fn mark_refresh_token_revoked(
        &mut self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, StorageError> {
        let record = self
            .refresh_tokens
            .get_mut(token)
            .ok_or(StorageError::NotFound)?;
        if record.revoked_at.is_none() {
            record.revoked_at = Some(revoked_at);
            record.updated_at = revoked_at;
        }
        Ok(record.clone())
    }

    pub fn create_chirp(&mut self, user_id: Uuid, body: &str, now: DateTime<Utc>) -> Chirp {
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        self.chirps.push(chirp.clone());
        chirp
    }

    pub fn list_chirps(&self, author_id: Option<Uuid>) -> Vec<Chirp> {
        self.chirps
            .iter()
            .filter(|c| author_id.map_or(true, |author| c.user_id == author))
            .cloned()
            .collect()
    }

    pub fn get_chirp(&self, id: Uuid) -> Option<Chirp> {
        self.chirps.iter().find(|c| c.id == id).cloned()
    }

    pub fn delete_chirp(&mut self, id: Uuid) -> Result<(), StorageError> {
        let index = self
            .chirps
            .iter()
            .position(|c| c.id == id)
            .ok_or(StorageError::NotFound)?;
        self.chirps.remove(index);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.users.clear();
        self.chirps.clear();
        self.refresh_tokens.clear();
    }
}
