// ============================
// chirpy-backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the Chirpy API server.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod router;
pub mod storage;

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use crate::auth::{Clock, SessionService, SystemClock};
use crate::config::Settings;
use crate::storage::Storage;

/// Application state shared across all handlers
pub struct AppState<S> {
    /// Login, refresh, revoke and access-token checks
    pub sessions: SessionService<S>,
    /// Storage backend
    pub storage: S,
    /// Settings the server was started with
    pub settings: Arc<Settings>,
    /// Requests served under `/app`
    pub hits: AtomicU64,
}

impl<S: Storage> AppState<S> {
    /// Create a new application state on the system clock
    pub fn new(storage: S, settings: Settings) -> anyhow::Result<Self> {
        Self::with_clock(storage, settings, Arc::new(SystemClock))
    }

    /// Create a new application state with an explicit clock
    pub fn with_clock(
        storage: S,
        settings: Settings,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        let sessions = SessionService::new(
            storage.clone(),
            settings.password_hasher()?,
            &settings.session_config(),
            clock,
        );

        Ok(Self {
            sessions,
            storage,
            settings: Arc::new(settings),
            hits: AtomicU64::new(0),
        })
    }
}
