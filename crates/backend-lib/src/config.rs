// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Layering, lowest to highest: built-in defaults, a TOML file, then
//! `CHIRPY_`-prefixed environment variables (`__` separates nested keys,
//! e.g. `CHIRPY_AUTH__JWT_SECRET`).
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::auth::{PasswordHasher, SessionConfig, SigningSecret, DEFAULT_COST};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
/// Longest token lifetime accepted (ten years)
pub const MAX_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 365 * 10;

/// Application settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    /// `dev` enables the admin reset endpoint
    pub platform: Platform,
    pub auth: AuthSettings,
    pub storage: StorageSettings,
    /// Directory served under `/app`
    pub static_dir: PathBuf,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Dev,
    #[default]
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HMAC key for access tokens
    pub jwt_secret: SigningSecret,
    /// Key the payment provider sends with webhooks
    pub polka_key: SigningSecret,
    pub access_token_ttl_secs: u64,
    pub refresh_token_ttl_secs: u64,
    /// scrypt `log_n`
    pub password_cost: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Where the file backend keeps `chirpy.json`
    pub data_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            platform: Platform::default(),
            auth: AuthSettings::default(),
            storage: StorageSettings::default(),
            static_dir: PathBuf::from("static"),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: SigningSecret::default(),
            polka_key: SigningSecret::default(),
            access_token_ttl_secs: 60 * 60,
            refresh_token_ttl_secs: 60 * 60 * 24 * 60,
            password_cost: DEFAULT_COST,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Settings {
    /// Load from `config/default.toml` and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load from a specific TOML file and the environment. A missing file is
    /// not an error; the defaults and environment still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("CHIRPY_").split("__"))
            .extract()
            .with_context(|| format!("failed to load config from {}", path.as_ref().display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            bail!("auth.jwt_secret must be set");
        }
        if self.auth.polka_key.is_empty() {
            bail!("auth.polka_key must be set");
        }
        if self.auth.access_token_ttl_secs == 0 || self.auth.refresh_token_ttl_secs == 0 {
            bail!("token ttls must be greater than zero");
        }
        if self.auth.access_token_ttl_secs > MAX_TOKEN_TTL_SECS
            || self.auth.refresh_token_ttl_secs > MAX_TOKEN_TTL_SECS
        {
            bail!("token ttls must not exceed {MAX_TOKEN_TTL_SECS} seconds");
        }
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!("invalid log level: {}", self.log_level);
        }
        if PasswordHasher::new(self.auth.password_cost).is_err() {
            bail!("invalid password cost: {}", self.auth.password_cost);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.server.host, self.server.port))
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            secret: self.auth.jwt_secret.clone(),
            access_token_ttl: Duration::from_secs(self.auth.access_token_ttl_secs),
            refresh_token_ttl: Duration::from_secs(self.auth.refresh_token_ttl_secs),
        }
    }

    pub fn password_hasher(&self) -> Result<PasswordHasher> {
        PasswordHasher::new(self.auth.password_cost)
            .with_context(|| format!("invalid password cost: {}", self.auth.password_cost))
    }
}
