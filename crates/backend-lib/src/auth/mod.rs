// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Session/credential subsystem: password hashing, access tokens, refresh
//! tokens and the session service that ties them together.

pub mod access_token;
pub mod clock;
pub mod error;
pub mod password;
pub mod refresh_token;
pub mod secret;
pub mod session;
pub mod token_generator;

pub use access_token::{AccessTokenClaims, AccessTokenCodec, ISSUER};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AuthError;
pub use password::{PasswordHasher, DEFAULT_COST, MAX_PASSWORD_BYTES};
pub use refresh_token::{RefreshTokenStore, REFRESH_TOKEN_TTL};
pub use secret::SigningSecret;
pub use session::{LoginGrant, SessionConfig, SessionService, ACCESS_TOKEN_TTL};
