// ============================
// crates/backend-lib/src/auth/error.rs
// ============================
//! Error taxonomy of the session/credential subsystem.
use thiserror::Error;

use crate::storage::StorageError;

/// Everything that can go wrong while hashing, signing, issuing or
/// resolving credentials.
///
/// The token variants stay distinct here so they can be logged and counted;
/// the HTTP boundary collapses them into a single "invalid or expired token".
#[derive(Error, Debug)]
pub enum AuthError {
    /// Wrong email or password
    #[error("invalid email or password")]
    CredentialInvalid,

    #[error("token is malformed")]
    TokenMalformed,

    #[error("token signature does not match")]
    TokenBadSignature,

    #[error("token has expired")]
    TokenExpired,

    #[error("token has been revoked")]
    TokenRevoked,

    #[error("token not found")]
    TokenNotFound,

    #[error("password exceeds {max} bytes")]
    PasswordTooLong { max: usize },

    #[error("password hashing failed: {0}")]
    HashingFailure(String),

    /// Entropy source or signing primitive failure
    #[error("token generation failed: {0}")]
    GenerationFailure(String),

    #[error("persistence failure: {0}")]
    Persistence(#[from] StorageError),
}

impl AuthError {
    /// True for the token outcomes a client can cause by presenting a bad,
    /// stale or revoked token.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::TokenMalformed
                | AuthError::TokenBadSignature
                | AuthError::TokenExpired
                | AuthError::TokenRevoked
                | AuthError::TokenNotFound
        )
    }

    /// Short stable label used as a log field and metric tag.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::CredentialInvalid => "credential_invalid",
            AuthError::TokenMalformed => "token_malformed",
            AuthError::TokenBadSignature => "token_bad_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenRevoked => "token_revoked",
            AuthError::TokenNotFound => "token_not_found",
            AuthError::PasswordTooLong { .. } => "password_too_long",
            AuthError::HashingFailure(_) => "hashing_failure",
            AuthError::GenerationFailure(_) => "generation_failure",
            AuthError::Persistence(_) => "persistence_failure",
        }
    }
}
