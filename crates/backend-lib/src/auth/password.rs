// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Params, Scrypt,
};

use super::AuthError;

/// Longest password accepted, in bytes. scrypt itself has no limit; this
/// bounds the work an unauthenticated request can ask for.
pub const MAX_PASSWORD_BYTES: usize = 1024;

/// Default scrypt cost (`log2(N)`)
pub const DEFAULT_COST: u8 = 17;

const BLOCK_SIZE: u32 = 8;
const PARALLELISM: u32 = 1;
const OUTPUT_LEN: usize = 32;

/// Salted one-way password hashing with scrypt.
///
/// Hashes are PHC strings (`$scrypt$ln=..,r=..,p=..$<salt>$<hash>`) so the
/// salt and cost travel with the hash and verification needs nothing else.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Build a hasher with the given scrypt cost (`log2(N)`).
    pub fn new(cost: u8) -> Result<Self, AuthError> {
        let params = Params::new(cost, BLOCK_SIZE, PARALLELISM, OUTPUT_LEN)
            .map_err(|e| AuthError::HashingFailure(format!("invalid scrypt cost {cost}: {e}")))?;
        Ok(Self { params })
    }

    /// Hash a password with a fresh random salt.
    pub fn hash(&self, plain: &str) -> Result<String, AuthError> {
        if plain.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::PasswordTooLong {
                max: MAX_PASSWORD_BYTES,
            });
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params.clone(), &salt)
            .map_err(|e| AuthError::HashingFailure(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Check a password against a stored hash. A malformed hash never
    /// matches. The digest comparison is constant-time.
    pub fn verify(&self, plain: &str, hash: &str) -> bool {
        if plain.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::recommended(),
        }
    }
}
