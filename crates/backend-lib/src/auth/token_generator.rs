// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
/** Secure random token generation for refresh tokens.
Tokens are drawn from the OS entropy source and hex-encoded. */
use rand::{rngs::OsRng, TryRngCore};

use super::AuthError;

/// Refresh token size in bytes (32 bytes = 256 bits of entropy)
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Length of an encoded refresh token
pub const REFRESH_TOKEN_HEX_LEN: usize = REFRESH_TOKEN_BYTES * 2;

/** Generate a refresh token.
# Returns
64 lower-case hex characters, or `GenerationFailure` if the OS entropy
source fails */
pub fn generate_refresh_token() -> Result<String, AuthError> {
    generate_secure_token_with_size(REFRESH_TOKEN_BYTES)
}

/** Generate a hex-encoded random token of `bytes` bytes.
# Arguments
* `bytes` - The size of the random token in bytes */
pub fn generate_secure_token_with_size(bytes: usize) -> Result<String, AuthError> {
    let mut buffer = vec![0u8; bytes];
    OsRng
        .try_fill_bytes(&mut buffer)
        .map_err(|e| AuthError::GenerationFailure(e.to_string()))?;
    Ok(hex::encode(buffer))
}

/// True when `token` has the shape of a generated refresh token.
pub fn is_well_formed(token: &str) -> bool {
    token.len() == REFRESH_TOKEN_HEX_LEN && token.bytes().all(|b| b.is_ascii_hexdigit())
}
