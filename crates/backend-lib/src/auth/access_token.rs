// ============================
// crates/backend-lib/src/auth/access_token.rs
// ============================
//! Stateless access tokens: HS256-signed JWTs carrying issuer, subject,
//! issued-at and expiry.
//!
//! Access tokens cannot be revoked. Their exposure is bounded by a short
//! ttl and by revoking the paired refresh token.
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use super::{AuthError, Clock, SigningSecret};

type HmacSha256 = Hmac<Sha256>;

/// `iss` claim of every token this service issues
pub const ISSUER: &str = "chirpy";

const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessTokenHeader {
    pub alg: String,
    pub typ: String,
}

impl AccessTokenHeader {
    fn hs256() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: TOKEN_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessTokenClaims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, AuthError> {
    let json =
        serde_json::to_vec(value).map_err(|e| AuthError::GenerationFailure(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn b64d_json<T: DeserializeOwned>(segment: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| AuthError::TokenMalformed)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::TokenMalformed)
}

fn mac_for(secret: &SigningSecret, signing_input: &str) -> Result<HmacSha256, AuthError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AuthError::GenerationFailure(e.to_string()))?;
    mac.update(signing_input.as_bytes());
    Ok(mac)
}

/// Whole seconds covered by `ttl`, rounding any fraction up so a non-zero
/// ttl never collapses to an already-expired token.
fn ttl_seconds(ttl: Duration) -> i64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    i64::try_from(secs).unwrap_or(i64::MAX)
}

/// Sign `claims` into a compact HS256 token.
///
/// # Errors
///
/// Returns `GenerationFailure` if the claims cannot be encoded or the MAC
/// cannot be keyed.
pub fn sign_hs256(claims: &AccessTokenClaims, secret: &SigningSecret) -> Result<String, AuthError> {
    let header_b64 = b64e_json(&AccessTokenHeader::hs256())?;
    let claims_b64 = b64e_json(claims)?;
    let signing_input = format!("{header_b64}.{claims_b64}");

    let signature = mac_for(secret, &signing_input)?.finalize().into_bytes();
    let signature_b64 = URL_SAFE_NO_PAD.encode(signature);

    Ok(format!("{signing_input}.{signature_b64}"))
}

/// Verify a compact HS256 token and return its claims.
///
/// Structure is checked before the signature; the signature before any
/// claim is trusted.
///
/// # Errors
///
/// - `TokenMalformed`: not three base64url segments, undecodable JSON, an
///   algorithm other than HS256, a foreign issuer
/// - `TokenBadSignature`: MAC mismatch (wrong secret or tampered token)
/// - `TokenExpired`: `now_unix_seconds >= exp`
pub fn verify_hs256(
    token: &str,
    secret: &SigningSecret,
    now_unix_seconds: i64,
) -> Result<AccessTokenClaims, AuthError> {
    let mut parts = token.split('.');
    let header_b64 = parts.next().ok_or(AuthError::TokenMalformed)?;
    let claims_b64 = parts.next().ok_or(AuthError::TokenMalformed)?;
    let sig_b64 = parts.next().ok_or(AuthError::TokenMalformed)?;
    if parts.next().is_some() {
        return Err(AuthError::TokenMalformed);
    }

    let header: AccessTokenHeader = b64d_json(header_b64)?;
    if header.alg != ALGORITHM {
        return Err(AuthError::TokenMalformed);
    }
    let claims: AccessTokenClaims = b64d_json(claims_b64)?;
    let signature = URL_SAFE_NO_PAD
        .decode(sig_b64)
        .map_err(|_| AuthError::TokenMalformed)?;

    let signing_input = format!("{header_b64}.{claims_b64}");
    mac_for(secret, &signing_input)?
        .verify_slice(&signature)
        .map_err(|_| AuthError::TokenBadSignature)?;

    if claims.iss != ISSUER {
        return Err(AuthError::TokenMalformed);
    }
    if now_unix_seconds >= claims.exp {
        return Err(AuthError::TokenExpired);
    }

    Ok(claims)
}

/// Issues and validates access tokens against the injected clock.
#[derive(Clone)]
pub struct AccessTokenCodec {
    clock: Arc<dyn Clock>,
}

impl AccessTokenCodec {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Issue a token for `user_id` valid for `ttl` from now. A zero ttl
    /// yields a token that is already expired.
    pub fn issue(
        &self,
        user_id: Uuid,
        secret: &SigningSecret,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let iat = self.clock.now().timestamp();
        let claims = AccessTokenClaims {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat,
            exp: iat.saturating_add(ttl_seconds(ttl)),
        };
        sign_hs256(&claims, secret)
    }

    /// Validate a token and return the user it was issued to.
    pub fn validate(&self, token: &str, secret: &SigningSecret) -> Result<Uuid, AuthError> {
        let claims = verify_hs256(token, secret, self.clock.now().timestamp())?;
        Uuid::parse_str(&claims.sub).map_err(|_| AuthError::TokenMalformed)
    }
}
