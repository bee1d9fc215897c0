// ============================
// crates/backend-lib/src/handlers/webhooks.rs
// ============================
//! Payment provider ("Polka") webhooks.
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chirpy_common::{WebhookEvent, USER_UPGRADED_EVENT};
use metrics::counter;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::extract::ApiKey;
use crate::error::AppError;
use crate::metrics::USER_UPGRADED;
use crate::storage::Storage;
use crate::AppState;

/// Compare fixed-length digests so the comparison time does not depend on
/// how much of the presented key is right.
fn keys_match(presented: &str, expected: &[u8]) -> bool {
    Sha256::digest(presented.as_bytes()) == Sha256::digest(expected)
}

/// `POST /api/polka/webhooks`
pub async fn polka_webhook<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    ApiKey(key): ApiKey,
    Json(event): Json<WebhookEvent>,
) -> Result<StatusCode, AppError> {
    if !keys_match(&key, state.settings.auth.polka_key.as_bytes()) {
        return Err(AppError::InvalidApiKey);
    }

    if event.event != USER_UPGRADED_EVENT {
        tracing::debug!(event = %event.event, "ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = Uuid::parse_str(&event.data.user_id)
        .map_err(|_| AppError::InvalidInput("invalid user_id".into()))?;
    state.storage.upgrade_to_chirpy_red(user_id).await?;

    counter!(USER_UPGRADED).increment(1);
    tracing::info!(%user_id, "user upgraded to Chirpy Red");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_match() {
        assert!(keys_match("f271c81ff7084ee5b99a5091b42d486e", b"f271c81ff7084ee5b99a5091b42d486e"));
        assert!(!keys_match("f271c81ff7084ee5b99a5091b42d486", b"f271c81ff7084ee5b99a5091b42d486e"));
        assert!(!keys_match("", b"f271c81ff7084ee5b99a5091b42d486e"));
    }
}
