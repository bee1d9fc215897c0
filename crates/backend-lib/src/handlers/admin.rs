// ============================
// crates/backend-lib/src/handlers/admin.rs
// ============================
//! Admin pages.
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Html};

use crate::config::Platform;
use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

/// `GET /admin/metrics`
pub async fn metrics<S: Storage>(State(state): State<Arc<AppState<S>>>) -> Html<String> {
    let hits = state.hits.load(Ordering::Relaxed);
    Html(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {hits} times!</p>\n  </body>\n</html>\n"
    ))
}

/// `POST /admin/reset`: wipe every table and the hit counter. Dev only.
pub async fn reset<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<(StatusCode, &'static str), AppError> {
    if state.settings.platform != Platform::Dev {
        return Err(AppError::Forbidden("reset is only allowed in dev".into()));
    }

    state.storage.reset().await?;
    state.hits.store(0, Ordering::Relaxed);
    tracing::warn!("storage reset");
    Ok((StatusCode::OK, "Hits reset to 0 and database reset to initial state."))
}
