//! File-server hit counter.
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::{extract::State, http::Request, middleware::Next, response::Response};
use metrics::counter;

use crate::metrics::APP_HITS;
use crate::storage::Storage;
use crate::AppState;

/// Count every request that reaches the `/app` file server.
pub async fn count_hits<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    state.hits.fetch_add(1, Ordering::Relaxed);
    counter!(APP_HITS).increment(1);
    next.run(request).await
}
