// ============================
// chirpy-backend-lib/src/router.rs
// ============================
//! HTTP routes.
use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::{self, admin, auth, chirps, users, webhooks};
use crate::middleware::count_hits;
use crate::storage::Storage;
use crate::AppState;

/// Create the application router
pub fn create_router<S: Storage>(state: Arc<AppState<S>>) -> Router {
    let files: Router<Arc<AppState<S>>> = Router::new()
        .nest_service("/app", ServeDir::new(&state.settings.static_dir))
        .layer(from_fn_with_state(state.clone(), count_hits::<S>));

    let api = Router::new()
        .route("/api/healthz", get(handlers::healthz))
        .route("/api/users", post(users::create_user::<S>).put(users::update_user::<S>))
        .route("/api/login", post(auth::login::<S>))
        .route("/api/refresh", post(auth::refresh::<S>))
        .route("/api/revoke", post(auth::revoke::<S>))
        .route(
            "/api/chirps",
            post(chirps::create_chirp::<S>).get(chirps::list_chirps::<S>),
        )
        .route(
            "/api/chirps/{chirp_id}",
            get(chirps::get_chirp::<S>).delete(chirps::delete_chirp::<S>),
        )
        .route("/api/polka/webhooks", post(webhooks::polka_webhook::<S>))
        .route("/admin/metrics", get(admin::metrics::<S>))
        .route("/admin/reset", post(admin::reset::<S>));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api.merge(files)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
