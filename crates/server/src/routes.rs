//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness probe, intentionally trivial
        .route("/healthz", get(handlers::health_check))
        // Account registry
        .route(
            "/accounts",
            get(handlers::list_accounts).post(handlers::create_account),
        )
        .route("/accounts/{name}", get(handlers::get_account))
        // Adoption (lease) control
        .route("/accounts/{name}/adopt", post(handlers::adopt_account))
        // Provider proxy operations
        .route(
            "/accounts/{name}/fetch-profiles",
            post(handlers::fetch_profiles),
        )
        .route("/accounts/{name}/check-limit", get(handlers::check_limit))
        // Stats
        .route(
            "/accounts/{name}/stats",
            get(handlers::get_stats).post(handlers::save_stats),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
