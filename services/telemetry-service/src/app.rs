use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::ingest;
use crate::state::AppState;

/// Everything goes through `ingest`, which does its own method and path
/// checks; axum's per-route matching would answer 404 before 405.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(ingest)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
