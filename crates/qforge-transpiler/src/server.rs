//! Axum server setup and routing.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health::health))
        .route("/transpile", post(api::transpile::transpile))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
