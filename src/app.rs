//! Application assembly
//!
//! Shared state and the fully layered router.

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::store::SharedStore;

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

/// Build the application router.
///
/// Layers run outermost first: correlation id, trace, context, logging.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api::create_router())
        .layer(middleware::from_fn(api::middleware::logging_middleware))
        .layer(middleware::from_fn(api::middleware::context_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(api::middleware::propagate_correlation_id_layer())
        .layer(api::middleware::set_correlation_id_layer())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
