pub mod config;
pub mod error;
pub mod fallback;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod provider;
pub mod rate_limit;
pub mod sanitize;
pub mod state;
pub mod sweeper;
pub mod telemetry;

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/chat", post(handlers::chat_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/admin/rate-limit", get(handlers::rate_limit_stats_handler))
        .route("/admin/rate-limit/{key}", delete(handlers::reset_rate_limit_handler))
        .with_state(state)
}
