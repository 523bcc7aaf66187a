use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use std::sync::Arc;

use crate::rate_limit::RateLimitStats;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ResetResponse {
    pub key: String,
    pub removed: bool,
}

pub async fn rate_limit_stats_handler(State(state): State<Arc<AppState>>) -> Json<RateLimitStats> {
    Json(state.rate_limiter.stats())
}

// Administrative override: un-throttle one client
pub async fn reset_rate_limit_handler(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Json<ResetResponse> {
    let removed = state.rate_limiter.reset_key(&key);
    Json(ResetResponse { key, removed })
}
