use axum::{Json, extract::State, http::HeaderMap};
use std::sync::Arc;

use crate::metrics::REQUEST_TOTAL;
use crate::models::{ChatRequest, ChatResponse};
use crate::state::AppState;

pub const UNKNOWN_CLIENT: &str = "unknown-client";

// Pick the rate limit key: explicit client id, then proxy headers
pub fn client_key(headers: &HeaderMap, client_id: Option<&str>) -> String {
    if let Some(id) = client_id.map(str::trim).filter(|id| !id.is_empty()) {
        return id.to_string();
    }

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    if let Some(first) = header("x-forwarded-for")
        .and_then(|list| list.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return first.to_string();
    }

    header("x-real-ip").unwrap_or(UNKNOWN_CLIENT).to_string()
}

pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    REQUEST_TOTAL.inc();

    let key = client_key(&headers, payload.client_id.as_deref());
    let answer = state.orchestrator.get_answer(&payload.prompt, Some(&key)).await;

    Json(ChatResponse { answer })
}
