use std::sync::Arc;

use crate::orchestrator::AnswerOrchestrator;
use crate::rate_limit::RateLimiter;

// app's shared state
pub struct AppState {
    pub orchestrator: AnswerOrchestrator,
    pub rate_limiter: Arc<RateLimiter>, // same limiter the orchestrator checks
}

impl AppState {
    pub fn new(orchestrator: AnswerOrchestrator) -> Self {
        let rate_limiter = Arc::clone(orchestrator.limiter());
        Self { orchestrator, rate_limiter }
    }
}
