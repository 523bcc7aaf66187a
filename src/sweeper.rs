use prometheus::Gauge;
use std::sync::Arc;
use tokio::time::{Duration, interval};

use crate::rate_limit::RateLimiter;

// Periodically drop rate limit entries whose window has closed and report
// how many clients this limiter still tracks.
// Only bounds memory, admission stays correct without it.
pub async fn rate_limit_sweeper(limiter: Arc<RateLimiter>, every: Duration, clients: Gauge) {
    let mut interval = interval(every);

    tracing::info!(interval = ?every, "rate limit sweeper started");

    loop {
        interval.tick().await;
        let removed = limiter.sweep_expired();
        let tracked = limiter.stats().active_clients;
        clients.set(tracked as f64);
        if removed > 0 {
            tracing::debug!(removed, remaining = tracked, "swept expired rate limit entries");
        }
    }
}
