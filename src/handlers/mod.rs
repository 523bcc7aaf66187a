mod admin;
mod chat;
mod health;
mod metrics;

pub use admin::{rate_limit_stats_handler, reset_rate_limit_handler};
pub use chat::{chat_handler, client_key};
pub use health::health_handler;
pub use metrics::metrics_handler;
