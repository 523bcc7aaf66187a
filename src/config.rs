use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::orchestrator::{DEFAULT_MAX_TOKENS, DEFAULT_POLICY_CONTEXT};
use crate::provider::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::rate_limit::RateLimitConfig;

// CLI argument structure, every option can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "policy-bot-gateway")]
#[command(about = "Jharkhand EV policy chatbot backend with per-client rate limiting")]
pub struct Args {
    /// Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Max chat requests per client per window
    #[arg(long, env = "RATE_LIMIT_MAX_REQUESTS", default_value_t = 100,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub rate_limit: u32,

    /// Rate limit window in seconds
    #[arg(long, env = "RATE_LIMIT_WINDOW_SECS", default_value_t = 900,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub rate_window: u64,

    /// How often expired rate limit entries are swept, in seconds
    #[arg(long, env = "RATE_LIMIT_SWEEP_SECS", default_value_t = 60,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub sweep_interval: u64,

    /// Completion provider API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Chat-completions endpoint
    #[arg(long, env = "OPENAI_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Model name sent to the provider
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Output token budget per answer
    #[arg(long, env = "MAX_OUTPUT_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Provider request timeout in seconds
    #[arg(long, env = "PROVIDER_TIMEOUT_SECS", default_value_t = 30)]
    pub provider_timeout: u64,

    /// File holding the policy text injected into the system prompt
    #[arg(long, env = "EV_POLICY_CONTEXT_FILE")]
    pub policy_context: Option<PathBuf>,
}

impl Args {
    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            window: Duration::from_secs(self.rate_window),
            max_requests: self.rate_limit,
        }
    }

    pub fn sweep_every(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout)
    }

    pub fn load_policy_context(&self) -> anyhow::Result<String> {
        match &self.policy_context {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("reading policy context from {}", path.display())),
            None => Ok(DEFAULT_POLICY_CONTEXT.to_string()),
        }
    }
}
