use std::sync::Arc;
use std::time::Duration;

use crate::fallback::FallbackResponder;
use crate::metrics::{FALLBACK_TOTAL, RATE_LIMITED_TOTAL};
use crate::models::ChatMessage;
use crate::provider::CompletionProvider;
use crate::rate_limit::RateLimiter;
use crate::sanitize::sanitize;

pub const EMPTY_PROMPT_MESSAGE: &str = "Please enter a question about the Jharkhand EV Policy.";
pub const DEFAULT_CLIENT_KEY: &str = "client-session";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_POLICY_CONTEXT: &str = "Jharkhand Electric Vehicle Policy 2022 - Comprehensive Knowledge Base (See fallback responses for full details)";

/// Single entry point for turning a user prompt into display-ready text.
pub struct AnswerOrchestrator {
    limiter: Arc<RateLimiter>,
    provider: Arc<dyn CompletionProvider>,
    fallback: FallbackResponder,
    policy_context: String,
    max_tokens: u32,
}

impl AnswerOrchestrator {
    pub fn new(
        limiter: Arc<RateLimiter>,
        provider: Arc<dyn CompletionProvider>,
        policy_context: String,
        max_tokens: u32,
    ) -> Self {
        Self {
            limiter,
            provider,
            fallback: FallbackResponder::new(),
            policy_context,
            max_tokens,
        }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    // Never fails: provider trouble degrades to the keyword responder
    pub async fn get_answer(&self, prompt: &str, client_key: Option<&str>) -> String {
        if prompt.trim().is_empty() {
            return EMPTY_PROMPT_MESSAGE.to_string();
        }

        let key = client_key.unwrap_or(DEFAULT_CLIENT_KEY);
        let decision = self.limiter.check_rate_limit(key);
        if !decision.allowed {
            RATE_LIMITED_TOTAL.inc();
            let config = self.limiter.config();
            let retry_after = decision
                .retry_after_secs
                .unwrap_or(config.window.as_secs());
            tracing::warn!(%key, retry_after, "rate limit exceeded");
            return rate_limited_message(retry_after, config.max_requests, config.window);
        }

        let messages = [
            ChatMessage::system(self.system_prompt()),
            ChatMessage::user(prompt),
        ];

        let answer = self
            .provider
            .complete(&messages, self.max_tokens)
            .await
            .map(|text| sanitize(text.trim()));

        match answer {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                tracing::warn!(%key, "provider returned empty answer, using fallback");
                self.fallback_answer(prompt)
            }
            Err(e) => {
                tracing::warn!(%key, kind = e.kind(), error = %e, "provider failed, using fallback");
                self.fallback_answer(prompt)
            }
        }
    }

    fn fallback_answer(&self, prompt: &str) -> String {
        FALLBACK_TOTAL.inc();
        self.fallback.respond(prompt)
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are the Jharkhand Policy Bot. Answer only using the provided policy context.\n\
             If the user asks outside the policy scope, politely ask them to rephrase.\n\
             Give concise, structured answers with bullet points when helpful.\n\
             \n\
             Policy Context:\n{}",
            self.policy_context
        )
    }
}

pub fn rate_limited_message(retry_after_secs: u64, max_requests: u32, window: Duration) -> String {
    format!(
        "⏳ Rate limit exceeded. Please try again in {retry_after_secs} seconds.\n\n\
         Reminder: You can ask up to {max_requests} questions every {}. Thank you for your patience!",
        describe_window(window)
    )
}

// "15 minutes", "1 minute", "90 seconds"
fn describe_window(window: Duration) -> String {
    let secs = window.as_secs();
    match (secs % 60, secs / 60) {
        (0, 1) => "1 minute".to_string(),
        (0, minutes) if minutes > 0 => format!("{minutes} minutes"),
        _ if secs == 1 => "1 second".to_string(),
        _ => format!("{secs} seconds"),
    }
}
