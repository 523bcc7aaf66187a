use async_trait::async_trait;
use std::time::Instant;

use crate::error::ProviderError;
use crate::metrics::PROVIDER_LATENCY;
use crate::models::{ChatMessage, CompletionRequest, extract_text};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";
const TEMPERATURE: f32 = 0.2;

/// Something that can turn a conversation into answer text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, ProviderError>;
}

// OpenAI-compatible chat-completions client
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiProvider {
    pub fn new(
        client: reqwest::Client,
        api_url: String,
        model: String,
        api_key: Option<String>,
    ) -> Self {
        // blank keys count as missing
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        Self { client, api_url, model, api_key }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingCredential)?;

        let body = CompletionRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens,
        };

        let start_time = Instant::now();
        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await;
        PROVIDER_LATENCY.observe(start_time.elapsed().as_secs_f64());
        let res = res?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let bytes = res.bytes().await?;
        let json: serde_json::Value = serde_json::from_slice(&bytes)?;
        Ok(extract_text(&json))
    }
}
