use thiserror::Error;

// Why the completion provider could not produce an answer
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("missing completion API key (set OPENAI_API_KEY or --api-key)")]
    MissingCredential,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed provider response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ProviderError {
    // short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::MissingCredential => "missing_credential",
            ProviderError::Transport(_) => "transport",
            ProviderError::Status { .. } => "status",
            ProviderError::Malformed(_) => "malformed",
        }
    }
}
