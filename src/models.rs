use serde::{Deserialize, Serialize};
use serde_json::Value;

// Chat API request format
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ChatRequest {
    pub prompt: String,
    #[serde(default)]
    pub client_id: Option<String>,
}

// Chat API response format
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ChatResponse {
    pub answer: String,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

// Chat-completions request body sent upstream
#[derive(Serialize, Debug)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Envelope layouts a completion provider may answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{"output_text": "..."}`
    OutputText,
    /// `{"output": [{"content": [{"text": "..."}]}]}`
    OutputContent,
    /// `{"choices": [{"message": {"content": "..."}}]}`
    ChatChoices,
}

impl ResponseShape {
    pub const ORDER: [ResponseShape; 3] = [
        ResponseShape::OutputText,
        ResponseShape::OutputContent,
        ResponseShape::ChatChoices,
    ];

    fn pointer(self) -> &'static str {
        match self {
            ResponseShape::OutputText => "/output_text",
            ResponseShape::OutputContent => "/output/0/content/0/text",
            ResponseShape::ChatChoices => "/choices/0/message/content",
        }
    }

    pub fn extract(self, body: &Value) -> Option<&str> {
        body.pointer(self.pointer())
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
    }
}

// First non-empty text across the known shapes, else ""
pub fn extract_text(body: &Value) -> String {
    ResponseShape::ORDER
        .iter()
        .find_map(|shape| shape.extract(body))
        .unwrap_or_default()
        .to_string()
}
