// Unified request/response types for the completion providers
//
// Providers translate these into their own wire formats, so the assistant
// never sees provider-specific JSON.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Unified request format for all providers
#[derive(Debug, Clone, Serialize)]
pub struct ProviderRequest {
    pub messages: Vec<Message>,
    pub max_tokens: u32,
}

impl ProviderRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            max_tokens: crate::config::constants::DEFAULT_MAX_TOKENS,
        }
    }

    /// Single user message, the shape every assistant call uses
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self::new(vec![Message::user(prompt)])
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Unified response format from all providers
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub id: String,
    pub model: String,
    /// Text parts of the reply, in order
    pub content: Vec<String>,
    pub stop_reason: Option<String>,
    pub role: String,
    /// Which provider answered (e.g. "azure", "openai")
    pub provider: String,
}

impl ProviderResponse {
    /// Concatenated text of the reply
    pub fn text(&self) -> String {
        self.content.join("\n")
    }
}
