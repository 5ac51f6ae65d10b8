// Completion provider support
//
// Abstraction over the external text-completion service. The assistant
// only ever needs "prompt in, text out"; providers own the wire format.

use anyhow::Result;
use async_trait::async_trait;

pub mod factory;
pub mod openai;
pub mod types;

pub use factory::create_provider;
pub use openai::OpenAIProvider;
pub use types::{Message, ProviderRequest, ProviderResponse};

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a request and wait for the complete response
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse>;

    /// Provider name (e.g. "openai", "azure")
    fn name(&self) -> &str;

    /// Model sent with every request (Azure deployments ignore it)
    fn default_model(&self) -> &str;

    /// Maximum tokens requested for a completion
    fn max_tokens(&self) -> u32 {
        crate::config::constants::DEFAULT_MAX_TOKENS
    }

    /// Send `prompt` as a single user message and return the reply text
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ProviderRequest::from_prompt(prompt).with_max_tokens(self.max_tokens());
        let response = self.send_message(&request).await?;
        Ok(response.text())
    }
}
