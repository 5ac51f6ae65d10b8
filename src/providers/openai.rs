// OpenAI-compatible chat-completions provider
//
// Works against api.openai.com style endpoints and Azure OpenAI
// deployments; both share the request/response body and differ only in
// URL layout and authentication header.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::types::{ProviderRequest, ProviderResponse};
use super::LlmProvider;
use crate::config::constants::{DEFAULT_MAX_TOKENS, DEFAULT_REQUEST_TIMEOUT_SECS};

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const OPENAI_DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Endpoint {
    OpenAi {
        base_url: String,
    },
    Azure {
        endpoint: String,
        deployment: String,
        api_version: String,
    },
}

/// OpenAI-compatible provider
#[derive(Clone)]
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    endpoint: Endpoint,
    default_model: String,
    max_tokens: u32,
    provider_name: String,
}

impl OpenAIProvider {
    /// Create a provider for the public OpenAI API
    pub fn new_openai(api_key: String) -> Result<Self> {
        Self::new(
            api_key,
            Endpoint::OpenAi {
                base_url: OPENAI_BASE_URL.to_string(),
            },
            OPENAI_DEFAULT_MODEL.to_string(),
            "openai".to_string(),
        )
    }

    /// Create a provider for an Azure OpenAI deployment
    ///
    /// The deployment name doubles as the model name; Azure routes on the URL.
    pub fn new_azure(
        api_key: String,
        endpoint: String,
        deployment: String,
        api_version: String,
    ) -> Result<Self> {
        Self::new(
            api_key,
            Endpoint::Azure {
                endpoint,
                deployment: deployment.clone(),
                api_version,
            },
            deployment,
            "azure".to_string(),
        )
    }

    /// Point an OpenAI provider at a compatible server (ignored for Azure)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        if let Endpoint::OpenAi { base_url } = &mut self.endpoint {
            *base_url = url.into();
        }
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Rebuild the HTTP client with a different request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    fn new(
        api_key: String,
        endpoint: Endpoint,
        default_model: String,
        provider_name: String,
    ) -> Result<Self> {
        let client = build_client(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))?;

        Ok(Self {
            client,
            api_key,
            endpoint,
            default_model,
            max_tokens: DEFAULT_MAX_TOKENS,
            provider_name,
        })
    }

    /// Full chat-completions URL for this endpoint
    fn completions_url(&self) -> String {
        match &self.endpoint {
            Endpoint::OpenAi { base_url } => {
                format!("{}/v1/chat/completions", base_url.trim_end_matches('/'))
            }
            Endpoint::Azure {
                endpoint,
                deployment,
                api_version,
            } => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                endpoint.trim_end_matches('/'),
                deployment,
                api_version
            ),
        }
    }

    /// Convert ProviderRequest to the chat-completions body
    ///
    /// Azure routes on the deployment URL, so the model is only sent to OpenAI.
    fn to_openai_request(&self, request: &ProviderRequest) -> OpenAIRequest {
        let model = match self.endpoint {
            Endpoint::OpenAi { .. } => Some(self.default_model.clone()),
            Endpoint::Azure { .. } => None,
        };

        OpenAIRequest {
            model,
            messages: request
                .messages
                .iter()
                .map(|m| OpenAIMessage {
                    role: m.role.clone(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: Some(request.max_tokens),
        }
    }

    fn from_openai_response(&self, response: OpenAIResponse) -> Result<ProviderResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .context("Completion API returned no choices in response")?;

        let content = choice
            .message
            .content
            .filter(|text| !text.is_empty())
            .into_iter()
            .collect();

        Ok(ProviderResponse {
            id: response.id,
            model: response.model,
            content,
            stop_reason: choice.finish_reason,
            role: choice.message.role,
            provider: self.provider_name.clone(),
        })
    }
}

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        let body = self.to_openai_request(request);
        let url = self.completions_url();

        tracing::debug!(provider = %self.provider_name, "Sending completion request to {}", url);

        let builder = self.client.post(&url).header("content-type", "application/json");
        let builder = match self.endpoint {
            Endpoint::OpenAi { .. } => {
                builder.header("Authorization", format!("Bearer {}", self.api_key))
            }
            Endpoint::Azure { .. } => builder.header("api-key", &self.api_key),
        };

        let response = builder
            .json(&body)
            .send()
            .await
            .context("Failed to send request to completion API")?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Completion API request failed\n\nStatus: {}\nBody: {}",
                status,
                error_body
            );
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .context("Failed to parse completion API response")?;

        tracing::debug!("Received response {} from {}", openai_response.id, openai_response.model);

        self.from_openai_response(openai_response)
    }

    fn name(&self) -> &str {
        &self.provider_name
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

// Chat-completions wire types

#[derive(Debug, Clone, Serialize)]
struct OpenAIRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponseMessage {
    role: String,
    content: Option<String>,
}
