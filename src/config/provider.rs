// Completion provider entry
//
// Serializes with a `type` tag, e.g.:
// ```toml
// [provider]
// type = "azure"
// endpoint = "https://example.openai.azure.com"
// deployment = "gpt-4o"
// api_key = "..."
// api_version = "2024-06-01"
// ```

use serde::{Deserialize, Serialize};

fn default_api_version() -> String {
    super::constants::DEFAULT_AZURE_API_VERSION.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderEntry {
    Azure {
        api_key: String,
        endpoint: String,
        deployment: String,
        #[serde(default = "default_api_version")]
        api_version: String,
    },
    Openai {
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
}

impl ProviderEntry {
    /// Short provider-type tag ("azure", "openai")
    pub fn provider_type(&self) -> &'static str {
        match self {
            Self::Azure { .. } => "azure",
            Self::Openai { .. } => "openai",
        }
    }

    pub fn api_key(&self) -> &str {
        match self {
            Self::Azure { api_key, .. } | Self::Openai { api_key, .. } => api_key,
        }
    }

    /// Human-readable target for the startup log line
    pub fn describe(&self) -> String {
        match self {
            Self::Azure {
                endpoint,
                deployment,
                ..
            } => format!("Azure OpenAI endpoint {} (deployment {})", endpoint, deployment),
            Self::Openai {
                model, base_url, ..
            } => format!(
                "OpenAI {} (model {})",
                base_url.as_deref().unwrap_or("api.openai.com"),
                model.as_deref().unwrap_or("default")
            ),
        }
    }
}
