// Provider factory
//
// Creates the completion provider from configuration

use anyhow::Result;
use std::sync::Arc;

use super::openai::OpenAIProvider;
use super::LlmProvider;
use crate::config::{Config, ProviderEntry};

/// Create the configured provider, applying timeout and token limits
pub fn create_provider(config: &Config) -> Result<Arc<dyn LlmProvider>> {
    let provider = match &config.provider {
        ProviderEntry::Azure {
            api_key,
            endpoint,
            deployment,
            api_version,
        } => OpenAIProvider::new_azure(
            api_key.clone(),
            endpoint.clone(),
            deployment.clone(),
            api_version.clone(),
        )?,

        ProviderEntry::Openai {
            api_key,
            model,
            base_url,
        } => {
            let mut provider = OpenAIProvider::new_openai(api_key.clone())?;
            if let Some(m) = model {
                provider = provider.with_model(m.clone());
            }
            if let Some(url) = base_url {
                provider = provider.with_base_url(url.clone());
            }
            provider
        }
    };

    let provider = provider
        .with_max_tokens(config.max_tokens)
        .with_timeout(config.request_timeout())?;

    tracing::info!("Completion client configured: {}", config.provider.describe());

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordStore;

    #[test]
    fn test_create_azure_provider() {
        let config = Config::new(
            ProviderEntry::Azure {
                api_key: "k".into(),
                endpoint: "https://example.openai.azure.com".into(),
                deployment: "gpt-4o".into(),
                api_version: "2024-06-01".into(),
            },
            RecordStore::in_dir("data"),
        );
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "azure");
        assert_eq!(provider.default_model(), "gpt-4o");
        assert_eq!(provider.max_tokens(), config.max_tokens);
    }

    #[test]
    fn test_create_openai_provider_with_model_override() {
        let mut config = Config::new(
            ProviderEntry::Openai {
                api_key: "sk-test".into(),
                model: Some("gpt-4o-mini".into()),
                base_url: None,
            },
            RecordStore::in_dir("data"),
        );
        config.max_tokens = 300;
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.default_model(), "gpt-4o-mini");
        assert_eq!(provider.max_tokens(), 300);
    }
}
