// Configuration structs

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

use super::constants::{DEFAULT_MAX_TOKENS, DEFAULT_REQUEST_TIMEOUT_SECS};
use super::provider::ProviderEntry;
use crate::records::RecordStore;

#[derive(Debug, Clone)]
pub struct Config {
    /// Completion service used for both classification and answering
    pub provider: ProviderEntry,

    /// Category -> file mapping, fixed for the process lifetime
    pub records: RecordStore,

    /// HTTP timeout for each completion call
    pub request_timeout_secs: u64,

    /// Maximum tokens requested per completion
    pub max_tokens: u32,

    /// Directory for per-question JSONL metrics; `None` disables them
    pub metrics_dir: Option<PathBuf>,
}

impl Config {
    pub fn new(provider: ProviderEntry, records: RecordStore) -> Self {
        Self {
            provider,
            records,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_tokens: DEFAULT_MAX_TOKENS,
            metrics_dir: None,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.provider.api_key().trim().is_empty() {
            bail!(
                "API key for provider '{}' is empty",
                self.provider.provider_type()
            );
        }

        if let ProviderEntry::Azure {
            endpoint,
            deployment,
            api_version,
            ..
        } = &self.provider
        {
            if endpoint.trim().is_empty() {
                bail!("Azure endpoint is empty");
            }
            if deployment.trim().is_empty() {
                bail!("Azure deployment name is empty");
            }
            if api_version.trim().is_empty() {
                bail!("Azure API version is empty");
            }
        }

        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        if self.max_tokens == 0 {
            bail!("max_tokens must be greater than zero");
        }

        if self.records.is_empty() {
            tracing::warn!("No record files configured; every question will find no records");
        }

        Ok(())
    }
}
