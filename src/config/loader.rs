// Configuration loader
// Loads settings from a TOML file (explicit path or ~/.healthdesk/config.toml)
// or from the environment variables of the Azure deployment

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::constants::{
    CONFIG_DIR_NAME, DEFAULT_MAX_TOKENS, DEFAULT_RECORDS_DIR, DEFAULT_REQUEST_TIMEOUT_SECS,
    RECORDS_DIR_ENV,
};
use super::provider::ProviderEntry;
use super::settings::Config;
use crate::records::RecordStore;

#[derive(Debug, Deserialize)]
struct TomlConfig {
    provider: ProviderEntry,
    #[serde(default)]
    records: Option<BTreeMap<String, PathBuf>>,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
    #[serde(default)]
    max_tokens: Option<u32>,
    #[serde(default)]
    metrics_dir: Option<PathBuf>,
}

/// Load configuration
///
/// Order: explicit path, `~/.healthdesk/config.toml`, environment variables.
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config> {
    load_config_with(explicit_path, home_config_path(), |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with the home config path and env lookup injected
pub fn load_config_with<F>(
    explicit_path: Option<&Path>,
    home_config: Option<PathBuf>,
    env: F,
) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = explicit_path {
        if !path.exists() {
            bail!("Configuration file not found: {}", path.display());
        }
        return load_from_file(path, &env);
    }

    if let Some(path) = home_config.filter(|p| p.exists()) {
        return load_from_file(&path, &env);
    }

    if let Some(config) = config_from_env(&env)? {
        return Ok(config);
    }

    bail!(
        "No configuration found.\n\n\
        Create ~/{}/config.toml with a [provider] table, or set environment variables:\n  \
        ENDPOINT_URL, DEPLOYMENT_NAME, AZURE_OPENAI_API_KEY, API_VERSION  (Azure OpenAI)\n  \
        OPENAI_API_KEY [OPENAI_MODEL]                                (OpenAI)",
        CONFIG_DIR_NAME
    );
}

fn home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join("config.toml"))
}

fn load_from_file<F>(path: &Path, env: &F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

    let config = parse_config(&contents, env)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Parse TOML config contents
pub fn parse_config<F>(contents: &str, env: &F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let toml_config: TomlConfig =
        toml::from_str(contents).context("Failed to parse configuration TOML")?;

    let records = match &toml_config.records {
        Some(named) => RecordStore::from_named(named)?,
        None => RecordStore::in_dir(default_records_dir(env)),
    };

    let mut config = Config::new(toml_config.provider, records);
    config.request_timeout_secs = toml_config
        .request_timeout_secs
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    config.max_tokens = toml_config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
    config.metrics_dir = toml_config.metrics_dir.map(|p| expand_home(&p));

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

/// Build config from environment variables, if any provider is configured there
fn config_from_env<F>(env: &F) -> Result<Option<Config>>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let provider = if let Some(api_key) = get("AZURE_OPENAI_API_KEY") {
        let endpoint = get("ENDPOINT_URL").context("ENDPOINT_URL is not set")?;
        let deployment = get("DEPLOYMENT_NAME").context("DEPLOYMENT_NAME is not set")?;
        let api_version = get("API_VERSION")
            .unwrap_or_else(|| super::constants::DEFAULT_AZURE_API_VERSION.to_string());
        ProviderEntry::Azure {
            api_key,
            endpoint,
            deployment,
            api_version,
        }
    } else if let Some(api_key) = get("OPENAI_API_KEY") {
        ProviderEntry::Openai {
            api_key,
            model: get("OPENAI_MODEL"),
            base_url: get("OPENAI_BASE_URL"),
        }
    } else {
        return Ok(None);
    };

    let config = Config::new(provider, RecordStore::in_dir(default_records_dir(env)));
    config
        .validate()
        .context("Configuration validation failed")?;

    tracing::debug!("Loaded configuration from environment");
    Ok(Some(config))
}

fn default_records_dir<F>(env: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    env(RECORDS_DIR_ENV)
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORDS_DIR))
}

/// Expand a leading `~/` to the user's home directory
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Category;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
            request_timeout_secs = 30
            max_tokens = 512
            metrics_dir = "/tmp/healthdesk-metrics"

            [provider]
            type = "azure"
            api_key = "k"
            endpoint = "https://example.openai.azure.com"
            deployment = "gpt-4o"

            [records]
            lab_record = "/srv/records/labs.txt"
            medical_record = "/srv/records/history.txt"
        "#;
        let config = parse_config(contents, &env_from(&[])).unwrap();

        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_tokens, 512);
        assert_eq!(
            config.metrics_dir,
            Some(PathBuf::from("/tmp/healthdesk-metrics"))
        );
        assert_eq!(config.records.len(), 2);
        assert_eq!(
            config.records.path(Category::LabRecord),
            Some(Path::new("/srv/records/labs.txt"))
        );
        assert!(config.records.path(Category::ImageRecord).is_none());
    }

    #[test]
    fn test_records_default_to_data_dir() {
        let contents = r#"
            [provider]
            type = "openai"
            api_key = "sk-test"
        "#;
        let config = parse_config(contents, &env_from(&[])).unwrap();
        assert_eq!(
            config.records.path(Category::ImageRecord),
            Some(Path::new("./data/image_record.txt"))
        );
        assert!(config.metrics_dir.is_none());
    }

    #[test]
    fn test_records_dir_env_override() {
        let contents = r#"
            [provider]
            type = "openai"
            api_key = "sk-test"
        "#;
        let config =
            parse_config(contents, &env_from(&[(RECORDS_DIR_ENV, "/records")])).unwrap();
        assert_eq!(
            config.records.path(Category::MedicalRecord),
            Some(Path::new("/records/medical_record.txt"))
        );
    }

    #[test]
    fn test_unknown_record_name_rejected() {
        let contents = r#"
            [provider]
            type = "openai"
            api_key = "sk-test"

            [records]
            dental_record = "teeth.txt"
        "#;
        assert!(parse_config(contents, &env_from(&[])).is_err());
    }

    #[test]
    fn test_missing_provider_rejected() {
        assert!(parse_config("max_tokens = 10", &env_from(&[])).is_err());
    }

    #[test]
    fn test_azure_from_env() {
        let env = env_from(&[
            ("ENDPOINT_URL", "https://example.openai.azure.com"),
            ("DEPLOYMENT_NAME", "gpt-4o"),
            ("AZURE_OPENAI_API_KEY", "secret"),
            ("API_VERSION", "2024-02-01"),
        ]);
        let config = load_config_with(None, None, env).unwrap();
        assert_eq!(
            config.provider,
            ProviderEntry::Azure {
                api_key: "secret".into(),
                endpoint: "https://example.openai.azure.com".into(),
                deployment: "gpt-4o".into(),
                api_version: "2024-02-01".into(),
            }
        );
        assert_eq!(config.records.len(), 3);
    }

    #[test]
    fn test_azure_env_requires_endpoint() {
        let env = env_from(&[("AZURE_OPENAI_API_KEY", "secret"), ("DEPLOYMENT_NAME", "d")]);
        assert!(load_config_with(None, None, env).is_err());
    }

    #[test]
    fn test_no_configuration_is_an_error() {
        let err = load_config_with(None, None, env_from(&[])).unwrap_err();
        assert!(err.to_string().contains("No configuration found"));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config_with(Some(missing.as_path()), None, env_from(&[])).is_err());
    }

    #[test]
    fn test_home_config_preferred_over_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[provider]\ntype = \"openai\"\napi_key = \"from-file\"\n",
        )
        .unwrap();

        let env = env_from(&[("OPENAI_API_KEY", "from-env")]);
        let config = load_config_with(None, Some(path), env).unwrap();
        assert_eq!(config.provider.api_key(), "from-file");
    }
}
