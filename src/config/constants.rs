// Project-wide constants
//
// Centralised here so defaults have one source of truth.
// Import via `use crate::config::constants::*;`.

/// Default maximum tokens requested per completion.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Default HTTP request timeout for completion calls.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Azure OpenAI API version used when the config leaves it out.
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-06-01";

/// Directory searched for `<category>.txt` when no `[records]` table is given.
pub const DEFAULT_RECORDS_DIR: &str = "./data";

/// Overrides [`DEFAULT_RECORDS_DIR`].
pub const RECORDS_DIR_ENV: &str = "HEALTHDESK_RECORDS_DIR";

/// Per-user configuration directory under `$HOME`.
pub const CONFIG_DIR_NAME: &str = ".healthdesk";
