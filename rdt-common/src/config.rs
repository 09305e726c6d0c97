//! Configuration loading and API host resolution
//!
//! Values are resolved once at startup and passed explicitly to the API
//! client. Priority order:
//! - API key: `RD_API` environment variable, then TOML config file
//! - Base URL: command-line flag, `RDT_BASE_URL`, TOML `base_url`,
//!   then the host of the selected [`Environment`]

use crate::{Error, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "RD_API";
/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "RDT_BASE_URL";
/// Environment variable overriding the TOML config file location
pub const CONFIG_PATH_ENV: &str = "RDT_CONFIG";

/// Attempts made against the upload-target endpoint when it answers 502
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Pause between those attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);
/// Timeout for the PUT of file bytes to a signed URL
pub const DEFAULT_TRANSFER_TIMEOUT: Duration = Duration::from_secs(20);
/// Timeout for every other API request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Deployment of the analysis API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development deployment
    Dev,
    /// Production deployment
    #[default]
    Prd,
}

impl Environment {
    /// API host for this deployment
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Dev => "https://api.dev.realitydefender.xyz",
            Environment::Prd => "https://api.prd.realitydefender.xyz",
        }
    }
}

/// Fixed retry for transient upload-target failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Sleep between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Optional settings file (`~/.config/rdt/config.toml`)
///
/// ```toml
/// api_key = "..."
/// environment = "dev"
/// base_url = "https://api.example.test"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub environment: Option<Environment>,
}

impl TomlConfig {
    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load the config file if one exists
    ///
    /// A missing or unreadable file is not fatal: a warning is logged and
    /// an empty config is returned so environment values still apply.
    pub fn load_default() -> Self {
        let Some(path) = config_file_path() else {
            return Self::default();
        };

        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded config file {}", path.display());
                config
            }
            Err(e) => {
                warn!("{} (continuing without config file)", e);
                Self::default()
            }
        }
    }
}

/// Location of the TOML config file
///
/// `RDT_CONFIG` wins over the platform config directory.
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::config_dir().map(|d| d.join("rdt").join("config.toml"))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Everything an API call needs, threaded into the client explicitly
#[derive(Clone)]
pub struct ClientConfig {
    /// Value sent in the `x-api-key` header
    pub api_key: String,
    /// Scheme and host of the API, without trailing slash
    pub base_url: String,
    pub retry: RetryPolicy,
    pub transfer_timeout: Duration,
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Config with default retry policy and timeouts
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
            transfer_timeout: DEFAULT_TRANSFER_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Resolve from the process environment and the default config file
    pub fn resolve(environment: Option<Environment>, base_url: Option<String>) -> Result<Self> {
        let toml_config = TomlConfig::load_default();
        Self::resolve_with(&toml_config, environment, base_url)
    }

    /// Resolve against an already loaded config file
    pub fn resolve_with(
        toml_config: &TomlConfig,
        environment: Option<Environment>,
        base_url: Option<String>,
    ) -> Result<Self> {
        let api_key = resolve_api_key(toml_config)?;

        let base_url = base_url
            .filter(|url| !url.trim().is_empty())
            .or_else(|| {
                std::env::var(BASE_URL_ENV)
                    .ok()
                    .filter(|url| !url.trim().is_empty())
            })
            .or_else(|| toml_config.base_url.clone())
            .unwrap_or_else(|| {
                environment
                    .or(toml_config.environment)
                    .unwrap_or_default()
                    .base_url()
                    .to_string()
            });

        info!(base_url = %base_url, "Using analysis API");
        Ok(Self::new(api_key, base_url))
    }

    /// Absolute URL for an API path such as `/api/media/users`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .field("transfer_timeout", &self.transfer_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn resolve_api_key(toml_config: &TomlConfig) -> Result<String> {
    let env_key = std::env::var(API_KEY_ENV).ok();
    let toml_key = toml_config.api_key.as_ref();

    if env_key.as_deref().is_some_and(is_valid_key) && toml_key.is_some_and(|k| is_valid_key(k)) {
        warn!(
            "API key found in both {} and config file. Using environment (highest priority).",
            API_KEY_ENV
        );
    }

    if let Some(key) = env_key {
        if is_valid_key(&key) {
            debug!("API key loaded from environment variable");
            return Ok(key);
        }
    }

    if let Some(key) = toml_key {
        if is_valid_key(key) {
            debug!("API key loaded from config file");
            return Ok(key.clone());
        }
    }

    Err(Error::Config(format!(
        "API key not configured. Set {} in the environment or api_key in the config file",
        API_KEY_ENV
    )))
}
