/*!
 * Application configuration: loading, validating and saving settings.
 */

use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::default::Default;
use std::path::Path;

use crate::file_utils::FileManager;
use crate::subtitle_processor::ParsePolicy;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code; `None` lets the provider detect it
    #[serde(default)]
    pub source_language: Option<String>,

    /// Target language code
    pub target_language: String,

    /// Registry key of the provider to use
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Number of entries sent to the provider per call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Drop malformed subtitle blocks instead of failing
    #[serde(default = "default_true")]
    pub skip_malformed_blocks: bool,

    /// Per-provider settings
    #[serde(default = "default_provider_configs")]
    pub providers: Vec<ProviderConfig>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Free-form configuration handed to a provider factory
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ProviderConfig {
    /// Registry key this config applies to
    #[serde(rename = "type")]
    pub provider_type: String,

    /// API key (falls back to <TYPE>_API_KEY)
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Model override for LLM providers
    #[serde(default)]
    pub model: Option<String>,

    /// Region (Azure)
    #[serde(default)]
    pub region: Option<String>,

    /// Service URL override
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Send a whole batch as one prompt (LLM providers)
    #[serde(default)]
    pub merge: bool,

    /// Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Provider-specific extras
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl ProviderConfig {
    /// Defaults for the provider registered as `provider_type`
    pub fn new(provider_type: impl Into<String>) -> Self {
        Self {
            provider_type: provider_type.into(),
            timeout_secs: default_timeout_secs(),
            ..Default::default()
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the merge hint
    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    /// Set a provider-specific value
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Name of the environment variable consulted for the API key
    pub fn api_key_env_var(&self) -> String {
        format!("{}_API_KEY", self.provider_type.to_uppercase())
    }

    /// The configured API key, or the one from the environment
    pub fn resolved_api_key(&self) -> String {
        if !self.api_key.is_empty() {
            return self.api_key.clone();
        }
        std::env::var(self.api_key_env_var()).unwrap_or_default()
    }

    /// The configured model or the given default
    pub fn model_or(&self, default: &str) -> String {
        match &self.model {
            Some(model) if !model.is_empty() => model.clone(),
            _ => default.to_string(),
        }
    }

    /// The configured endpoint or the given default, without trailing slash
    pub fn endpoint_or(&self, default: &str) -> String {
        let endpoint = match &self.endpoint {
            Some(endpoint) if !endpoint.is_empty() => endpoint.as_str(),
            _ => default,
        };
        endpoint.trim_end_matches('/').to_string()
    }

    /// Look up a provider-specific value
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The matching `log` filter
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Default number of entries per provider call
pub const DEFAULT_BATCH_SIZE: usize = 10;

fn default_provider() -> String {
    "google".to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_provider_configs() -> Vec<ProviderConfig> {
    crate::providers::BUILTIN_PROVIDERS
        .iter()
        .map(|name| ProviderConfig::new(*name))
        .collect()
}

impl Config {
    /// Read a JSON config file, `None` if there is no file at `path`
    pub fn from_file(path: &Path) -> Result<Option<Config>> {
        if !FileManager::file_exists(path) {
            return Ok(None);
        }
        let content = FileManager::read_to_string(path)?;
        let config = serde_json::from_str::<Config>(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(Some(config))
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        FileManager::write_to_file(path, &json)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language is required"));
        }

        if self.batch_size == 0 {
            return Err(anyhow!("Batch size must be at least 1"));
        }

        if self.provider.trim().is_empty() {
            return Err(anyhow!("Provider name is required"));
        }

        // Vendors accept codes outside ISO 639 (zh-Hans, pt-BR), so only warn
        let mut languages = vec![self.target_language.as_str()];
        if let Some(source) = &self.source_language {
            languages.push(source.as_str());
        }
        for code in languages {
            if crate::language_utils::validate_language_code(code).is_err() {
                warn!("'{}' is not an ISO 639 language code, passing it to the provider as is", code);
            }
        }

        Ok(())
    }

    /// Settings for the active provider, or bare defaults if none are configured
    pub fn active_provider_config(&self) -> ProviderConfig {
        self.provider_config(&self.provider)
            .cloned()
            .unwrap_or_else(|| ProviderConfig::new(self.provider.clone()))
    }

    /// Settings for a provider by registry key
    pub fn provider_config(&self, provider_type: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.provider_type == provider_type)
    }

    /// Mutable settings for a provider, inserted with defaults if absent
    pub fn provider_config_mut(&mut self, provider_type: &str) -> &mut ProviderConfig {
        let position = match self.providers.iter().position(|p| p.provider_type == provider_type) {
            Some(position) => position,
            None => {
                self.providers.push(ProviderConfig::new(provider_type));
                self.providers.len() - 1
            }
        };
        &mut self.providers[position]
    }

    /// Parse policy implied by `skip_malformed_blocks`
    pub fn parse_policy(&self) -> ParsePolicy {
        if self.skip_malformed_blocks {
            ParsePolicy::Lenient
        } else {
            ParsePolicy::Strict
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: None,
            target_language: "zh".to_string(),
            provider: default_provider(),
            batch_size: default_batch_size(),
            skip_malformed_blocks: true,
            providers: default_provider_configs(),
            log_level: LogLevel::default(),
        }
    }
}
