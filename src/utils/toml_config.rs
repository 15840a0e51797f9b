//! TOML-based configuration for Switchboard
//!
//! Everything an agent needs at startup lives in one explicit struct loaded
//! from `switchboard.toml`: the default agent kind, the filesystem sandbox,
//! the history window, an optional completion provider and logging. Secrets
//! are never stored in the file; the provider section names the environment
//! variable that holds the API key.

use crate::agents::AgentKind;
use crate::llm::{ModelConfig, ModelParams, Provider};
use crate::memory::{DEFAULT_HISTORY_WINDOW, MAX_HISTORY_WINDOW, MIN_HISTORY_WINDOW};
use crate::tools::{DEFAULT_MAX_FILE_BYTES, DEFAULT_READ_MAX_LINES};
use crate::types::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "switchboard.toml";

/// Root configuration structure loaded from switchboard.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwitchboardConfig {
    #[serde(default)]
    pub agent: AgentSection,

    #[serde(default)]
    pub sandbox: SandboxConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    /// Completion service used when no intent matches. Absent means
    /// template replies only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============= Agent Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSection {
    /// Agent used by `chat` and `ask` unless overridden on the command line
    #[serde(default = "default_agent_kind")]
    pub kind: AgentKind,
}

fn default_agent_kind() -> AgentKind {
    AgentKind::Tools
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            kind: default_agent_kind(),
        }
    }
}

// ============= Sandbox Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Directory file tools are confined to
    #[serde(default = "default_sandbox_root")]
    pub root: PathBuf,

    /// Files larger than this are not read
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Lines shown by `read_file` unless the user asks for all of them
    #[serde(default = "default_read_max_lines")]
    pub read_max_lines: usize,
}

fn default_sandbox_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

fn default_read_max_lines() -> usize {
    DEFAULT_READ_MAX_LINES
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            root: default_sandbox_root(),
            max_file_bytes: default_max_file_bytes(),
            read_max_lines: default_read_max_lines(),
        }
    }
}

// ============= History Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Prior turns sent to the completion service (clamped to 6..=10)
    #[serde(default = "default_history_window")]
    pub window: usize,
}

fn default_history_window() -> usize {
    DEFAULT_HISTORY_WINDOW
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            window: default_history_window(),
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub kind: Provider,

    pub model: String,

    /// Overrides the provider's default base URL. Required for titan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Environment variable name containing the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Overrides the agent profile's temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Overrides the agent profile's token limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl ProviderConfig {
    /// Profile defaults with this section's overrides applied.
    pub fn params_for(&self, defaults: ModelParams) -> ModelParams {
        ModelParams {
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ============= Errors =============

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl SwitchboardConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without validating it, so command-line overrides
    /// can be applied first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate the configuration for internal consistency and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sandbox.root.is_dir() {
            return Err(ConfigError::ValidationError(format!(
                "sandbox.root '{}' is not a directory",
                self.sandbox.root.display()
            )));
        }
        if self.sandbox.max_file_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "sandbox.max_file_bytes must be greater than zero".to_string(),
            ));
        }
        if self.sandbox.read_max_lines == 0 {
            return Err(ConfigError::ValidationError(
                "sandbox.read_max_lines must be greater than zero".to_string(),
            ));
        }

        if !(MIN_HISTORY_WINDOW..=MAX_HISTORY_WINDOW).contains(&self.history.window) {
            warn!(
                window = self.history.window,
                min = MIN_HISTORY_WINDOW,
                max = MAX_HISTORY_WINDOW,
                "history.window out of range, it will be clamped"
            );
        }

        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::ValidationError(format!(
                "logging.level '{}' is not one of trace, debug, info, warn, error",
                self.logging.level
            )));
        }

        if let Some(provider) = &self.provider {
            self.validate_provider(provider)?;
        }

        Ok(())
    }

    fn validate_provider(&self, provider: &ProviderConfig) -> Result<(), ConfigError> {
        if provider.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "provider.model must not be empty".to_string(),
            ));
        }
        if provider.base_url.is_none() && provider.kind.default_base_url().is_none() {
            return Err(ConfigError::ValidationError(format!(
                "provider.base_url is required for {}",
                provider.kind
            )));
        }
        if provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if let Some(t) = provider.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::ValidationError(format!(
                    "provider.temperature {} is outside 0.0..=2.0",
                    t
                )));
            }
        }
        match &provider.api_key_env {
            Some(env) => self.validate_env_var(env)?,
            None if provider.kind.requires_api_key() => {
                return Err(ConfigError::ValidationError(format!(
                    "provider.api_key_env is required for {}",
                    provider.kind
                )));
            }
            None => {}
        }
        Ok(())
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// Connection settings for the configured provider, with the API key
    /// resolved from the environment. `None` when no provider is configured.
    pub fn model_config(&self) -> Result<Option<ModelConfig>, ConfigError> {
        let provider = match &self.provider {
            Some(provider) => provider,
            None => return Ok(None),
        };

        let api_key = match &provider.api_key_env {
            Some(env) => Some(
                self.resolve_env(env)
                    .ok_or_else(|| ConfigError::MissingEnvVar(env.clone()))?,
            ),
            None => None,
        };

        let base_url = provider
            .base_url
            .clone()
            .or_else(|| provider.kind.default_base_url().map(str::to_string))
            .ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "provider.base_url is required for {}",
                    provider.kind
                ))
            })?;

        Ok(Some(ModelConfig {
            provider: provider.kind,
            model: provider.model.clone(),
            base_url,
            api_key,
            timeout: provider.timeout(),
        }))
    }

    /// Render the configuration back to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
