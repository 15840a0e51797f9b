/// Tracing subscriber setup.
pub mod logging;
/// TOML configuration loading and validation.
pub mod toml_config;

pub use toml_config::{ConfigError, SwitchboardConfig, DEFAULT_CONFIG_FILE};
