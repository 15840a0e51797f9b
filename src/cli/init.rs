//! Init command implementation
//!
//! Writes a commented `switchboard.toml` and a `.env.example` next to it.

use super::output::Output;
use crate::agents::AgentKind;
use crate::llm::Provider;
use crate::utils::toml_config::DEFAULT_CONFIG_FILE;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// switchboard.toml already exists
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Default agent written to the [agent] section
    pub agent: AgentKind,
    /// Completion provider to configure, if any
    pub provider: Option<Provider>,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing switchboard");

    let base_path = &config.path;
    if let Err(e) = fs::create_dir_all(base_path) {
        output.error(&format!("Failed to create {}: {}", base_path.display(), e));
        return InitResult::Error(e.to_string());
    }

    let config_path = base_path.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() && !config.force {
        output.warning(&format!("{} already exists!", DEFAULT_CONFIG_FILE));
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    output.subheader("Creating configuration files");

    let toml_content = generate_config_toml(&config);
    if let Err(e) = write_file(&config_path, &toml_content, config.force) {
        output.error(&format!("Failed to create {}: {}", DEFAULT_CONFIG_FILE, e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", DEFAULT_CONFIG_FILE);

    let env_example_path = base_path.join(".env.example");
    if env_example_path.exists() && !config.force {
        output.skipped(".env.example", "already exists");
    } else if let Err(e) = write_file(&env_example_path, &generate_env_example(), config.force) {
        output.warning(&format!("Failed to create .env.example: {}", e));
    } else {
        output.created("env", ".env.example");
    }

    output.complete("switchboard initialized successfully!");

    output.header("Next Steps");
    output.newline();
    if let Some(provider) = config.provider {
        if provider.requires_api_key() {
            output.info("1. Set your API key:");
            output.command("cp .env.example .env");
            output.command(&format!("# Edit .env and set {}", api_key_env(provider)));
        } else if provider == Provider::Ollama {
            output.info("1. Start Ollama (if not running):");
            output.command("ollama serve");
        } else {
            output.info("1. Set provider.base_url to your Titan endpoint");
        }
        output.newline();
    }
    output.info("Start chatting:");
    output.command("switchboard chat");
    output.hint("Run `switchboard agents` to see every agent kind");

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn api_key_env(provider: Provider) -> &'static str {
    match provider {
        Provider::Anthropic => "ANTHROPIC_API_KEY",
        Provider::OpenAI => "OPENAI_API_KEY",
        Provider::Titan => "TITAN_API_KEY",
        Provider::Ollama => "OLLAMA_API_KEY",
    }
}

fn provider_section(provider: Option<Provider>) -> String {
    match provider {
        None => r#"# Uncomment to answer unmatched requests with a language model.
# Without a provider, agents reply with built-in templates.
# [provider]
# kind = "ollama"
# model = "llama3.2"
# timeout_secs = 30
"#
        .to_string(),
        Some(Provider::Ollama) => r#"[provider]
kind = "ollama"
model = "llama3.2"
base_url = "http://localhost:11434"
timeout_secs = 30
"#
        .to_string(),
        Some(Provider::OpenAI) => format!(
            r#"[provider]
kind = "openai"
model = "gpt-4o-mini"
api_key_env = "{}"
timeout_secs = 30
"#,
            api_key_env(Provider::OpenAI)
        ),
        Some(Provider::Anthropic) => format!(
            r#"[provider]
kind = "anthropic"
model = "claude-3-5-haiku-latest"
api_key_env = "{}"
timeout_secs = 30
"#,
            api_key_env(Provider::Anthropic)
        ),
        Some(Provider::Titan) => r#"[provider]
kind = "titan"
model = "amazon.titan-text-express-v1"
# Titan has no public default endpoint
base_url = "http://localhost:8080/model/amazon.titan-text-express-v1/invoke"
timeout_secs = 30
"#
        .to_string(),
    }
}

fn generate_config_toml(config: &InitConfig) -> String {
    format!(
        r#"# switchboard configuration
# ========================

[agent]
# simple, tools, custom_tools, web_research, file_manager or multi_agent
kind = "{agent}"

[sandbox]
# File tools cannot reach outside this directory
root = "."
max_file_bytes = 1048576
read_max_lines = 50

[history]
# Prior turns sent to the language model (6 to 10)
window = 8

{provider}
[logging]
# trace, debug, info, warn or error (RUST_LOG overrides)
level = "warn"
json = false
"#,
        agent = config.agent.name(),
        provider = provider_section(config.provider),
    )
}

fn generate_env_example() -> String {
    r#"# switchboard environment variables
# Copy this file to .env and fill in the values.

# Optional: Logging level (overrides [logging] level)
RUST_LOG=switchboard=info

# Provider API keys, referenced by provider.api_key_env
# OPENAI_API_KEY=sk-...
# ANTHROPIC_API_KEY=sk-ant-...
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::toml_config::SwitchboardConfig;
    use tempfile::TempDir;

    fn create_test_config(temp_dir: &TempDir, provider: Option<Provider>) -> InitConfig {
        InitConfig {
            path: temp_dir.path().to_path_buf(),
            force: false,
            agent: AgentKind::FileManager,
            provider,
        }
    }

    #[test]
    fn test_generated_config_parses() {
        for provider in [
            None,
            Some(Provider::Ollama),
            Some(Provider::OpenAI),
            Some(Provider::Anthropic),
            Some(Provider::Titan),
        ] {
            let config = InitConfig {
                path: PathBuf::from("/tmp"),
                force: false,
                agent: AgentKind::MultiAgent,
                provider,
            };
            let parsed: SwitchboardConfig = toml::from_str(&generate_config_toml(&config))
                .expect("generated config should parse");
            assert_eq!(parsed.agent.kind, AgentKind::MultiAgent);
            assert_eq!(parsed.provider.map(|p| p.kind), provider);
        }
    }

    #[test]
    fn test_generate_env_example() {
        let content = generate_env_example();
        assert!(content.contains("RUST_LOG"));
        assert!(content.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_write_file_skips_existing_without_force() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("test.txt");
        fs::write(&file_path, "original").expect("Failed to write");

        write_file(&file_path, "new content", false).unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "original");

        write_file(&file_path, "new content", true).unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }

    #[test]
    fn test_run_creates_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = run(create_test_config(&temp_dir, None), &Output::no_color());

        assert!(matches!(result, InitResult::Success));
        assert!(temp_dir.path().join(DEFAULT_CONFIG_FILE).exists());
        assert!(temp_dir.path().join(".env.example").exists());
    }

    #[test]
    fn test_run_already_exists_without_force() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILE), "existing").unwrap();

        let result = run(create_test_config(&temp_dir, None), &Output::no_color());
        assert!(matches!(result, InitResult::AlreadyExists));
    }

    #[test]
    fn test_run_force_overwrites() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILE), "existing").unwrap();

        let mut config = create_test_config(&temp_dir, Some(Provider::Ollama));
        config.force = true;
        let result = run(config, &Output::no_color());

        assert!(matches!(result, InitResult::Success));
        let content = fs::read_to_string(temp_dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert!(content.contains("[provider]"));
        assert!(!content.contains("existing"));
    }
}
