use anyhow::{bail, Context};
use switchboard::agents::{AgentKind, AgentRegistry};
use switchboard::cli::init::{self, InitConfig, InitResult};
use switchboard::cli::output::Output;
use switchboard::cli::{repl, Cli, Commands};
use switchboard::utils::logging;
use switchboard::utils::toml_config::{ConfigError, SwitchboardConfig, DEFAULT_CONFIG_FILE};
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap so `env` defaults see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command.clone().unwrap_or(Commands::Chat) {
        Commands::Init {
            path,
            force,
            provider,
        } => {
            let config = InitConfig {
                path,
                force,
                agent: cli.agent.unwrap_or(AgentKind::Tools),
                provider,
            };
            match init::run(config, &output) {
                InitResult::Success | InitResult::AlreadyExists => Ok(()),
                InitResult::Error(e) => bail!("init failed: {}", e),
            }
        }
        Commands::Config { validate } => {
            let config = load_config(&cli, validate)?;
            if validate {
                output.success(&format!("{} is valid", cli.config.display()));
            } else {
                print!("{}", config.to_toml()?);
            }
            Ok(())
        }
        Commands::Agents => {
            let registry = build_registry(&cli)?;
            output.header("Agents");
            output.table_header(&["Agent", "Tools", "Ready", "Default"]);
            for status in registry.statuses() {
                let is_default = status.agent_type == registry.default_kind().name();
                let tool_count = status.tool_count.to_string();
                output.table_row(&[
                    status.agent_type.as_str(),
                    tool_count.as_str(),
                    if status.ready { "yes" } else { "no" },
                    if is_default { "*" } else { "" },
                ]);
            }
            output.newline();
            output.kv(
                "fallback",
                if registry.has_client() {
                    "language model"
                } else {
                    "templates"
                },
            );
            Ok(())
        }
        Commands::Ask { text } => {
            let registry = build_registry(&cli)?;
            let mut agent = registry.create_default();
            let reply = repl::chat_interruptible(&mut agent, &text.join(" ")).await;
            println!("{}", reply);
            Ok(())
        }
        Commands::Chat => {
            let registry = build_registry(&cli)?;
            let mut agent = registry.create_default();
            repl::run(&mut agent, &output).await?;
            Ok(())
        }
    }
}

/// Load the config file, apply command-line overrides and start logging.
///
/// A missing file is only an error when `--config` names something other
/// than the default.
fn load_config(cli: &Cli, validate: bool) -> anyhow::Result<SwitchboardConfig> {
    let mut config = match SwitchboardConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(ConfigError::FileNotFound(_)) if cli.config.as_os_str() == DEFAULT_CONFIG_FILE => {
            SwitchboardConfig::default()
        }
        Err(e) => return Err(e).context("failed to load configuration"),
    };

    if let Some(kind) = cli.agent {
        config.agent.kind = kind;
    }
    if let Some(root) = &cli.sandbox {
        config.sandbox.root = root.clone();
    }

    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    logging::init(level, config.logging.json);

    if validate {
        config.validate().context("invalid configuration")?;
    }
    debug!(config = %cli.config.display(), agent = %config.agent.kind, "configuration loaded");

    Ok(config)
}

fn build_registry(cli: &Cli) -> anyhow::Result<AgentRegistry> {
    let config = load_config(cli, true)?;
    AgentRegistry::from_config(&config).context("failed to build agents")
}
