//! CLI module for switchboard
//!
//! Provides command-line interface parsing for the switchboard binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;
pub mod repl;

use crate::agents::AgentKind;
use crate::llm::Provider;
use crate::utils::toml_config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// switchboard - intent routing and tool dispatch for conversational agents
///
/// Routes each message to a built-in tool when it matches a known request,
/// and to a language model or canned reply when it does not.
#[derive(Parser, Debug)]
#[command(
    name = "switchboard",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "switchboard - intent routing and tool dispatch for conversational agents",
    long_about = "Routes each message to a built-in tool (calculator, files, text analysis,\n\
                  research and more) when it matches a known request, and to a language\n\
                  model or canned reply when it does not.\n\n\
                  Run without arguments to start an interactive chat.",
    after_help = "EXAMPLES:\n    \
                  switchboard                                   # Chat with the default agent\n    \
                  switchboard --agent file_manager chat         # Chat with a specific agent\n    \
                  switchboard ask \"calculate 15 * 8\"            # One-shot question\n    \
                  switchboard init                              # Write switchboard.toml"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    /// Agent kind to use (overrides [agent] kind)
    #[arg(short, long, global = true)]
    pub agent: Option<AgentKind>,

    /// Sandbox root for file tools (overrides [sandbox] root)
    #[arg(short, long, global = true, env = "SWITCHBOARD_SANDBOX")]
    pub sandbox: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session (default)
    Chat,

    /// Send a single message and print the reply
    Ask {
        /// The message to send
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List agent kinds and their status
    Agents,

    /// Write a default switchboard.toml
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,

        /// Completion provider to configure (anthropic, titan, openai or ollama)
        #[arg(long)]
        provider: Option<Provider>,
    },

    /// Show the effective configuration
    Config {
        /// Validate the configuration and report problems
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
