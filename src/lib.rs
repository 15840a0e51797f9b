//! # switchboard
//!
//! Intent routing and tool dispatch for conversational agents.
//!
//! Each user message is classified against an ordered keyword table. A match
//! runs one built-in tool (calculator, sandboxed file inspection, text
//! analysis, mock research, formatting and more) with parameters pulled out
//! of the message by regular expressions. Messages nothing matches go to a
//! completion service over HTTP when one is configured, and to canned
//! templates when it is not.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use switchboard::{AgentKind, AgentRegistry, SwitchboardConfig};
//!
//! #[tokio::main]
//! async fn main() -> switchboard::Result<()> {
//!     let registry = AgentRegistry::from_config(&SwitchboardConfig::default())?;
//!     let mut agent = registry.create(AgentKind::Tools);
//!
//!     let reply = agent.chat("calculate 15 * 8").await;
//!     assert!(reply.contains("120"));
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`intent`] - Ordered keyword rules and the classifier
//! - [`extract`] - Regex parameter extraction per intent
//! - [`tools`] - Tool functions and the static dispatch table
//! - [`llm`] - Completion clients and the fallback responder
//! - [`agents`] - Agent profiles, the coordinator and the registry
//! - [`memory`] - Conversation history
//! - [`cli`] - Command-line interface
//! - [`utils`] - Configuration and logging

/// Agents, profiles, coordinator and registry.
pub mod agents;
/// Command-line interface.
pub mod cli;
/// Parameter extraction.
pub mod extract;
/// Intent classification.
pub mod intent;
/// Completion clients and fallback replies.
pub mod llm;
/// Conversation history.
pub mod memory;
/// Built-in tools and the dispatch table.
pub mod tools;
/// Core types (turns, statuses, errors).
pub mod types;
/// Configuration and logging.
pub mod utils;

// Re-export commonly used types
pub use agents::{Agent, AgentKind, AgentRegistry};
pub use intent::Intent;
pub use llm::{LLMClient, Provider};
pub use tools::ToolResult;
pub use types::{AppError, Result};
pub use utils::toml_config::SwitchboardConfig;
