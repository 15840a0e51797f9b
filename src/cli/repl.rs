//! Interactive chat loop
//!
//! Reads one message per line from stdin. Lines starting with `/` are local
//! commands; `quit` or `exit` ends the session. Ctrl-C while an agent is
//! answering cancels the answer, at the prompt it ends the session.

use super::output::Output;
use crate::agents::Agent;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    History,
    Clear,
    Status,
    Ops,
    Unknown(String),
    Message(String),
}

impl ReplCommand {
    /// Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let command = match line.to_lowercase().as_str() {
            "quit" | "exit" | "/quit" | "/exit" => Self::Quit,
            "/help" => Self::Help,
            "/history" => Self::History,
            "/clear" => Self::Clear,
            "/status" => Self::Status,
            "/ops" => Self::Ops,
            other if other.starts_with('/') => Self::Unknown(line.to_string()),
            _ => Self::Message(line.to_string()),
        };
        Some(command)
    }
}

/// Send `text` to the agent, cancelling the reply on Ctrl-C.
pub async fn chat_interruptible(agent: &mut Agent, text: &str) -> String {
    let cancel = CancellationToken::new();
    let chat = agent.chat_with_cancel(text, &cancel);
    tokio::pin!(chat);

    loop {
        tokio::select! {
            reply = &mut chat => return reply,
            signal = tokio::signal::ctrl_c(), if !cancel.is_cancelled() => {
                if signal.is_ok() {
                    debug!("interrupt received, cancelling reply");
                    cancel.cancel();
                }
            }
        }
    }
}

/// Run the interactive loop until `quit`, end of input or Ctrl-C at the prompt.
pub async fn run(agent: &mut Agent, output: &Output) -> std::io::Result<()> {
    output.banner();
    output.info(&format!(
        "Chatting with the {} agent. Type /help for commands.",
        agent.profile().display_name
    ));
    output.newline();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        output.prompt(agent.kind().name());

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            output.newline();
            break;
        };

        let Some(command) = ReplCommand::parse(&line) else {
            continue;
        };

        match command {
            ReplCommand::Quit => break,
            ReplCommand::Help => print_help(output),
            ReplCommand::History => {
                if agent.history().is_empty() {
                    output.info("No messages yet");
                }
                for turn in agent.history() {
                    output.turn(turn);
                }
                output.newline();
            }
            ReplCommand::Clear => {
                agent.clear_history();
                output.success("Conversation cleared");
                output.newline();
            }
            ReplCommand::Status => {
                let status = agent.status();
                output.kv("agent", &status.agent_type);
                output.kv("ready", if status.ready { "yes" } else { "no" });
                output.kv("tools", &status.tool_count.to_string());
                output.kv("turns", &agent.history().len().to_string());
                output.kv(
                    "fallback",
                    if agent.has_completion_client() {
                        "language model"
                    } else {
                        "templates"
                    },
                );
                output.newline();
            }
            ReplCommand::Ops => {
                if agent.operation_history().is_empty() {
                    output.info("No tool calls yet");
                }
                for op in agent.operation_history() {
                    let outcome = match op.error {
                        Some(kind) => format!("{} ({})", op.status, kind),
                        None => op.status.to_string(),
                    };
                    output.list_item(&format!(
                        "{} {} -> {} {}",
                        op.timestamp.format("%H:%M:%S"),
                        op.intent,
                        op.tool,
                        outcome
                    ));
                }
                output.newline();
            }
            ReplCommand::Unknown(cmd) => {
                output.warning(&format!("Unknown command: {}", cmd));
                output.hint("Type /help for commands");
            }
            ReplCommand::Message(text) => {
                let reply = chat_interruptible(agent, &text).await;
                output.reply(&reply);
            }
        }
    }

    output.info("Goodbye!");
    Ok(())
}

fn print_help(output: &Output) {
    output.subheader("Commands");
    output.kv("/history", "show the conversation");
    output.kv("/clear", "forget the conversation");
    output.kv("/status", "show agent status");
    output.kv("/ops", "show tool calls");
    output.kv("quit", "end the session");
    output.newline();
}
