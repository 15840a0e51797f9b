use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============= Conversation Types =============

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One entry of an agent's conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Snapshot returned by `Agent::status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub agent_type: String,
    pub ready: bool,
    pub tool_count: usize,
}

// ============= Error Types =============

/// Error categories surfaced on failed tool results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Parameter,
    ToolExecution,
    Security,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Parameter => "parameter",
            ErrorKind::ToolExecution => "tool_execution",
            ErrorKind::Security => "security",
        };
        f.write_str(s)
    }
}

/// Failure categories of the LLM completion service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    Timeout,
    Auth,
    Quota,
    MalformedResponse,
    Transport,
    Cancelled,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProviderErrorKind::Timeout => "timeout",
            ProviderErrorKind::Auth => "auth",
            ProviderErrorKind::Quota => "quota",
            ProviderErrorKind::MalformedResponse => "malformed_response",
            ProviderErrorKind::Transport => "transport",
            ProviderErrorKind::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Parameter error: {0}")]
    Parameter(String),

    #[error("Tool error: {0}")]
    ToolExecution(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error("Provider error ({kind}): {message}")]
    Provider {
        kind: ProviderErrorKind,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn provider(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        AppError::Provider {
            kind,
            message: message.into(),
        }
    }

    /// Category reported on a failed `ToolResult`.
    ///
    /// Missing files and IO failures are tool failures; provider and config
    /// errors never reach a tool result but fold into the same bucket.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Parameter(_) => ErrorKind::Parameter,
            AppError::Security(_) => ErrorKind::Security,
            _ => ErrorKind::ToolExecution,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(AppError::Parameter("x".into()).kind(), ErrorKind::Parameter);
        assert_eq!(AppError::Security("x".into()).kind(), ErrorKind::Security);
        assert_eq!(
            AppError::NotFound("x".into()).kind(),
            ErrorKind::ToolExecution
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(AppError::from(io).kind(), ErrorKind::ToolExecution);
    }

    #[test]
    fn test_provider_error_display() {
        let err = AppError::provider(ProviderErrorKind::Quota, "rate limited");
        assert_eq!(err.to_string(), "Provider error (quota): rate limited");
    }

    #[test]
    fn test_turn_constructors() {
        let turn = ConversationTurn::user("hi");
        assert_eq!(turn.role, Role::User);
        assert_eq!(ConversationTurn::assistant("ok").role.as_str(), "assistant");
    }
}
