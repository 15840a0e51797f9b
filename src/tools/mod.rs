//! Built-in Tools for Agent Capabilities
//!
//! Every [`Intent`](crate::intent::Intent) maps to exactly one tool function
//! through the static table in [`registry`]. Tools are plain functions with a
//! fixed signature:
//!
//! ```ignore
//! fn run(ctx: &ToolContext, params: &Params) -> Result<ToolOutput>
//! ```
//!
//! They return errors through `?` like any other code in the crate, and the
//! dispatcher converts those errors into a failed [`ToolResult`]. A caller of
//! [`dispatch`] therefore always gets a result back, never an error.
//!
//! # Module Structure
//!
//! - [`calculator`] - Restricted arithmetic grammar
//! - [`files`] - Sandboxed directory and file inspection
//! - [`text`] - Text metrics, keywords, statistics, CSV and hashing
//! - [`search`] - Mock web search, research synthesis, comparison and trends
//! - [`weather`] - Mock weather report
//! - [`format`] - JSON, table and list rendering
//! - [`registry`] - Intent to tool table and the dispatcher

/// Calculator tool for arithmetic expressions.
pub mod calculator;
/// Sandboxed file system tools.
pub mod files;
/// Data formatting tool.
pub mod format;
/// Static tool table and dispatcher.
pub mod registry;
/// Mock research tools.
pub mod search;
/// Text and data analysis tools.
pub mod text;
/// Mock weather tool.
pub mod weather;

pub use registry::{dispatch, spec, ToolSpec};

use crate::types::{AppError, ErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Default size threshold for reading files (1 MiB)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1024 * 1024;

/// Default number of lines shown by `read_file`
pub const DEFAULT_READ_MAX_LINES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Failure,
}

impl std::fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolStatus::Success => write!(f, "success"),
            ToolStatus::Failure => write!(f, "failure"),
        }
    }
}

/// Outcome of a single tool invocation.
///
/// `message` is what a user sees; `value` carries the structured payload
/// for callers that need the data rather than the prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub status: ToolStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub message: String,
}

impl ToolResult {
    pub fn success(value: Value, message: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Success,
            error: None,
            value: Some(value),
            message: message.into(),
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Failure,
            error: Some(kind),
            value: None,
            message: message.into(),
        }
    }

    pub fn from_error(err: &AppError) -> Self {
        let message = match err {
            AppError::Parameter(m)
            | AppError::ToolExecution(m)
            | AppError::Security(m)
            | AppError::NotFound(m) => format!("❌ {m}"),
            other => format!("❌ {other}"),
        };
        Self::failure(err.kind(), message)
    }

    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }
}

/// What a tool function produces on success.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub value: Value,
    pub message: String,
}

impl ToolOutput {
    pub fn new(value: Value, message: impl Into<String>) -> Self {
        Self {
            value,
            message: message.into(),
        }
    }
}

impl From<ToolOutput> for ToolResult {
    fn from(out: ToolOutput) -> Self {
        ToolResult::success(out.value, out.message)
    }
}

/// Runtime configuration handed to every tool call.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub sandbox: files::Sandbox,
    pub max_file_bytes: u64,
    pub read_max_lines: usize,
}

impl ToolContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            sandbox: files::Sandbox::new(root),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            read_max_lines: DEFAULT_READ_MAX_LINES,
        }
    }

    pub fn with_max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }

    pub fn with_read_max_lines(mut self, lines: usize) -> Self {
        self.read_max_lines = lines;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_from_error_keeps_kind() {
        let result = ToolResult::from_error(&AppError::Security("outside sandbox".into()));
        assert_eq!(result.status, ToolStatus::Failure);
        assert_eq!(result.error, Some(ErrorKind::Security));
        assert!(result.value.is_none());
        assert_eq!(result.message, "❌ outside sandbox");
    }

    #[test]
    fn test_success_serializes_without_error() {
        let result = ToolResult::success(json!({"result": 4}), "4");
        let encoded = serde_json::to_value(&result).unwrap();
        assert_eq!(encoded["status"], "success");
        assert!(encoded.get("error").is_none());
        assert_eq!(encoded["value"]["result"], 4);
    }

    #[test]
    fn test_context_builders() {
        let ctx = ToolContext::new("/tmp")
            .with_max_file_bytes(10)
            .with_read_max_lines(3);
        assert_eq!(ctx.max_file_bytes, 10);
        assert_eq!(ctx.read_max_lines, 3);
    }
}
