use crate::types::{AppError, ConversationTurn, Result, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Model sampling parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

/// A single message sent to the completion service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl From<&ConversationTurn> for ChatMessage {
    fn from(turn: &ConversationTurn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

/// Provider-neutral completion request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub system: String,
    /// Prior turns followed by the current utterance
    pub messages: Vec<ChatMessage>,
    pub params: ModelParams,
}

impl CompletionRequest {
    /// Build a request from a system prompt, the recent history and the new
    /// utterance, which always comes last.
    pub fn new(
        system: impl Into<String>,
        history: &[ConversationTurn],
        utterance: &str,
        params: ModelParams,
    ) -> Self {
        let mut messages: Vec<ChatMessage> = history.iter().map(ChatMessage::from).collect();
        messages.push(ChatMessage::user(utterance));
        Self {
            system: system.into(),
            messages,
            params,
        }
    }
}

/// Generic trait for LLM clients
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Send a completion request and return the assistant's text
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;

    /// Get the provider family name
    fn provider_name(&self) -> &str;
}

/// Completion service families with their own wire envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Anthropic,
    Titan,
    #[serde(rename = "openai")]
    OpenAI,
    Ollama,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::Titan => "titan",
            Provider::OpenAI => "openai",
            Provider::Ollama => "ollama",
        }
    }

    /// Base URL used when none is configured.
    ///
    /// Titan endpoints are deployment specific, so there is no default.
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Provider::Anthropic => Some("https://api.anthropic.com"),
            Provider::Titan => None,
            Provider::OpenAI => Some("https://api.openai.com/v1"),
            Provider::Ollama => Some("http://localhost:11434"),
        }
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, Provider::Anthropic | Provider::OpenAI)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" => Ok(Provider::Anthropic),
            "titan" => Ok(Provider::Titan),
            "openai" => Ok(Provider::OpenAI),
            "ollama" => Ok(Provider::Ollama),
            other => Err(AppError::Config(format!(
                "Unknown provider '{other}' (expected anthropic, titan, openai or ollama)"
            ))),
        }
    }
}

/// Everything needed to talk to one model
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub provider: Provider,
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl ModelConfig {
    /// Create a client instance for this configuration
    ///
    /// # Errors
    ///
    /// Returns a config error when the HTTP client cannot be built.
    pub fn create_client(&self) -> Result<Arc<dyn LLMClient>> {
        Ok(Arc::new(super::http::HttpLLMClient::new(self.clone())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_puts_utterance_last() {
        let history = vec![
            ConversationTurn::user("hi"),
            ConversationTurn::assistant("hello"),
        ];
        let req = CompletionRequest::new("sys", &history, "next", ModelParams::default());
        assert_eq!(req.messages.len(), 3);
        assert_eq!(req.messages[2], ChatMessage::user("next"));
        assert_eq!(req.messages[1].role, Role::Assistant);
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAI);
        assert_eq!("titan".parse::<Provider>().unwrap(), Provider::Titan);
        assert!("bedrock".parse::<Provider>().is_err());
    }

    #[test]
    fn test_provider_serde_names() {
        let p: Provider = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(p, Provider::OpenAI);
        assert_eq!(serde_json::to_string(&Provider::Ollama).unwrap(), "\"ollama\"");
    }

    #[test]
    fn test_titan_has_no_default_endpoint() {
        assert!(Provider::Titan.default_base_url().is_none());
        assert!(Provider::Ollama.default_base_url().is_some());
    }
}
