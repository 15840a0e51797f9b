//! Fallback responses for utterances no intent rule matched.
//!
//! With a completion client configured the utterance goes to the model along
//! with a window of recent turns. Without one, small talk gets a canned reply
//! and everything else gets the agent's capability summary. Provider failures
//! never escape: they are logged and turned into a fixed apology chosen by
//! error kind.

use super::client::{CompletionRequest, LLMClient, ModelParams};
use crate::intent::{SmallTalk, SMALL_TALK};
use crate::memory::{clamp_window, truncate_history, DEFAULT_HISTORY_WINDOW};
use crate::types::{AppError, ConversationTurn, ProviderErrorKind, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Upper bound on a single completion call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Canned replies used when no completion client is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Templates {
    pub greeting: &'static str,
    pub wellbeing: &'static str,
    pub help: &'static str,
    pub farewell: &'static str,
    /// Returned for anything that is neither a tool request nor small talk
    pub capabilities: &'static str,
}

impl Templates {
    pub fn small_talk(&self, kind: SmallTalk) -> &'static str {
        match kind {
            SmallTalk::Greeting => self.greeting,
            SmallTalk::Wellbeing => self.wellbeing,
            SmallTalk::Help => self.help,
            SmallTalk::Farewell => self.farewell,
        }
    }

    /// Template reply for `utterance`.
    pub fn reply(&self, utterance: &str) -> &'static str {
        SMALL_TALK
            .classify(utterance)
            .map(|kind| self.small_talk(kind))
            .unwrap_or(self.capabilities)
    }
}

/// Fixed user-facing message for a failed completion.
pub fn apology(kind: ProviderErrorKind) -> &'static str {
    match kind {
        ProviderErrorKind::Timeout => {
            "⏱️ Sorry, the language model took too long to respond. Please try again."
        }
        ProviderErrorKind::Auth => {
            "🔑 Sorry, I couldn't authenticate with the language model service. Please check the configured API key."
        }
        ProviderErrorKind::Quota => {
            "⏳ Sorry, the language model service is rate limiting requests right now. Please try again shortly."
        }
        ProviderErrorKind::MalformedResponse => {
            "⚠️ Sorry, I received an unexpected response from the language model."
        }
        ProviderErrorKind::Transport => {
            "🔌 Sorry, I couldn't reach the language model service right now."
        }
        ProviderErrorKind::Cancelled => "🛑 Request cancelled.",
    }
}

fn provider_kind(err: &AppError) -> ProviderErrorKind {
    match err {
        AppError::Provider { kind, .. } => *kind,
        _ => ProviderErrorKind::Transport,
    }
}

/// Answers utterances that fell through intent classification
#[derive(Clone)]
pub struct FallbackResponder {
    client: Option<Arc<dyn LLMClient>>,
    system_prompt: String,
    params: ModelParams,
    templates: Templates,
    history_window: usize,
    timeout: Duration,
}

impl FallbackResponder {
    /// Template-only responder.
    pub fn new(templates: Templates, system_prompt: impl Into<String>) -> Self {
        Self {
            client: None,
            system_prompt: system_prompt.into(),
            params: ModelParams::default(),
            templates,
            history_window: DEFAULT_HISTORY_WINDOW,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_client(mut self, client: Arc<dyn LLMClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_params(mut self, params: ModelParams) -> Self {
        self.params = params;
        self
    }

    /// Number of prior turns sent as context, clamped to 6..=10.
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = clamp_window(window);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    pub fn params(&self) -> ModelParams {
        self.params
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// Produce a reply. Never fails.
    pub async fn respond(
        &self,
        utterance: &str,
        history: &[ConversationTurn],
        cancel: &CancellationToken,
    ) -> String {
        let client = match self.client.as_ref() {
            Some(client) => client,
            None => return self.templates.reply(utterance).to_string(),
        };

        match self.complete(client.as_ref(), utterance, history, cancel).await {
            Ok(text) => text,
            Err(err) => {
                let kind = provider_kind(&err);
                warn!(
                    provider = client.provider_name(),
                    model = client.model_name(),
                    error_kind = %kind,
                    error = %err,
                    "completion failed"
                );
                apology(kind).to_string()
            }
        }
    }

    async fn complete(
        &self,
        client: &dyn LLMClient,
        utterance: &str,
        history: &[ConversationTurn],
        cancel: &CancellationToken,
    ) -> Result<String> {
        let context = truncate_history(history, self.history_window);
        let request =
            CompletionRequest::new(self.system_prompt.as_str(), context, utterance, self.params);
        debug!(
            provider = client.provider_name(),
            context_turns = context.len(),
            "falling back to completion service"
        );

        let text = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(AppError::provider(ProviderErrorKind::Cancelled, "request cancelled"));
            }
            outcome = tokio::time::timeout(self.timeout, client.complete(&request)) => match outcome {
                Ok(result) => result?,
                Err(_) => {
                    return Err(AppError::provider(
                        ProviderErrorKind::Timeout,
                        format!("no response within {:?}", self.timeout),
                    ));
                }
            },
        };

        if text.trim().is_empty() {
            return Err(AppError::provider(
                ProviderErrorKind::MalformedResponse,
                "empty completion",
            ));
        }
        Ok(text)
    }
}
