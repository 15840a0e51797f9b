//! HTTP client for the supported completion services.
//!
//! One client speaks all four envelopes. Requests are shaped per provider,
//! answers are pulled out of the provider's response field, and every failure
//! is folded into a [`ProviderErrorKind`].

use super::client::{CompletionRequest, LLMClient, ModelConfig, Provider};
use crate::types::{AppError, ProviderErrorKind, Result, Role};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Client for Anthropic, Titan, OpenAI-compatible and Ollama endpoints
pub struct HttpLLMClient {
    http: Client,
    config: ModelConfig,
}

impl HttpLLMClient {
    /// Build a client with the configured request timeout
    pub fn new(config: ModelConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    /// Reuse an existing reqwest client
    pub fn with_client(http: Client, config: ModelConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}

/// URL the request for `provider` is posted to.
pub fn endpoint(provider: Provider, base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    match provider {
        Provider::Anthropic => format!("{}/v1/messages", base),
        Provider::Titan => base.to_string(),
        Provider::OpenAI => format!("{}/chat/completions", base),
        Provider::Ollama => format!("{}/api/chat", base),
    }
}

fn role_messages(request: &CompletionRequest) -> Vec<Value> {
    request
        .messages
        .iter()
        .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
        .collect()
}

/// Titan takes a single prompt string, so the conversation is flattened.
fn titan_prompt(request: &CompletionRequest) -> String {
    let mut prompt = String::new();
    if !request.system.is_empty() {
        prompt.push_str(&request.system);
        prompt.push_str("\n\n");
    }
    for message in &request.messages {
        let speaker = match message.role {
            Role::User => "User",
            Role::Assistant => "Bot",
        };
        prompt.push_str(&format!("{}: {}\n", speaker, message.content));
    }
    prompt.push_str("Bot:");
    prompt
}

/// JSON body for `provider`.
pub fn request_body(provider: Provider, model: &str, request: &CompletionRequest) -> Value {
    let params = request.params;
    match provider {
        Provider::Anthropic => json!({
            "model": model,
            "system": request.system,
            "messages": role_messages(request),
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
        }),
        Provider::Titan => json!({
            "inputText": titan_prompt(request),
            "textGenerationConfig": {
                "maxTokenCount": params.max_tokens,
                "temperature": params.temperature,
            },
        }),
        Provider::OpenAI => {
            let mut messages = vec![json!({ "role": "system", "content": request.system })];
            messages.extend(role_messages(request));
            json!({
                "model": model,
                "messages": messages,
                "max_tokens": params.max_tokens,
                "temperature": params.temperature,
            })
        }
        Provider::Ollama => {
            let mut messages = vec![json!({ "role": "system", "content": request.system })];
            messages.extend(role_messages(request));
            json!({
                "model": model,
                "messages": messages,
                "stream": false,
                "options": {
                    "temperature": params.temperature,
                    "num_predict": params.max_tokens,
                },
            })
        }
    }
}

/// Pull the answer text out of a provider response.
pub fn parse_completion(provider: Provider, body: &Value) -> Result<String> {
    let text = match provider {
        Provider::Anthropic => body["content"][0]["text"].as_str(),
        Provider::Titan => body["results"][0]["outputText"].as_str(),
        Provider::OpenAI => body["choices"][0]["message"]["content"].as_str(),
        Provider::Ollama => body["message"]["content"].as_str(),
    };
    text.map(|t| t.trim().to_string()).ok_or_else(|| {
        AppError::provider(
            ProviderErrorKind::MalformedResponse,
            format!("{} response is missing the completion text", provider),
        )
    })
}

/// Error kind for a non-success HTTP status.
pub fn status_kind(status: StatusCode) -> ProviderErrorKind {
    match status.as_u16() {
        401 | 403 => ProviderErrorKind::Auth,
        429 => ProviderErrorKind::Quota,
        408 | 504 => ProviderErrorKind::Timeout,
        _ => ProviderErrorKind::Transport,
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    let kind = if err.is_timeout() {
        ProviderErrorKind::Timeout
    } else {
        ProviderErrorKind::Transport
    };
    AppError::provider(kind, format!("HTTP request failed: {}", err))
}

#[async_trait]
impl LLMClient for HttpLLMClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let provider = self.config.provider;
        let url = endpoint(provider, &self.config.base_url);
        let body = request_body(provider, &self.config.model, request);

        debug!(provider = %provider, model = %self.config.model, url = %url, "sending completion request");

        let mut builder = self.http.post(&url).json(&body);
        if let Some(key) = self.config.api_key.as_deref() {
            builder = match provider {
                Provider::Anthropic => builder
                    .header("x-api-key", key)
                    .header("anthropic-version", ANTHROPIC_VERSION),
                _ => builder.bearer_auth(key),
            };
        }

        let response = builder.send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::provider(
                status_kind(status),
                format!("{} request failed ({}): {}", provider, status, text),
            ));
        }

        let json: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                transport_error(e)
            } else {
                AppError::provider(
                    ProviderErrorKind::MalformedResponse,
                    format!("Failed to parse {} response: {}", provider, e),
                )
            }
        })?;

        parse_completion(provider, &json)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn provider_name(&self) -> &str {
        self.config.provider.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::{ChatMessage, ModelParams};

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "be brief".to_string(),
            messages: vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")],
            params: ModelParams {
                temperature: 0.3,
                max_tokens: 200,
            },
        }
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(
            endpoint(Provider::Anthropic, "https://api.anthropic.com/"),
            "https://api.anthropic.com/v1/messages"
        );
        assert_eq!(
            endpoint(Provider::Ollama, "http://localhost:11434"),
            "http://localhost:11434/api/chat"
        );
        assert_eq!(
            endpoint(Provider::Titan, "http://bedrock.local/invoke"),
            "http://bedrock.local/invoke"
        );
    }

    #[test]
    fn test_openai_body_leads_with_system() {
        let body = request_body(Provider::OpenAI, "gpt-4o-mini", &request());
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][2]["content"], "hello");
        assert_eq!(body["max_tokens"], 200);
    }

    #[test]
    fn test_titan_body_is_flattened() {
        let body = request_body(Provider::Titan, "titan", &request());
        let input = body["inputText"].as_str().unwrap();
        assert!(input.starts_with("be brief\n\n"));
        assert!(input.ends_with("User: hi\nBot: hello\nBot:"));
        assert_eq!(body["textGenerationConfig"]["maxTokenCount"], 200);
    }

    #[test]
    fn test_parse_each_envelope() {
        let cases = [
            (Provider::Anthropic, json!({ "content": [{ "text": "a" }] })),
            (Provider::Titan, json!({ "results": [{ "outputText": " a\n" }] })),
            (Provider::OpenAI, json!({ "choices": [{ "message": { "content": "a" } }] })),
            (Provider::Ollama, json!({ "message": { "content": "a" } })),
        ];
        for (provider, body) in cases {
            assert_eq!(parse_completion(provider, &body).unwrap(), "a");
        }
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let err = parse_completion(Provider::OpenAI, &json!({ "choices": [] })).unwrap_err();
        assert!(matches!(
            err,
            AppError::Provider {
                kind: ProviderErrorKind::MalformedResponse,
                ..
            }
        ));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_kind(StatusCode::UNAUTHORIZED), ProviderErrorKind::Auth);
        assert_eq!(status_kind(StatusCode::FORBIDDEN), ProviderErrorKind::Auth);
        assert_eq!(
            status_kind(StatusCode::TOO_MANY_REQUESTS),
            ProviderErrorKind::Quota
        );
        assert_eq!(
            status_kind(StatusCode::GATEWAY_TIMEOUT),
            ProviderErrorKind::Timeout
        );
        assert_eq!(
            status_kind(StatusCode::INTERNAL_SERVER_ERROR),
            ProviderErrorKind::Transport
        );
    }
}
