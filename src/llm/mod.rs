//! LLM completion clients and the fallback bridge.
//!
//! The rest of the crate only sees the [`LLMClient`] trait. [`HttpLLMClient`]
//! implements it for four provider families (Anthropic, Titan,
//! OpenAI-compatible and Ollama) and normalizes their envelopes into a single
//! string. [`FallbackResponder`] decides what an agent says when no intent
//! matched: a completion when a client is configured, a template otherwise.
//!
//! # Example
//!
//! ```ignore
//! use switchboard::llm::{FallbackResponder, ModelConfig, Provider};
//!
//! let client = config.create_client()?;
//! let responder = FallbackResponder::new(templates, "You are helpful.").with_client(client);
//! let reply = responder.respond("tell me a joke", &[], &cancel).await;
//! ```

/// Fallback responder, templates and apology messages.
pub mod bridge;
/// Core LLM client trait and request types.
pub mod client;
/// reqwest-based client for every provider family.
pub mod http;

pub use bridge::{apology, FallbackResponder, Templates, DEFAULT_TIMEOUT};
pub use client::{ChatMessage, CompletionRequest, LLMClient, ModelConfig, ModelParams, Provider};
pub use http::HttpLLMClient;
