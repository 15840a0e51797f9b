use super::{Agent, AgentKind, AgentResources, Coordinator};
use crate::extract::Extractor;
use crate::llm::{FallbackResponder, LLMClient, DEFAULT_TIMEOUT};
use crate::tools::ToolContext;
use crate::types::{AgentStatus, Result};
use crate::utils::toml_config::{ProviderConfig, SwitchboardConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Builds agents that share one set of compiled rules, one tool context and
/// at most one completion client.
pub struct AgentRegistry {
    resources: AgentResources,
    client: Option<Arc<dyn LLMClient>>,
    provider: Option<ProviderConfig>,
    history_window: usize,
    default_kind: AgentKind,
}

impl AgentRegistry {
    /// Create a registry from loaded configuration
    pub fn from_config(config: &SwitchboardConfig) -> Result<Self> {
        let tools = ToolContext::new(config.sandbox.root.clone())
            .with_max_file_bytes(config.sandbox.max_file_bytes)
            .with_read_max_lines(config.sandbox.read_max_lines);
        let resources = AgentResources::new(Extractor::new()?, tools, Coordinator::new()?);

        let client = match config.model_config()? {
            Some(model) => {
                info!(provider = %model.provider, model = %model.model, "completion provider configured");
                Some(model.create_client()?)
            }
            None => None,
        };

        Ok(Self {
            resources,
            client,
            provider: config.provider.clone(),
            history_window: config.history.window,
            default_kind: config.agent.kind,
        })
    }

    /// Replace the completion client, e.g. with a mock.
    pub fn with_client(mut self, client: Arc<dyn LLMClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn default_kind(&self) -> AgentKind {
        self.default_kind
    }

    pub fn kinds(&self) -> &'static [AgentKind] {
        &AgentKind::ALL
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    pub fn tools(&self) -> &ToolContext {
        &self.resources.tools
    }

    /// A fresh agent of `kind` with an empty history.
    pub fn create(&self, kind: AgentKind) -> Agent {
        let profile = kind.profile();
        let params = self
            .provider
            .as_ref()
            .map(|p| p.params_for(profile.params))
            .unwrap_or(profile.params);
        let timeout = self
            .provider
            .as_ref()
            .map(ProviderConfig::timeout)
            .unwrap_or(DEFAULT_TIMEOUT);

        let mut fallback = FallbackResponder::new(profile.templates, profile.system_prompt)
            .with_params(params)
            .with_history_window(self.history_window)
            .with_timeout(timeout);
        if let Some(client) = &self.client {
            fallback = fallback.with_client(Arc::clone(client));
        }

        Agent::new(profile, self.resources.clone(), fallback)
    }

    pub fn create_default(&self) -> Agent {
        self.create(self.default_kind)
    }

    /// Status of a fresh agent of every kind.
    pub fn statuses(&self) -> Vec<AgentStatus> {
        AgentKind::ALL
            .iter()
            .map(|kind| self.create(*kind).status())
            .collect()
    }

    /// Timeout applied to completion calls.
    pub fn timeout(&self) -> Duration {
        self.provider
            .as_ref()
            .map(ProviderConfig::timeout)
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}
