//! Conversational agents.
//!
//! An [`Agent`] couples a static [`AgentProfile`] with the shared extraction
//! rules, a tool context and a fallback responder. Each call to
//! [`Agent::chat`] classifies the utterance, extracts parameters, dispatches
//! the bound tool and records the exchange; utterances no rule matches go to
//! the fallback responder.

pub mod coordinator;
pub mod profiles;
pub mod registry;

use crate::extract::{Extractor, Params};
use crate::intent::Intent;
use crate::llm::FallbackResponder;
use crate::memory::ConversationHistory;
use crate::tools::{self, ToolContext, ToolResult, ToolStatus};
use crate::types::{AgentStatus, ConversationTurn, ErrorKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};
use uuid::Uuid;

pub use coordinator::Coordinator;
pub use profiles::{AgentKind, AgentProfile, Routing};
pub use registry::AgentRegistry;

/// One tool dispatch performed by an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub intent: Intent,
    pub tool: String,
    pub params: serde_json::Value,
    pub status: ToolStatus,
    pub error: Option<ErrorKind>,
    pub timestamp: DateTime<Utc>,
}

impl OperationRecord {
    pub fn new(intent: Intent, params: &Params, result: &ToolResult) -> Self {
        Self {
            intent,
            tool: tools::spec(intent).name.to_string(),
            params: params.to_json(),
            status: result.status,
            error: result.error,
            timestamp: Utc::now(),
        }
    }
}

/// Resources shared by every agent a registry builds
#[derive(Clone)]
pub struct AgentResources {
    pub extractor: Arc<Extractor>,
    pub tools: Arc<ToolContext>,
    pub coordinator: Arc<Coordinator>,
}

impl AgentResources {
    pub fn new(extractor: Extractor, tools: ToolContext, coordinator: Coordinator) -> Self {
        Self {
            extractor: Arc::new(extractor),
            tools: Arc::new(tools),
            coordinator: Arc::new(coordinator),
        }
    }
}

/// A conversational agent configured by a profile
pub struct Agent {
    session_id: Uuid,
    profile: &'static AgentProfile,
    resources: AgentResources,
    fallback: FallbackResponder,
    history: ConversationHistory,
    operations: Vec<OperationRecord>,
}

impl Agent {
    pub fn new(
        profile: &'static AgentProfile,
        resources: AgentResources,
        fallback: FallbackResponder,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            profile,
            resources,
            fallback,
            history: ConversationHistory::new(),
            operations: Vec::new(),
        }
    }

    pub fn kind(&self) -> AgentKind {
        self.profile.kind
    }

    pub fn profile(&self) -> &'static AgentProfile {
        self.profile
    }

    /// Identifies this agent's conversation in logs.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Respond to `utterance`. Always returns a message.
    pub async fn chat(&mut self, utterance: &str) -> String {
        self.chat_with_cancel(utterance, &CancellationToken::new())
            .await
    }

    /// Like [`Agent::chat`], but a completion call in flight is abandoned
    /// when `cancel` fires.
    #[instrument(skip(self, cancel), fields(agent = %self.profile.kind, session = %self.session_id))]
    pub async fn chat_with_cancel(&mut self, utterance: &str, cancel: &CancellationToken) -> String {
        let response = match self.route(utterance) {
            Some(response) => response,
            None => {
                debug!("no intent matched, using fallback");
                self.fallback
                    .respond(utterance, self.history.turns(), cancel)
                    .await
            }
        };

        self.history.record_exchange(utterance, &response);
        response
    }

    fn route(&mut self, utterance: &str) -> Option<String> {
        match self.profile.routing {
            Routing::Single => {
                let intent = self.profile.intents.classify(utterance)?;
                Some(self.run_intent(intent, utterance))
            }
            Routing::Coordinated => {
                let outcome = self.resources.coordinator.run(
                    &self.profile.intents,
                    &self.resources.tools,
                    utterance,
                )?;
                self.operations.extend(outcome.operations);
                Some(outcome.response)
            }
        }
    }

    fn run_intent(&mut self, intent: Intent, utterance: &str) -> String {
        let params = match self.resources.extractor.extract_for(intent, utterance) {
            Ok(params) => params,
            Err(err) => {
                info!(
                    intent = %intent,
                    error_kind = %err.kind(),
                    error = %err,
                    "parameter extraction failed"
                );
                return tools::registry::clarification(intent).to_string();
            }
        };

        let result = tools::dispatch(&self.resources.tools, intent, &params);
        self.operations
            .push(OperationRecord::new(intent, &params, &result));
        result.message
    }

    pub fn history(&self) -> &[ConversationTurn] {
        self.history.turns()
    }

    /// Forget the conversation and the operation log.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.operations.clear();
    }

    pub fn operation_history(&self) -> &[OperationRecord] {
        &self.operations
    }

    pub fn status(&self) -> AgentStatus {
        AgentStatus {
            agent_type: self.profile.kind.name().to_string(),
            ready: true,
            tool_count: self.profile.tool_count(),
        }
    }

    pub fn has_completion_client(&self) -> bool {
        self.fallback.has_client()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(kind: AgentKind) -> Agent {
        let resources = AgentResources::new(
            Extractor::new().unwrap(),
            ToolContext::new("."),
            Coordinator::new().unwrap(),
        );
        let profile = kind.profile();
        let fallback = FallbackResponder::new(profile.templates, profile.system_prompt);
        Agent::new(profile, resources, fallback)
    }

    #[tokio::test]
    async fn test_chat_appends_two_turns() {
        let mut agent = agent(AgentKind::Tools);
        agent.chat("calculate 2 + 2").await;
        agent.chat("hello").await;
        assert_eq!(agent.history().len(), 4);
        assert!(agent.history()[1].content.contains('4'));
    }

    #[tokio::test]
    async fn test_operations_recorded_and_cleared() {
        let mut agent = agent(AgentKind::Tools);
        agent.chat("calculate 6 * 7").await;
        let ops = agent.operation_history();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].intent, Intent::Calculate);
        assert_eq!(ops[0].tool, "calculator");
        assert_eq!(ops[0].status, ToolStatus::Success);

        agent.clear_history();
        assert!(agent.history().is_empty());
        assert!(agent.operation_history().is_empty());
    }

    #[test]
    fn test_agents_get_distinct_sessions() {
        assert_ne!(agent(AgentKind::Tools).session_id(), agent(AgentKind::Tools).session_id());
    }

    #[tokio::test]
    async fn test_fallback_does_not_record_operation() {
        let mut agent = agent(AgentKind::Simple);
        let reply = agent.chat("tell me something").await;
        assert_eq!(reply, AgentKind::Simple.profile().templates.capabilities);
        assert!(agent.operation_history().is_empty());
    }

    #[test]
    fn test_status() {
        let status = agent(AgentKind::FileManager).status();
        assert_eq!(status.agent_type, "file_manager");
        assert!(status.ready);
        assert_eq!(status.tool_count, 5);
    }
}
