//! Agent and registry tests with a mocked completion client.

mod common;

use common::mocks::MockLLMClient;
use std::time::Duration;
use switchboard::agents::AgentKind;
use switchboard::llm::apology;
use switchboard::types::{ProviderErrorKind, Role};
use switchboard::SwitchboardConfig;
use switchboard::{AgentRegistry, AppError};
use tempfile::TempDir;

#[tokio::test]
async fn test_unmatched_utterance_goes_to_client() {
    let dir = common::sandbox();
    let mock = MockLLMClient::new("Paris is the capital of France.");
    let registry = common::registry_for(dir.path()).with_client(mock.clone().into_arc());
    let mut agent = registry.create(AgentKind::Tools);

    let reply = agent.chat("what is the capital of France?").await;
    assert_eq!(reply, "Paris is the capital of France.");

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].system, AgentKind::Tools.profile().system_prompt);
    assert_eq!(requests[0].messages.len(), 1);
    assert!(agent.operation_history().is_empty());
}

#[tokio::test]
async fn test_tool_requests_never_reach_client() {
    let dir = common::sandbox();
    let mock = MockLLMClient::new("should not be used");
    let registry = common::registry_for(dir.path()).with_client(mock.clone().into_arc());
    let mut agent = registry.create(AgentKind::Tools);

    let reply = agent.chat("calculate 6 * 7").await;
    assert!(reply.contains("42"));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_client_sees_prior_turns() {
    let dir = common::sandbox();
    let mock = MockLLMClient::new("noted");
    let registry = common::registry_for(dir.path()).with_client(mock.clone().into_arc());
    let mut agent = registry.create(AgentKind::Simple);

    agent.chat("my name is Sam").await;
    agent.chat("what is my name?").await;

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    let second = &requests[1].messages;
    assert_eq!(second.len(), 3);
    assert_eq!(second[0].role, Role::User);
    assert_eq!(second[0].content, "my name is Sam");
    assert_eq!(second[1].role, Role::Assistant);
    assert_eq!(second[2].content, "what is my name?");
}

#[tokio::test]
async fn test_provider_failure_becomes_apology() {
    let dir = common::sandbox();
    let registry = common::registry_for(dir.path())
        .with_client(MockLLMClient::failing(ProviderErrorKind::Auth).into_arc());
    let mut agent = registry.create(AgentKind::WebResearch);

    let reply = agent.chat("tell me a story").await;
    assert_eq!(reply, apology(ProviderErrorKind::Auth));
    assert_eq!(agent.history().len(), 2);
    assert_eq!(agent.history()[1].content, reply);
}

#[tokio::test]
async fn test_empty_completion_is_malformed() {
    let dir = common::sandbox();
    let registry = common::registry_for(dir.path()).with_client(MockLLMClient::new("  ").into_arc());
    let mut agent = registry.create(AgentKind::Simple);

    let reply = agent.chat("anything").await;
    assert_eq!(reply, apology(ProviderErrorKind::MalformedResponse));
}

#[tokio::test]
async fn test_cancelled_chat_returns_cancel_message() {
    let dir = common::sandbox();
    let registry = common::registry_for(dir.path()).with_client(
        MockLLMClient::new("late")
            .with_delay(Duration::from_secs(5))
            .into_arc(),
    );
    let mut agent = registry.create(AgentKind::Simple);

    let cancel = tokio_util::sync::CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let reply = agent.chat_with_cancel("slow question", &cancel).await;
    assert_eq!(reply, apology(ProviderErrorKind::Cancelled));
    assert_eq!(agent.history().len(), 2);
}

#[tokio::test]
async fn test_agents_do_not_share_history() {
    let dir = common::sandbox();
    let registry = common::registry_for(dir.path());
    let mut first = registry.create(AgentKind::Tools);
    let second = registry.create(AgentKind::Tools);

    first.chat("calculate 1 + 1").await;
    assert_eq!(first.history().len(), 2);
    assert!(second.history().is_empty());
    assert_ne!(first.session_id(), second.session_id());
}

#[test]
fn test_registry_statuses() {
    let dir = common::sandbox();
    let registry = common::registry_for(dir.path());
    let statuses = registry.statuses();

    let names: Vec<&str> = statuses.iter().map(|s| s.agent_type.as_str()).collect();
    assert_eq!(
        names,
        [
            "simple",
            "tools",
            "custom_tools",
            "web_research",
            "file_manager",
            "multi_agent"
        ]
    );
    assert!(statuses.iter().all(|s| s.ready));
    assert_eq!(statuses[1].tool_count, 5);
}

#[test]
fn test_registry_from_toml_with_overrides() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("switchboard.toml");
    std::fs::write(
        &path,
        format!(
            r#"
[agent]
kind = "file_manager"

[sandbox]
root = "{}"

[history]
window = 6
"#,
            dir.path().display().to_string().replace('\\', "\\\\")
        ),
    )
    .unwrap();

    let config = SwitchboardConfig::load(&path).unwrap();
    let registry = AgentRegistry::from_config(&config).unwrap();
    assert_eq!(registry.default_kind(), AgentKind::FileManager);
    assert_eq!(registry.create_default().kind(), AgentKind::FileManager);
    assert!(!registry.has_client());
}

#[test]
fn test_registry_rejects_missing_api_key_env() {
    let mut config = common::config_for(std::path::Path::new("."));
    config.provider = toml::from_str(
        r#"
kind = "openai"
model = "gpt-4o-mini"
api_key_env = "SWITCHBOARD_TEST_DEFINITELY_UNSET_KEY"
"#,
    )
    .ok();
    assert!(config.provider.is_some());

    let err = AgentRegistry::from_config(&config).err().expect("missing key should fail");
    assert!(matches!(err, AppError::Config(_)));
}

#[tokio::test]
async fn test_provider_overrides_reach_request_params() {
    let dir = common::sandbox();
    let mut config = common::config_for(dir.path());
    config.provider = toml::from_str(
        r#"
kind = "ollama"
model = "llama3"
temperature = 0.1
"#,
    )
    .ok();
    assert!(config.provider.is_some());

    let mock = MockLLMClient::new("ok");
    let registry = AgentRegistry::from_config(&config)
        .unwrap()
        .with_client(mock.clone().into_arc());
    let mut agent = registry.create(AgentKind::WebResearch);
    agent.chat("tell me something").await;

    let requests = mock.requests();
    assert_eq!(requests[0].params.temperature, 0.1);
    assert_eq!(
        requests[0].params.max_tokens,
        AgentKind::WebResearch.profile().params.max_tokens
    );
}
