//! End-to-end routing tests: classification, extraction and tool dispatch
//! through real agents, without a completion client.

mod common;

use rstest::rstest;
use switchboard::agents::AgentKind;
use switchboard::intent::Intent;
use switchboard::tools::ToolStatus;
use switchboard::types::{ErrorKind, Role};

// =============================================================================
// Classification
// =============================================================================

#[rstest]
#[case(AgentKind::Tools, "Calculate 15 * 8", Some(Intent::Calculate))]
#[case(AgentKind::Tools, "what's the weather in Paris", Some(Intent::Weather))]
#[case(AgentKind::Tools, "please list files", Some(Intent::ListDirectory))]
#[case(AgentKind::Tools, "hello there", None)]
#[case(AgentKind::FileManager, "ls", Some(Intent::ListDirectory))]
#[case(AgentKind::FileManager, "cat a.txt", Some(Intent::ReadFile))]
#[case(AgentKind::FileManager, "catalog my books", None)]
#[case(AgentKind::CustomTools, "hash: hello", Some(Intent::GenerateHash))]
#[case(AgentKind::CustomTools, "stats for 1, 2, 3", Some(Intent::SummaryStats))]
#[case(AgentKind::WebResearch, "Rust vs Go", Some(Intent::Compare))]
#[case(AgentKind::WebResearch, "canvas painting", None)]
#[case(AgentKind::Simple, "calculate 2 + 2", None)]
fn test_classification(
    #[case] kind: AgentKind,
    #[case] utterance: &str,
    #[case] expected: Option<Intent>,
) {
    assert_eq!(kind.profile().intents.classify(utterance), expected);
}

#[test]
fn test_classification_is_case_insensitive() {
    let table = &AgentKind::Tools.profile().intents;
    assert_eq!(table.classify("CALCULATE 1 + 1"), table.classify("calculate 1 + 1"));
}

// =============================================================================
// Tool dispatch through agents
// =============================================================================

#[tokio::test]
async fn test_tools_agent_calculates() {
    let dir = common::sandbox();
    let mut agent = common::registry_for(dir.path()).create(AgentKind::Tools);

    let reply = agent.chat("Calculate 15 * 8").await;
    assert!(reply.contains("120"), "unexpected reply: {reply}");

    let ops = agent.operation_history();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].intent, Intent::Calculate);
    assert_eq!(ops[0].status, ToolStatus::Success);
}

#[tokio::test]
async fn test_spoken_square_root() {
    let dir = common::sandbox();
    let mut agent = common::registry_for(dir.path()).create(AgentKind::Tools);

    let reply = agent.chat("calculate the square root of 144").await;
    assert!(reply.contains("12"), "unexpected reply: {reply}");
}

#[tokio::test]
async fn test_successful_operation_has_no_error() {
    let dir = common::sandbox();
    let mut agent = common::registry_for(dir.path()).create(AgentKind::Tools);

    agent.chat("calculate 2 + 2").await;
    let ops = agent.operation_history();
    assert_eq!(ops[0].status, ToolStatus::Success);
    assert!(ops[0].error.is_none());
}

#[tokio::test]
async fn test_file_manager_lists_sandbox() {
    let dir = common::sandbox();
    let mut agent = common::registry_for(dir.path()).create(AgentKind::FileManager);

    let reply = agent.chat("ls").await;
    assert!(reply.contains("a.txt"), "unexpected reply: {reply}");
    assert!(reply.contains("b/"), "unexpected reply: {reply}");
    assert!(reply.contains("notes.md"), "unexpected reply: {reply}");
}

#[tokio::test]
async fn test_file_manager_reads_file() {
    let dir = common::sandbox();
    let mut agent = common::registry_for(dir.path()).create(AgentKind::FileManager);

    let reply = agent.chat("read file a.txt").await;
    assert!(reply.contains("alpha"));
    assert!(reply.contains("gamma"));
}

#[tokio::test]
async fn test_sandbox_escape_is_rejected() {
    let dir = common::sandbox();
    let mut agent = common::registry_for(&dir.path().join("b")).create(AgentKind::FileManager);

    let reply = agent.chat("read file ../a.txt").await;
    assert!(reply.contains("outside the sandbox"), "unexpected reply: {reply}");
    assert!(!reply.contains("alpha"));

    let ops = agent.operation_history();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].status, ToolStatus::Failure);
    assert_eq!(ops[0].error, Some(ErrorKind::Security));
}

#[cfg(unix)]
#[tokio::test]
async fn test_listing_survives_dangling_symlink() {
    let dir = common::sandbox();
    std::os::unix::fs::symlink(dir.path().join("removed.txt"), dir.path().join("stale")).unwrap();
    let mut agent = common::registry_for(dir.path()).create(AgentKind::FileManager);

    let reply = agent.chat("ls").await;
    assert!(reply.contains("a.txt"), "unexpected reply: {reply}");
    assert!(reply.contains("stale"), "unexpected reply: {reply}");
    assert_eq!(agent.operation_history()[0].status, ToolStatus::Success);
}

#[cfg(unix)]
#[tokio::test]
async fn test_listing_does_not_follow_links_out_of_sandbox() {
    let dir = common::sandbox();
    let outside = tempfile::TempDir::new().unwrap();
    let target = outside.path().join("payroll.json");
    std::fs::write(&target, "x".repeat(12_400)).unwrap();
    std::os::unix::fs::symlink(&target, dir.path().join("link")).unwrap();
    let mut agent = common::registry_for(dir.path()).create(AgentKind::FileManager);

    let reply = agent.chat("ls -l").await;
    assert!(reply.contains("link@"), "unexpected reply: {reply}");
    assert!(!reply.contains("12.1 KB"), "unexpected reply: {reply}");
    assert!(!reply.contains("application/json"), "unexpected reply: {reply}");

    let reply = agent.chat("read file link").await;
    assert!(reply.contains("outside the sandbox"), "unexpected reply: {reply}");
}

#[tokio::test]
async fn test_deeply_nested_calculation_fails_cleanly() {
    let dir = common::sandbox();
    let mut agent = common::registry_for(dir.path()).create(AgentKind::Tools);

    for depth in [40, 1_000, 20_000] {
        let utterance = format!("calculate {}1{}", "(".repeat(depth), ")".repeat(depth));
        let reply = agent.chat(&utterance).await;
        assert!(reply.starts_with('❌'), "unexpected reply: {reply}");
    }

    let reply = agent.chat("calculate ((((2 + 3)))) * 2").await;
    assert!(reply.contains("= 10"), "unexpected reply: {reply}");

    let ops = agent.operation_history();
    assert_eq!(ops.len(), 4);
    assert_eq!(ops[0].error, Some(ErrorKind::ToolExecution));
    assert_eq!(ops[1].error, Some(ErrorKind::ToolExecution));
    assert_eq!(ops[2].error, Some(ErrorKind::ToolExecution));
    assert_eq!(ops[3].status, ToolStatus::Success);
}

#[tokio::test]
async fn test_missing_parameter_asks_for_clarification() {
    let dir = common::sandbox();
    let mut agent = common::registry_for(dir.path()).create(AgentKind::CustomTools);

    let reply = agent.chat("generate hash").await;
    assert_eq!(
        reply,
        switchboard::tools::registry::clarification(Intent::GenerateHash)
    );
}

#[tokio::test]
async fn test_hash_matches_known_digest() {
    let dir = common::sandbox();
    let mut agent = common::registry_for(dir.path()).create(AgentKind::CustomTools);

    let reply = agent.chat("generate hash \"hello\"").await;
    assert!(reply.contains("5d41402abc4b2a76b9719d911017c592"));
    assert!(reply.contains("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"));
}

#[tokio::test]
async fn test_research_compare() {
    let dir = common::sandbox();
    let mut agent = common::registry_for(dir.path()).create(AgentKind::WebResearch);

    let reply = agent.chat("compare Python vs JavaScript").await;
    assert!(reply.contains("Python"));
    assert!(reply.contains("JavaScript"));
    assert_eq!(agent.operation_history()[0].intent, Intent::Compare);
}

// =============================================================================
// Multi-agent coordination
// =============================================================================

#[tokio::test]
async fn test_multi_agent_runs_specialists_in_order() {
    let dir = common::sandbox();
    let mut agent = common::registry_for(dir.path()).create(AgentKind::MultiAgent);

    let reply = agent
        .chat("calculate 12 * 4 and analyze the text \"great product\" then format as a table")
        .await;

    let math = reply.find("Math Specialist Results").expect("math section");
    let text = reply.find("Text Analysis Specialist Results").expect("text section");
    let format = reply.find("Data Formatting Specialist Results").expect("format section");
    assert!(math < text && text < format, "sections out of order: {reply}");
    assert!(reply.contains("12 * 4 = **48**"));
}

// =============================================================================
// Fallback templates and history
// =============================================================================

#[tokio::test]
async fn test_simple_agent_template_replies() {
    let dir = common::sandbox();
    let mut agent = common::registry_for(dir.path()).create(AgentKind::Simple);
    let templates = AgentKind::Simple.profile().templates;

    assert_eq!(agent.chat("hello").await, templates.greeting);
    assert_eq!(agent.chat("how are you?").await, templates.wellbeing);
    assert_eq!(agent.chat("what's the capital of Peru").await, templates.capabilities);
    assert_eq!(agent.chat("bye").await, templates.farewell);
}

#[tokio::test]
async fn test_each_chat_appends_user_then_assistant() {
    let dir = common::sandbox();
    let mut agent = common::registry_for(dir.path()).create(AgentKind::Tools);

    agent.chat("hello").await;
    agent.chat("calculate 1 + 1").await;

    let history = agent.history();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "hello");
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[2].content, "calculate 1 + 1");
    assert_eq!(history[3].role, Role::Assistant);
}

#[tokio::test]
async fn test_tool_errors_still_record_turns() {
    let dir = common::sandbox();
    let mut agent = common::registry_for(dir.path()).create(AgentKind::Tools);

    let reply = agent.chat("calculate 1 / 0").await;
    assert!(reply.starts_with('❌'), "unexpected reply: {reply}");
    assert_eq!(agent.history().len(), 2);
    assert_eq!(agent.operation_history()[0].error, Some(ErrorKind::ToolExecution));
}
