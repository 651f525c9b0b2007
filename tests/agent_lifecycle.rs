// file: tests/agent_lifecycle.rs
// description: orchestrator agent state lifecycle tests

use context_agents::agents::AgentOrchestrator;
use context_agents::config::{AgentConfig, DocumentAiConfig, ReasoningConfig, StorageConfig};
use context_agents::services::{DocumentAiClient, DocumentStore, ReasoningClient};
use std::sync::Arc;

async fn local_orchestrator(dir: &tempfile::TempDir) -> AgentOrchestrator {
    let store = Arc::new(
        DocumentStore::new(StorageConfig {
            uri: dir.path().to_string_lossy().into_owned(),
            table_name: "documents".to_string(),
            embedding_api_key: None,
            embedding_model: "openai/gpt-oss-120b".to_string(),
            embedding_base_url: "https://api.groq.com/openai/v1".to_string(),
        })
        .await
        .expect("store should connect"),
    );

    let reasoning = Arc::new(ReasoningClient::new(ReasoningConfig {
        api_key: None,
        model: "llama-2-70b-chat".to_string(),
        base_url: "https://api.friendli.ai/serverless".to_string(),
        max_tokens: 1000,
        temperature: 0.7,
    }));

    let document_ai = Arc::new(DocumentAiClient::new(DocumentAiConfig {
        endpoint: None,
        min_entity_score: 0.7,
        max_text_chars: 5000,
    }));

    AgentOrchestrator::new(
        store,
        reasoning,
        document_ai,
        AgentConfig {
            retrieval_limit: 10,
            graph_node_limit: 100,
        },
    )
}

#[tokio::test]
async fn agents_start_uninitialized() {
    let dir = tempfile::tempdir().expect("tempdir");
    let orchestrator = local_orchestrator(&dir).await;

    let status = orchestrator.get_status().await;
    assert_eq!(status["orchestrator_status"], "initializing");
    assert_eq!(status["agents"]["PlannerAgent"], "not_initialized");
    assert_eq!(status["summary"]["ready"], 0);
}

#[tokio::test]
async fn initialize_marks_all_agents_ready() {
    let dir = tempfile::tempdir().expect("tempdir");
    let orchestrator = local_orchestrator(&dir).await;

    orchestrator.initialize().await;

    let status = orchestrator.get_status().await;
    assert_eq!(status["orchestrator_status"], "operational");
    assert_eq!(status["summary"]["ready"], 4);
    for agent in [
        "PlannerAgent",
        "RetrieverAgent",
        "AnalyzerAgent",
        "ReporterAgent",
    ] {
        assert_eq!(status["agents"][agent], "ready");
    }
}

#[tokio::test]
async fn reset_returns_agents_to_ready() {
    let dir = tempfile::tempdir().expect("tempdir");
    let orchestrator = local_orchestrator(&dir).await;

    orchestrator.initialize().await;
    orchestrator.reset().await;

    let status = orchestrator.get_status().await;
    assert_eq!(status["orchestrator_status"], "operational");
    assert_eq!(status["summary"]["ready"], 4);
}
