// file: src/agents/orchestrator.rs
// description: orchestrator driving the fixed four-agent workflow
// reference: internal agent pipeline

use crate::agents::analyzer::AnalyzerAgent;
use crate::agents::planner::PlannerAgent;
use crate::agents::reporter::ReporterAgent;
use crate::agents::retriever::RetrieverAgent;
use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::models::{AgentState, WorkflowMetadata, WorkflowResult};
use crate::services::{DocumentAiClient, DocumentStore, ReasoningClient};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{error, info};

pub const AGENT_NAMES: [&str; 4] = [
    "PlannerAgent",
    "RetrieverAgent",
    "AnalyzerAgent",
    "ReporterAgent",
];

pub struct AgentOrchestrator {
    planner: PlannerAgent,
    retriever: RetrieverAgent,
    analyzer: AnalyzerAgent,
    reporter: ReporterAgent,
    config: AgentConfig,
    status: RwLock<BTreeMap<&'static str, AgentState>>,
}

impl AgentOrchestrator {
    pub fn new(
        store: Arc<DocumentStore>,
        reasoning: Arc<ReasoningClient>,
        document_ai: Arc<DocumentAiClient>,
        config: AgentConfig,
    ) -> Self {
        let status = AGENT_NAMES
            .iter()
            .map(|name| (*name, AgentState::NotInitialized))
            .collect();

        Self {
            planner: PlannerAgent::new(reasoning.clone()),
            retriever: RetrieverAgent::new(store, reasoning.clone()),
            analyzer: AnalyzerAgent::new(reasoning.clone(), document_ai),
            reporter: ReporterAgent::new(reasoning),
            config,
            status: RwLock::new(status),
        }
    }

    /// Mark every agent ready. Called once the backing services are wired up.
    pub async fn initialize(&self) {
        let mut status = self.status.write().await;
        for name in AGENT_NAMES {
            status.insert(name, AgentState::Ready);
            info!("{} initialized", name);
        }
    }

    /// Run the full Planner -> Retriever -> Analyzer -> Reporter workflow.
    ///
    /// On failure the erroring agent and everything after it is marked
    /// failed; completed agents keep their state for status reporting.
    pub async fn process_query(&self, query: &str) -> Result<WorkflowResult> {
        let started = Instant::now();
        info!("Starting agent workflow for query");

        let result = self.run_workflow(query, started).await;

        if result.is_err() {
            let mut status = self.status.write().await;
            for name in AGENT_NAMES {
                if status.get(name) != Some(&AgentState::Completed) {
                    status.insert(name, AgentState::Failed);
                }
            }
            error!("Agent workflow failed");
        }

        result
    }

    async fn run_workflow(&self, query: &str, started: Instant) -> Result<WorkflowResult> {
        let planning_results = self
            .planner
            .process_query(query)
            .await
            .map_err(|e| workflow_error("PlannerAgent", e))?;
        self.mark_completed("PlannerAgent").await;

        let retrieval_results = self
            .retriever
            .retrieve_documents(query, self.config.retrieval_limit)
            .await
            .map_err(|e| workflow_error("RetrieverAgent", e))?;
        self.mark_completed("RetrieverAgent").await;

        let analysis_results = self
            .analyzer
            .analyze_documents(query, &retrieval_results.documents)
            .await
            .map_err(|e| workflow_error("AnalyzerAgent", e))?;
        self.mark_completed("AnalyzerAgent").await;

        let final_report = self
            .reporter
            .generate_report(&planning_results, &retrieval_results, &analysis_results, query)
            .await
            .map_err(|e| workflow_error("ReporterAgent", e))?;
        self.mark_completed("ReporterAgent").await;

        let duration = started.elapsed().as_secs_f64();
        info!("Agent workflow completed in {:.2}s", duration);

        let agent_status = self.snapshot_status().await;
        let agents_completed = agent_status
            .values()
            .filter(|state| **state == AgentState::Completed)
            .count();

        Ok(WorkflowResult {
            query: query.to_string(),
            workflow_status: "completed".to_string(),
            planning_results,
            retrieval_results,
            workflow_metadata: WorkflowMetadata {
                total_agents: AGENT_NAMES.len(),
                agents_completed,
                workflow_duration_secs: duration,
                confidence_score: final_report.report_metadata.confidence_score,
            },
            analysis_results,
            final_report,
            agent_status,
        })
    }

    async fn mark_completed(&self, name: &'static str) {
        self.status.write().await.insert(name, AgentState::Completed);
    }

    async fn snapshot_status(&self) -> BTreeMap<String, AgentState> {
        self.status
            .read()
            .await
            .iter()
            .map(|(name, state)| (name.to_string(), *state))
            .collect()
    }

    /// Status summary for the /agents/status endpoint.
    pub async fn get_status(&self) -> Value {
        let status = self.status.read().await;

        let ready = status
            .values()
            .filter(|s| **s == AgentState::Ready)
            .count();
        let completed = status
            .values()
            .filter(|s| **s == AgentState::Completed)
            .count();
        let failed = status
            .values()
            .filter(|s| **s == AgentState::Failed)
            .count();
        let uninitialized = status
            .values()
            .filter(|s| **s == AgentState::NotInitialized)
            .count();

        let agents: BTreeMap<String, AgentState> = status
            .iter()
            .map(|(name, state)| (name.to_string(), *state))
            .collect();

        let orchestrator_status = if failed > 0 {
            "degraded"
        } else if uninitialized > 0 {
            "initializing"
        } else {
            "operational"
        };

        json!({
            "orchestrator_status": orchestrator_status,
            "agents": agents,
            "summary": {
                "total": AGENT_NAMES.len(),
                "ready": ready,
                "completed": completed,
                "failed": failed,
            }
        })
    }

    /// Reset all agents back to ready, clearing completion and failure.
    pub async fn reset(&self) {
        let mut status = self.status.write().await;
        for name in AGENT_NAMES {
            status.insert(name, AgentState::Ready);
        }
        info!("Agent orchestrator reset");
    }
}

fn workflow_error(agent: &str, source: AgentError) -> AgentError {
    AgentError::Workflow {
        agent: agent.to_string(),
        message: source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_names_order() {
        assert_eq!(AGENT_NAMES[0], "PlannerAgent");
        assert_eq!(AGENT_NAMES[3], "ReporterAgent");
    }

    #[test]
    fn test_workflow_error_wraps_agent() {
        let err = workflow_error("RetrieverAgent", AgentError::Storage("down".to_string()));
        match err {
            AgentError::Workflow { agent, message } => {
                assert_eq!(agent, "RetrieverAgent");
                assert!(message.contains("down"));
            }
            _ => panic!("expected workflow error"),
        }
    }
}
