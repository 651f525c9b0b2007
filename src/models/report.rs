// file: src/models/report.rs
// description: workflow result structures produced by the agent pipeline
// reference: internal data structures

use crate::models::document::RetrievedDocument;
use crate::models::graph::{GraphEdge, GraphNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle state of an agent within the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    NotInitialized,
    Ready,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentAnalysis {
    pub intent: String,
    pub complexity: String,
    pub needs_retrieval: bool,
    pub needs_analysis: bool,
    pub needs_summarization: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_analysis: Option<String>,
}

impl Default for IntentAnalysis {
    fn default() -> Self {
        Self {
            intent: "general_query".to_string(),
            complexity: "moderate".to_string(),
            needs_retrieval: true,
            needs_analysis: true,
            needs_summarization: true,
            raw_analysis: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStep {
    pub step: u32,
    pub agent: String,
    pub action: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowPlan {
    pub steps: Vec<PlanStep>,
    pub estimated_complexity: String,
    pub expected_output_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningResults {
    pub query: String,
    pub intent_analysis: IntentAnalysis,
    pub workflow_plan: WorkflowPlan,
    pub next_agents: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalMetadata {
    pub search_strategy: String,
    pub ranking_method: String,
    pub filtering_applied: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResults {
    pub query: String,
    pub documents_found: usize,
    pub documents_returned: usize,
    pub documents: Vec<RetrievedDocument>,
    pub retrieval_summary: String,
    pub retrieval_metadata: RetrievalMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub analysis_text: String,
    pub documents_processed: usize,
    pub analysis_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityAnalysis {
    pub total_entities: usize,
    pub unique_entities: usize,
    pub top_entities: Vec<(String, usize)>,
    pub entity_extraction_method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningResults {
    pub reasoning_text: String,
    pub reasoning_type: String,
    pub confidence_level: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternResults {
    pub document_type_distribution: BTreeMap<String, usize>,
    pub entity_patterns: Vec<(String, usize)>,
    pub pattern_analysis_method: String,
    pub total_patterns_identified: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub analysis_method: String,
    pub tools_used: Vec<String>,
    pub confidence_score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub query: String,
    pub documents_analyzed: usize,
    pub document_analysis: DocumentAnalysis,
    pub entity_analysis: EntityAnalysis,
    pub reasoning_results: ReasoningResults,
    pub pattern_results: PatternResults,
    pub analysis_metadata: AnalysisMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub query: String,
    pub documents_analyzed: usize,
    pub key_findings: Vec<String>,
    pub confidence_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub document_analysis: DocumentAnalysis,
    pub entity_analysis: EntityAnalysis,
    pub reasoning_results: ReasoningResults,
    pub pattern_results: PatternResults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsAndRecommendations {
    pub primary_insights: Vec<String>,
    pub actionable_recommendations: Vec<String>,
    pub compliance_considerations: Vec<String>,
    pub risk_assessment: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportingEvidence {
    pub source_documents: Vec<RetrievedDocument>,
    pub entity_evidence: Vec<(String, usize)>,
    pub pattern_evidence: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredReport {
    pub executive_summary: ExecutiveSummary,
    pub detailed_analysis: DetailedAnalysis,
    pub insights_and_recommendations: InsightsAndRecommendations,
    pub supporting_evidence: SupportingEvidence,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphUpdate {
    pub new_nodes: Vec<GraphNode>,
    pub new_edges: Vec<GraphEdge>,
    pub insights_added: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VizNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VizEdge {
    pub source: String,
    pub target: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VizMetadata {
    pub query: String,
    pub confidence: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationData {
    pub nodes: Vec<VizNode>,
    pub edges: Vec<VizEdge>,
    pub metadata: VizMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedOutput {
    pub summary: ExecutiveSummary,
    pub insights: InsightsAndRecommendations,
    pub evidence: SupportingEvidence,
    pub visualization_data: VisualizationData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub report_type: String,
    pub confidence_score: f32,
    pub agents_involved: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReport {
    pub query: String,
    pub summary: String,
    pub structured_report: StructuredReport,
    pub knowledge_graph_update: GraphUpdate,
    pub formatted_output: FormattedOutput,
    pub report_metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowMetadata {
    pub total_agents: usize,
    pub agents_completed: usize,
    pub workflow_duration_secs: f64,
    pub confidence_score: f32,
}

/// Combined output of the full four-agent workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub query: String,
    pub workflow_status: String,
    pub planning_results: PlanningResults,
    pub retrieval_results: RetrievalResults,
    pub analysis_results: AnalysisResults,
    pub final_report: FinalReport,
    pub agent_status: BTreeMap<String, AgentState>,
    pub workflow_metadata: WorkflowMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_defaults() {
        let intent = IntentAnalysis::default();
        assert_eq!(intent.intent, "general_query");
        assert_eq!(intent.complexity, "moderate");
        assert!(intent.needs_retrieval && intent.needs_analysis && intent.needs_summarization);
    }

    #[test]
    fn test_agent_state_serializes_snake_case() {
        let json = serde_json::to_string(&AgentState::NotInitialized).unwrap();
        assert_eq!(json, "\"not_initialized\"");
        let json = serde_json::to_string(&AgentState::Ready).unwrap();
        assert_eq!(json, "\"ready\"");
    }
}
