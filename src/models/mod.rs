// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod graph;
pub mod report;

pub use document::{Document, RetrievedDocument};
pub use graph::{FrontendGraph, FrontendLink, FrontendNode, GraphEdge, GraphNode, KnowledgeGraph};
pub use report::{
    AgentState, AnalysisMetadata, AnalysisResults, DetailedAnalysis, DocumentAnalysis,
    EntityAnalysis, ExecutiveSummary, FinalReport, FormattedOutput, GraphUpdate, IntentAnalysis,
    InsightsAndRecommendations, PatternResults, PlanStep, PlanningResults, ReasoningResults,
    ReportMetadata, RetrievalMetadata, RetrievalResults, StructuredReport, SupportingEvidence,
    VisualizationData, VizEdge, VizMetadata, VizNode, WorkflowMetadata, WorkflowPlan,
    WorkflowResult,
};
