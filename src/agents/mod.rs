// file: src/agents/mod.rs
// description: four-agent workflow pipeline
// reference: internal module structure

pub mod analyzer;
pub mod orchestrator;
pub mod planner;
pub mod reporter;
pub mod retriever;

pub use analyzer::AnalyzerAgent;
pub use orchestrator::{AGENT_NAMES, AgentOrchestrator};
pub use planner::PlannerAgent;
pub use reporter::ReporterAgent;
pub use retriever::RetrieverAgent;
