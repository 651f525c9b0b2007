// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod agents;
pub mod config;
pub mod demo;
pub mod error;
pub mod extractor;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;

pub use agents::{AGENT_NAMES, AgentOrchestrator};
pub use config::{
    AgentConfig, Config, DocumentAiConfig, InsightConfig, ObjectStoreConfig, ReasoningConfig,
    ServerConfig, StorageConfig,
};
pub use error::{AgentError, Result};
pub use extractor::EntityExtractor;
pub use models::{Document, KnowledgeGraph, RetrievedDocument, WorkflowResult};
pub use server::{AppState, Runtime, build_router, serve};
pub use services::{
    DocumentAiClient, DocumentStore, EmbeddingClient, InsightClient, ObjectStore, ReasoningClient,
};
pub use utils::{HealthCheck, HealthReport, HealthStatus, OperationTimer};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _config = Config::default_config();
        let _extractor = EntityExtractor::extract("GDPR");
    }
}
