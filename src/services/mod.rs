// file: src/services/mod.rs
// description: external service clients backing the agent workflow
// reference: internal module structure

pub mod document_ai;
pub mod embeddings;
pub mod insight;
pub mod object_store;
pub mod reasoning;
pub mod store;

pub use document_ai::{DocumentAiClient, SentimentResult};
pub use embeddings::EmbeddingClient;
pub use insight::{InsightClient, NodeSearchResult, RelevantNode};
pub use object_store::ObjectStore;
pub use reasoning::ReasoningClient;
pub use store::{DocumentStore, EMBEDDING_DIM};
