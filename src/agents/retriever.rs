// file: src/agents/retriever.rs
// description: retriever agent with quality filtering and relevance ranking
// reference: internal agent pipeline

use crate::error::Result;
use crate::models::{RetrievalMetadata, RetrievalResults, RetrievedDocument};
use crate::services::{DocumentStore, ReasoningClient};
use std::sync::Arc;
use tracing::{info, warn};

const MIN_CONTENT_LENGTH: usize = 100;
const MIN_CERTAINTY: f32 = 0.3;
const EXCLUDED_TYPES: &[&str] = &["irrelevant", "test", "duplicate"];

pub struct RetrieverAgent {
    store: Arc<DocumentStore>,
    reasoning: Arc<ReasoningClient>,
}

impl RetrieverAgent {
    pub fn new(store: Arc<DocumentStore>, reasoning: Arc<ReasoningClient>) -> Self {
        Self { store, reasoning }
    }

    /// Retrieve, filter, and rank documents for the query.
    pub async fn retrieve_documents(&self, query: &str, limit: usize) -> Result<RetrievalResults> {
        info!("Retriever searching for documents (limit {})", limit);

        let candidates = self.store.query_documents(query, limit).await?;
        let documents_found = candidates.len();

        let filtered = filter_documents(candidates);
        let ranked = rank_documents(filtered);

        let retrieval_summary = self.summarize_retrieval(query, &ranked).await;

        Ok(RetrievalResults {
            query: query.to_string(),
            documents_found,
            documents_returned: ranked.len(),
            documents: ranked,
            retrieval_summary,
            retrieval_metadata: RetrievalMetadata {
                search_strategy: "vector_similarity".to_string(),
                ranking_method: "relevance_score".to_string(),
                filtering_applied: true,
            },
        })
    }

    async fn summarize_retrieval(&self, query: &str, documents: &[RetrievedDocument]) -> String {
        if documents.is_empty() {
            return "No relevant documents were found for this query.".to_string();
        }

        let previews: Vec<String> = documents
            .iter()
            .take(5)
            .map(|doc| {
                format!(
                    "- {} ({}): {}",
                    doc.filename,
                    doc.document_type,
                    doc.content_preview(200)
                )
            })
            .collect();

        let prompt = format!(
            "Summarize in two sentences how these documents relate to the query \"{}\":\n{}",
            query,
            previews.join("\n")
        );

        match self.reasoning.query(&prompt).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Retrieval summary failed: {}", e);
                format!(
                    "Retrieved {} documents relevant to the query.",
                    documents.len()
                )
            }
        }
    }
}

/// Drop low-quality results: short content, weak similarity, and
/// documents typed as noise.
fn filter_documents(documents: Vec<RetrievedDocument>) -> Vec<RetrievedDocument> {
    documents
        .into_iter()
        .filter(|doc| {
            doc.content.len() >= MIN_CONTENT_LENGTH
                && doc.certainty >= MIN_CERTAINTY
                && !EXCLUDED_TYPES.contains(&doc.document_type.as_str())
        })
        .collect()
}

/// Rank by a blend of similarity and content richness. The length factor
/// saturates at 10k characters so very long documents do not dominate.
fn rank_documents(mut documents: Vec<RetrievedDocument>) -> Vec<RetrievedDocument> {
    documents.sort_by(|a, b| {
        relevance_score(b)
            .partial_cmp(&relevance_score(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    documents
}

fn relevance_score(doc: &RetrievedDocument) -> f32 {
    let length_factor = (doc.content.len() as f32 / 10_000.0).min(1.0);
    0.7 * doc.certainty + 0.3 * length_factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_doc(id: &str, document_type: &str, content_len: usize, certainty: f32) -> RetrievedDocument {
        RetrievedDocument {
            id: id.to_string(),
            filename: format!("{}.txt", id),
            document_type: document_type.to_string(),
            content: "x".repeat(content_len),
            storage_uri: String::new(),
            entities: Vec::new(),
            certainty,
            distance: None,
        }
    }

    #[test]
    fn test_filter_drops_short_content() {
        let docs = vec![make_doc("a", "policy", 50, 0.9), make_doc("b", "policy", 200, 0.9)];
        let filtered = filter_documents(docs);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "b");
    }

    #[test]
    fn test_filter_drops_low_certainty() {
        let docs = vec![make_doc("a", "policy", 200, 0.2), make_doc("b", "policy", 200, 0.3)];
        let filtered = filter_documents(docs);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "b");
    }

    #[test]
    fn test_filter_drops_excluded_types() {
        let docs = vec![
            make_doc("a", "irrelevant", 200, 0.9),
            make_doc("b", "test", 200, 0.9),
            make_doc("c", "duplicate", 200, 0.9),
            make_doc("d", "policy", 200, 0.9),
        ];
        let filtered = filter_documents(docs);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "d");
    }

    #[test]
    fn test_rank_orders_by_blended_score() {
        // High certainty, short content vs lower certainty, long content
        let docs = vec![
            make_doc("short_certain", "policy", 500, 0.9),
            make_doc("long_less_certain", "policy", 10_000, 0.6),
        ];
        let ranked = rank_documents(docs);
        // 0.7*0.9 + 0.3*0.05 = 0.645 vs 0.7*0.6 + 0.3*1.0 = 0.72
        assert_eq!(ranked[0].id, "long_less_certain");
    }

    #[test]
    fn test_rank_is_stable_for_equal_scores() {
        let docs = vec![
            make_doc("first", "policy", 200, 0.5),
            make_doc("second", "policy", 200, 0.5),
        ];
        let ranked = rank_documents(docs);
        assert_eq!(ranked[0].id, "first");
        assert_eq!(ranked[1].id, "second");
    }

    #[test]
    fn test_length_factor_saturates() {
        let doc = make_doc("huge", "policy", 100_000, 0.5);
        assert_eq!(relevance_score(&doc), 0.7 * 0.5 + 0.3);
    }
}
