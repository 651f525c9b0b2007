// file: src/agents/analyzer.rs
// description: analyzer agent for document analysis, entities, reasoning, and patterns
// reference: internal agent pipeline

use crate::error::Result;
use crate::models::{
    AnalysisMetadata, AnalysisResults, DocumentAnalysis, EntityAnalysis, PatternResults,
    ReasoningResults, RetrievedDocument,
};
use crate::services::{DocumentAiClient, ReasoningClient};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, warn};

const TOP_ENTITY_COUNT: usize = 10;

pub struct AnalyzerAgent {
    reasoning: Arc<ReasoningClient>,
    document_ai: Arc<DocumentAiClient>,
}

impl AnalyzerAgent {
    pub fn new(reasoning: Arc<ReasoningClient>, document_ai: Arc<DocumentAiClient>) -> Self {
        Self {
            reasoning,
            document_ai,
        }
    }

    /// Run the full analysis pass over the retrieved documents.
    pub async fn analyze_documents(
        &self,
        query: &str,
        documents: &[RetrievedDocument],
    ) -> Result<AnalysisResults> {
        info!("Analyzer processing {} documents", documents.len());

        let document_analysis = self.analyze_content(query, documents).await;
        let entity_analysis = self.analyze_entities(documents).await;
        let reasoning_results = self.perform_reasoning(query, documents).await;
        let pattern_results = detect_patterns(documents);

        let confidence = confidence_score(&document_analysis);

        Ok(AnalysisResults {
            query: query.to_string(),
            documents_analyzed: documents.len(),
            document_analysis,
            entity_analysis,
            reasoning_results,
            pattern_results,
            analysis_metadata: AnalysisMetadata {
                analysis_method: "llm_with_entity_extraction".to_string(),
                tools_used: vec![
                    "reasoning_model".to_string(),
                    "entity_detection".to_string(),
                    "pattern_analysis".to_string(),
                ],
                confidence_score: confidence,
            },
        })
    }

    async fn analyze_content(
        &self,
        query: &str,
        documents: &[RetrievedDocument],
    ) -> DocumentAnalysis {
        if documents.is_empty() {
            return DocumentAnalysis {
                analysis_text: String::new(),
                documents_processed: 0,
                analysis_type: "content_analysis".to_string(),
            };
        }

        let excerpts: Vec<String> = documents
            .iter()
            .take(5)
            .map(|doc| format!("[{}] {}", doc.filename, doc.content_preview(1500)))
            .collect();

        let prompt = format!(
            "Analyze these documents in relation to the query \"{}\". Identify \
             the main themes and any direct answers the documents provide.\n\n{}",
            query,
            excerpts.join("\n\n")
        );

        let analysis_text = match self.reasoning.query(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Document analysis failed: {}", e);
                "Analysis failed".to_string()
            }
        };

        DocumentAnalysis {
            analysis_text,
            documents_processed: documents.len().min(5),
            analysis_type: "content_analysis".to_string(),
        }
    }

    /// Aggregate entities across documents, counting frequency.
    /// Documents carry entities from ingestion; documents without any get
    /// a detection pass here.
    async fn analyze_entities(&self, documents: &[RetrievedDocument]) -> EntityAnalysis {
        let mut frequencies: HashMap<String, usize> = HashMap::new();
        let mut total = 0usize;

        for doc in documents {
            let entities = if doc.entities.is_empty() {
                self.document_ai.detect_entities(&doc.content).await
            } else {
                doc.entities.clone()
            };

            for entity in entities {
                *frequencies.entry(entity).or_insert(0) += 1;
                total += 1;
            }
        }

        let unique = frequencies.len();
        let top_entities = top_entities(frequencies, TOP_ENTITY_COUNT);

        EntityAnalysis {
            total_entities: total,
            unique_entities: unique,
            top_entities,
            entity_extraction_method: "managed_nlp_with_pattern_fallback".to_string(),
        }
    }

    async fn perform_reasoning(
        &self,
        query: &str,
        documents: &[RetrievedDocument],
    ) -> ReasoningResults {
        let context: Vec<String> = documents
            .iter()
            .take(3)
            .map(|doc| doc.content_preview(300))
            .collect();

        let prompt = format!(
            "Given these document excerpts:\n{}\n\nReason step by step about \
             the query \"{}\" and state your conclusion.",
            context.join("\n"),
            query
        );

        match self.reasoning.query(&prompt).await {
            Ok(reasoning_text) => ReasoningResults {
                reasoning_text,
                reasoning_type: "deductive".to_string(),
                confidence_level: "high".to_string(),
            },
            Err(e) => {
                warn!("Reasoning step failed: {}", e);
                ReasoningResults {
                    reasoning_text: "Reasoning unavailable".to_string(),
                    reasoning_type: "deductive".to_string(),
                    confidence_level: "low".to_string(),
                }
            }
        }
    }
}

/// Detect structural patterns: document type distribution and the most
/// frequent entities across the set.
fn detect_patterns(documents: &[RetrievedDocument]) -> PatternResults {
    let mut type_distribution: BTreeMap<String, usize> = BTreeMap::new();
    let mut entity_frequencies: HashMap<String, usize> = HashMap::new();

    for doc in documents {
        *type_distribution
            .entry(doc.document_type.clone())
            .or_insert(0) += 1;
        for entity in &doc.entities {
            *entity_frequencies.entry(entity.clone()).or_insert(0) += 1;
        }
    }

    let entity_patterns = top_entities(entity_frequencies, TOP_ENTITY_COUNT);
    let total = type_distribution.len() + entity_patterns.len();

    PatternResults {
        document_type_distribution: type_distribution,
        entity_patterns,
        pattern_analysis_method: "frequency_analysis".to_string(),
        total_patterns_identified: total,
    }
}

fn top_entities(frequencies: HashMap<String, usize>, limit: usize) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = frequencies.into_iter().collect();
    // Sort by count descending, name ascending for deterministic output
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(limit);
    entries
}

/// Base confidence 0.5, raised when the analysis produced text at all
/// and again when it is substantive.
fn confidence_score(analysis: &DocumentAnalysis) -> f32 {
    let mut score: f32 = 0.5;
    if !analysis.analysis_text.is_empty() && analysis.analysis_text != "Analysis failed" {
        score += 0.3;
    }
    if analysis.analysis_text.len() > 200 {
        score += 0.2;
    }
    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_doc(id: &str, document_type: &str, entities: &[&str]) -> RetrievedDocument {
        RetrievedDocument {
            id: id.to_string(),
            filename: format!("{}.txt", id),
            document_type: document_type.to_string(),
            content: "content".repeat(30),
            storage_uri: String::new(),
            entities: entities.iter().map(|s| s.to_string()).collect(),
            certainty: 0.8,
            distance: None,
        }
    }

    #[test]
    fn test_detect_patterns_type_distribution() {
        let docs = vec![
            make_doc("a", "policy", &["GDPR"]),
            make_doc("b", "policy", &["GDPR", "CCPA"]),
            make_doc("c", "contract", &[]),
        ];
        let patterns = detect_patterns(&docs);
        assert_eq!(patterns.document_type_distribution["policy"], 2);
        assert_eq!(patterns.document_type_distribution["contract"], 1);
        assert_eq!(patterns.entity_patterns[0], ("GDPR".to_string(), 2));
    }

    #[test]
    fn test_top_entities_limit_and_order() {
        let mut freq = HashMap::new();
        freq.insert("GDPR".to_string(), 5);
        freq.insert("CCPA".to_string(), 3);
        freq.insert("HIPAA".to_string(), 3);
        let top = top_entities(freq, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0], ("GDPR".to_string(), 5));
        // Ties break alphabetically
        assert_eq!(top[1], ("CCPA".to_string(), 3));
    }

    #[test]
    fn test_confidence_score_tiers() {
        let empty = DocumentAnalysis {
            analysis_text: String::new(),
            documents_processed: 0,
            analysis_type: "content_analysis".to_string(),
        };
        assert_eq!(confidence_score(&empty), 0.5);

        let brief = DocumentAnalysis {
            analysis_text: "Short finding".to_string(),
            documents_processed: 1,
            analysis_type: "content_analysis".to_string(),
        };
        assert!((confidence_score(&brief) - 0.8).abs() < f32::EPSILON);

        let detailed = DocumentAnalysis {
            analysis_text: "x".repeat(300),
            documents_processed: 3,
            analysis_type: "content_analysis".to_string(),
        };
        assert_eq!(confidence_score(&detailed), 1.0);
    }
}
