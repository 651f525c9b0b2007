// file: src/agents/reporter.rs
// description: reporter agent that compiles the final structured report
// reference: internal agent pipeline

use crate::error::Result;
use crate::models::{
    AnalysisResults, DetailedAnalysis, ExecutiveSummary, FinalReport, FormattedOutput, GraphEdge,
    GraphNode, GraphUpdate, InsightsAndRecommendations, PlanningResults, ReportMetadata,
    RetrievalResults, StructuredReport, SupportingEvidence, VisualizationData, VizEdge,
    VizMetadata, VizNode,
};
use crate::services::ReasoningClient;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

const MAX_INSIGHT_NODES: usize = 5;

pub struct ReporterAgent {
    reasoning: Arc<ReasoningClient>,
}

impl ReporterAgent {
    pub fn new(reasoning: Arc<ReasoningClient>) -> Self {
        Self { reasoning }
    }

    /// Compile all upstream agent outputs into the final report.
    pub async fn generate_report(
        &self,
        planning: &PlanningResults,
        retrieval: &RetrievalResults,
        analysis: &AnalysisResults,
        query: &str,
    ) -> Result<FinalReport> {
        info!("Reporter compiling final report");

        let summary = self.generate_summary(query, retrieval, analysis).await;
        let structured_report = build_structured_report(retrieval, analysis, query);
        let knowledge_graph_update = build_graph_update(analysis);
        let formatted_output = build_formatted_output(&structured_report, analysis, query);

        let confidence = report_confidence(retrieval, analysis);

        Ok(FinalReport {
            query: query.to_string(),
            summary,
            structured_report,
            knowledge_graph_update,
            formatted_output,
            report_metadata: ReportMetadata {
                generated_at: Utc::now().to_rfc3339(),
                report_type: "comprehensive_analysis".to_string(),
                confidence_score: confidence,
                agents_involved: planning.next_agents.clone(),
            },
        })
    }

    async fn generate_summary(
        &self,
        query: &str,
        retrieval: &RetrievalResults,
        analysis: &AnalysisResults,
    ) -> String {
        let prompt = format!(
            "Write a concise executive summary answering \"{}\".\n\
             Retrieval found {} relevant documents. Analysis notes:\n{}\n\
             Reasoning conclusion:\n{}",
            query,
            retrieval.documents_returned,
            analysis
                .document_analysis
                .analysis_text
                .chars()
                .take(1000)
                .collect::<String>(),
            analysis
                .reasoning_results
                .reasoning_text
                .chars()
                .take(500)
                .collect::<String>()
        );

        match self.reasoning.query(&prompt).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Summary generation failed: {}", e);
                format!(
                    "Analysis of {} documents related to \"{}\". {}",
                    retrieval.documents_returned, query, analysis.document_analysis.analysis_text
                )
            }
        }
    }
}

fn key_findings(analysis: &AnalysisResults, retrieval: &RetrievalResults) -> Vec<String> {
    let mut findings = Vec::new();

    if retrieval.documents_returned > 0 {
        findings.push(format!(
            "{} relevant documents identified across {} document types",
            retrieval.documents_returned,
            analysis.pattern_results.document_type_distribution.len()
        ));
    }

    if let Some((entity, count)) = analysis.entity_analysis.top_entities.first() {
        findings.push(format!(
            "Most frequent entity: {} ({} occurrences)",
            entity, count
        ));
    }

    if !analysis.reasoning_results.reasoning_text.is_empty()
        && analysis.reasoning_results.reasoning_text != "Reasoning unavailable"
    {
        findings.push(
            analysis
                .reasoning_results
                .reasoning_text
                .chars()
                .take(200)
                .collect(),
        );
    }

    findings
}

/// Three or more findings reads as high confidence, two as medium.
fn confidence_level(findings: &[String]) -> String {
    match findings.len() {
        n if n >= 3 => "high".to_string(),
        2 => "medium".to_string(),
        _ => "low".to_string(),
    }
}

fn build_structured_report(
    retrieval: &RetrievalResults,
    analysis: &AnalysisResults,
    query: &str,
) -> StructuredReport {
    let findings = key_findings(analysis, retrieval);
    let level = confidence_level(&findings);

    StructuredReport {
        executive_summary: ExecutiveSummary {
            query: query.to_string(),
            documents_analyzed: analysis.documents_analyzed,
            key_findings: findings,
            confidence_level: level,
        },
        detailed_analysis: DetailedAnalysis {
            document_analysis: analysis.document_analysis.clone(),
            entity_analysis: analysis.entity_analysis.clone(),
            reasoning_results: analysis.reasoning_results.clone(),
            pattern_results: analysis.pattern_results.clone(),
        },
        insights_and_recommendations: build_insights(analysis),
        supporting_evidence: SupportingEvidence {
            source_documents: retrieval.documents.clone(),
            entity_evidence: analysis.entity_analysis.top_entities.clone(),
            pattern_evidence: analysis.pattern_results.entity_patterns.clone(),
        },
    }
}

fn build_insights(analysis: &AnalysisResults) -> InsightsAndRecommendations {
    let mut primary_insights = Vec::new();
    let mut compliance_considerations = Vec::new();

    for (entity, count) in analysis.entity_analysis.top_entities.iter().take(3) {
        primary_insights.push(format!(
            "{} appears in {} document contexts",
            entity, count
        ));
        if is_regulation(entity) {
            compliance_considerations.push(format!(
                "{} obligations are referenced across the document set",
                entity
            ));
        }
    }

    let actionable_recommendations = if analysis.documents_analyzed == 0 {
        vec!["Upload relevant documents to improve answer coverage".to_string()]
    } else {
        vec![
            "Review the highest-ranked source documents for authoritative detail".to_string(),
            "Cross-check findings against the most recent document versions".to_string(),
        ]
    };

    let risk_assessment = if compliance_considerations.is_empty() {
        vec!["No regulatory references detected in the analyzed set".to_string()]
    } else {
        vec!["Regulatory references present; verify current compliance status".to_string()]
    };

    InsightsAndRecommendations {
        primary_insights,
        actionable_recommendations,
        compliance_considerations,
        risk_assessment,
    }
}

fn is_regulation(entity: &str) -> bool {
    matches!(
        entity.to_uppercase().as_str(),
        "GDPR" | "CCPA" | "HIPAA" | "SOX" | "FERPA" | "GLBA" | "PCI DSS" | "PCI-DSS"
    )
}

/// Top insights become graph nodes so the frontend can surface them.
fn build_graph_update(analysis: &AnalysisResults) -> GraphUpdate {
    let mut new_nodes = Vec::new();
    let mut new_edges = Vec::new();

    for (i, (entity, count)) in analysis
        .entity_analysis
        .top_entities
        .iter()
        .take(MAX_INSIGHT_NODES)
        .enumerate()
    {
        let node_id = format!("insight_{}", i);
        let mut node = GraphNode::new(
            node_id.clone(),
            entity.clone(),
            "insight".to_string(),
        );
        node.summary = format!("{} occurrences across analyzed documents", count);
        new_nodes.push(node);

        new_edges.push(GraphEdge {
            source: "query".to_string(),
            target: node_id,
            label: "generates".to_string(),
        });
    }

    let insights_added = new_nodes.len();
    GraphUpdate {
        new_nodes,
        new_edges,
        insights_added,
    }
}

fn build_formatted_output(
    report: &StructuredReport,
    analysis: &AnalysisResults,
    query: &str,
) -> FormattedOutput {
    let mut nodes = vec![VizNode {
        id: "query".to_string(),
        label: query.to_string(),
        node_type: "query".to_string(),
        size: 20,
    }];
    let mut edges = Vec::new();

    for (i, (entity, _)) in analysis
        .entity_analysis
        .top_entities
        .iter()
        .take(MAX_INSIGHT_NODES)
        .enumerate()
    {
        let node_id = format!("insight_{}", i);
        nodes.push(VizNode {
            id: node_id.clone(),
            label: entity.clone(),
            node_type: "insight".to_string(),
            size: 15,
        });
        edges.push(VizEdge {
            source: "query".to_string(),
            target: node_id,
            label: "generates".to_string(),
        });
    }

    FormattedOutput {
        summary: report.executive_summary.clone(),
        insights: report.insights_and_recommendations.clone(),
        evidence: report.supporting_evidence.clone(),
        visualization_data: VisualizationData {
            nodes,
            edges,
            metadata: VizMetadata {
                query: query.to_string(),
                confidence: report.executive_summary.confidence_level.clone(),
                timestamp: Utc::now().to_rfc3339(),
            },
        },
    }
}

/// Base 0.5 plus a share for each stage that produced real output.
fn report_confidence(retrieval: &RetrievalResults, analysis: &AnalysisResults) -> f32 {
    let mut score: f32 = 0.5;
    if retrieval.documents_returned > 0 {
        score += 0.2;
    }
    if !analysis.document_analysis.analysis_text.is_empty()
        && analysis.document_analysis.analysis_text != "Analysis failed"
    {
        score += 0.2;
    }
    if !analysis.entity_analysis.top_entities.is_empty() {
        score += 0.1;
    }
    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AnalysisMetadata, DocumentAnalysis, EntityAnalysis, PatternResults, ReasoningResults,
        RetrievalMetadata,
    };
    use std::collections::BTreeMap;

    fn sample_analysis() -> AnalysisResults {
        AnalysisResults {
            query: "What are our GDPR obligations?".to_string(),
            documents_analyzed: 3,
            document_analysis: DocumentAnalysis {
                analysis_text: "The documents describe data retention obligations.".to_string(),
                documents_processed: 3,
                analysis_type: "content_analysis".to_string(),
            },
            entity_analysis: EntityAnalysis {
                total_entities: 6,
                unique_entities: 2,
                top_entities: vec![("GDPR".to_string(), 4), ("CCPA".to_string(), 2)],
                entity_extraction_method: "managed_nlp_with_pattern_fallback".to_string(),
            },
            reasoning_results: ReasoningResults {
                reasoning_text: "Retention periods must be documented.".to_string(),
                reasoning_type: "deductive".to_string(),
                confidence_level: "high".to_string(),
            },
            pattern_results: PatternResults {
                document_type_distribution: BTreeMap::from([("policy".to_string(), 3)]),
                entity_patterns: vec![("GDPR".to_string(), 4)],
                pattern_analysis_method: "frequency_analysis".to_string(),
                total_patterns_identified: 2,
            },
            analysis_metadata: AnalysisMetadata {
                analysis_method: "llm_with_entity_extraction".to_string(),
                tools_used: vec![],
                confidence_score: 1.0,
            },
        }
    }

    fn sample_retrieval() -> RetrievalResults {
        RetrievalResults {
            query: "What are our GDPR obligations?".to_string(),
            documents_found: 3,
            documents_returned: 3,
            documents: vec![],
            retrieval_summary: "Found three policies.".to_string(),
            retrieval_metadata: RetrievalMetadata {
                search_strategy: "vector_similarity".to_string(),
                ranking_method: "relevance_score".to_string(),
                filtering_applied: true,
            },
        }
    }

    #[test]
    fn test_confidence_level_from_findings() {
        let three = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(confidence_level(&three), "high");
        let two = vec!["a".to_string(), "b".to_string()];
        assert_eq!(confidence_level(&two), "medium");
        let none: Vec<String> = vec![];
        assert_eq!(confidence_level(&none), "low");
    }

    #[test]
    fn test_report_confidence_all_factors() {
        let score = report_confidence(&sample_retrieval(), &sample_analysis());
        assert!((score - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_graph_update_caps_insight_nodes() {
        let mut analysis = sample_analysis();
        analysis.entity_analysis.top_entities = (0..8)
            .map(|i| (format!("Entity{}", i), 8 - i))
            .collect();
        let update = build_graph_update(&analysis);
        assert_eq!(update.new_nodes.len(), MAX_INSIGHT_NODES);
        assert_eq!(update.insights_added, MAX_INSIGHT_NODES);
        assert!(update.new_edges.iter().all(|e| e.label == "generates"));
    }

    #[test]
    fn test_formatted_output_node_sizes() {
        let analysis = sample_analysis();
        let report = build_structured_report(&sample_retrieval(), &analysis, &analysis.query);
        let output = build_formatted_output(&report, &analysis, &analysis.query);
        assert_eq!(output.visualization_data.nodes[0].size, 20);
        assert!(output.visualization_data.nodes[1..]
            .iter()
            .all(|n| n.size == 15));
    }

    #[test]
    fn test_compliance_considerations_for_regulations() {
        let insights = build_insights(&sample_analysis());
        assert!(!insights.compliance_considerations.is_empty());
        assert!(insights.compliance_considerations[0].contains("GDPR"));
    }
}
