// file: src/demo.rs
// description: canned sample data served when demo mode is enabled
// reference: internal demo fixtures

use crate::models::{FrontendGraph, FrontendLink, FrontendNode};
use chrono::Utc;
use serde_json::{Value, json};

fn demo_node(
    id: &str,
    name: &str,
    node_type: &str,
    size: u32,
    color: &str,
    summary: &str,
) -> FrontendNode {
    FrontendNode {
        id: id.to_string(),
        name: name.to_string(),
        node_type: node_type.to_string(),
        size,
        color: color.to_string(),
        summary: summary.to_string(),
        key_terms: Vec::new(),
        content_preview: String::new(),
    }
}

fn demo_link(source: &str, target: &str, link_type: &str) -> FrontendLink {
    FrontendLink {
        source: source.to_string(),
        target: target.to_string(),
        link_type: link_type.to_string(),
        strength: 0.7,
    }
}

/// Sample knowledge graph shown when no real document store is attached.
pub fn sample_graph() -> FrontendGraph {
    let nodes = vec![
        demo_node(
            "dept_legal",
            "Legal",
            "department",
            15,
            "#00d4ff",
            "Legal department documents and policies",
        ),
        demo_node(
            "dept_hr",
            "Human Resources",
            "department",
            15,
            "#00d4ff",
            "HR policies and employee documentation",
        ),
        demo_node(
            "doc_privacy_policy",
            "Privacy Policy 2024",
            "document",
            10,
            "#00ff88",
            "Company privacy policy covering data collection and retention",
        ),
        demo_node(
            "doc_employee_handbook",
            "Employee Handbook",
            "document",
            10,
            "#00ff88",
            "Employee onboarding and conduct guidelines",
        ),
        demo_node(
            "doc_vendor_contract",
            "Vendor Data Agreement",
            "document",
            10,
            "#00ff88",
            "Third-party vendor data processing agreement",
        ),
        demo_node(
            "entity_gdpr",
            "GDPR",
            "entity",
            12,
            "#b347d9",
            "EU General Data Protection Regulation",
        ),
        demo_node(
            "entity_ccpa",
            "CCPA",
            "entity",
            12,
            "#b347d9",
            "California Consumer Privacy Act",
        ),
        demo_node(
            "entity_retention",
            "Data Retention",
            "concept",
            10,
            "#ff6b9d",
            "Policies governing how long records are kept",
        ),
    ];

    let links = vec![
        demo_link("dept_legal", "doc_privacy_policy", "owns"),
        demo_link("dept_legal", "doc_vendor_contract", "owns"),
        demo_link("dept_hr", "doc_employee_handbook", "owns"),
        demo_link("doc_privacy_policy", "entity_gdpr", "references"),
        demo_link("doc_privacy_policy", "entity_ccpa", "references"),
        demo_link("doc_vendor_contract", "entity_gdpr", "references"),
        demo_link("doc_privacy_policy", "entity_retention", "covers"),
        demo_link("doc_employee_handbook", "entity_retention", "covers"),
    ];

    FrontendGraph { nodes, links }
}

/// Canned answer keyed on recognizable query topics.
pub fn canned_answer(query: &str) -> String {
    let lowered = query.to_lowercase();

    if lowered.contains("compliance") {
        "Based on the analyzed documents, the organization maintains compliance programs \
         for GDPR and CCPA. The Privacy Policy 2024 defines data subject rights handling, \
         and the Vendor Data Agreement requires processors to meet the same standards. \
         Annual compliance reviews are documented in the legal department records."
            .to_string()
    } else if lowered.contains("privacy") {
        "The Privacy Policy 2024 states that personal data is collected only for stated \
         business purposes, retained for a maximum of 7 years, and never sold to third \
         parties. Data subject access requests are handled within 30 days by the legal team."
            .to_string()
    } else if lowered.contains("policy") {
        "The document set includes the Privacy Policy 2024, the Employee Handbook, and the \
         Vendor Data Agreement. Policies are reviewed annually by the legal department, with \
         the most recent revisions covering data retention and third-party processing."
            .to_string()
    } else {
        format!(
            "Analysis of the available documents found 3 records relevant to \"{}\". \
             The strongest matches come from the legal department's policy library. \
             Upload additional documents to improve coverage for this topic.",
            query
        )
    }
}

/// Sample status block mirroring a fully idle orchestrator.
pub fn sample_agent_status() -> Value {
    json!({
        "orchestrator_status": "operational",
        "agents": {
            "PlannerAgent": "ready",
            "RetrieverAgent": "ready",
            "AnalyzerAgent": "ready",
            "ReporterAgent": "ready",
        },
        "summary": {
            "total": 4,
            "ready": 4,
            "completed": 0,
            "failed": 0,
        }
    })
}

/// Sample end-to-end workflow result for `/agents/run` in demo mode.
pub fn sample_workflow(query: &str) -> Value {
    json!({
        "query": query,
        "workflow_status": "completed",
        "planning_results": {
            "query": query,
            "intent_analysis": {
                "intent": "document_search",
                "complexity": "moderate",
                "needs_retrieval": true,
                "needs_analysis": true,
                "needs_summarization": true,
            },
            "workflow_plan": {
                "steps": [
                    {
                        "step": 1,
                        "agent": "RetrieverAgent",
                        "action": "retrieve_relevant_documents",
                        "description": "Search the vector store for documents relevant to the query",
                    },
                    {
                        "step": 2,
                        "agent": "AnalyzerAgent",
                        "action": "analyze_documents",
                        "description": "Analyze retrieved documents for entities, patterns, and reasoning",
                    },
                    {
                        "step": 3,
                        "agent": "ReporterAgent",
                        "action": "generate_summary",
                        "description": "Compile the final structured report with visualization data",
                    },
                ],
                "estimated_complexity": "moderate",
                "expected_output_type": "comprehensive_analysis",
            },
            "next_agents": ["RetrieverAgent", "AnalyzerAgent", "ReporterAgent"],
        },
        "retrieval_results": {
            "query": query,
            "documents_found": 3,
            "documents_returned": 3,
            "documents": [
                {
                    "id": "demo-doc-1",
                    "filename": "privacy_policy_2024.pdf",
                    "document_type": "policy",
                    "content": "This privacy policy describes how personal data is collected, processed, and retained...",
                    "storage_uri": "s3://demo-bucket/documents/demo-doc-1/privacy_policy_2024.pdf",
                    "entities": ["GDPR", "CCPA", "Data Retention"],
                    "certainty": 0.92,
                },
                {
                    "id": "demo-doc-2",
                    "filename": "employee_handbook.pdf",
                    "document_type": "policy",
                    "content": "The employee handbook covers onboarding, conduct, and records retention requirements...",
                    "storage_uri": "s3://demo-bucket/documents/demo-doc-2/employee_handbook.pdf",
                    "entities": ["Data Retention", "Human Resources"],
                    "certainty": 0.81,
                },
                {
                    "id": "demo-doc-3",
                    "filename": "vendor_data_agreement.pdf",
                    "document_type": "contract",
                    "content": "This agreement governs third-party processing of company data under GDPR obligations...",
                    "storage_uri": "s3://demo-bucket/documents/demo-doc-3/vendor_data_agreement.pdf",
                    "entities": ["GDPR", "Vendor Management"],
                    "certainty": 0.74,
                },
            ],
            "retrieval_summary": "Three policy and contract documents directly address the query topic.",
            "retrieval_metadata": {
                "search_strategy": "vector_similarity",
                "ranking_method": "relevance_score",
                "filtering_applied": true,
            },
        },
        "analysis_results": {
            "query": query,
            "documents_analyzed": 3,
            "document_analysis": {
                "analysis_text": "The documents establish a consistent data governance posture: retention limits, regulatory alignment with GDPR and CCPA, and flow-down obligations to vendors.",
                "documents_processed": 3,
                "analysis_type": "content_analysis",
            },
            "entity_analysis": {
                "total_entities": 7,
                "unique_entities": 5,
                "top_entities": [["GDPR", 2], ["Data Retention", 2], ["CCPA", 1]],
                "entity_extraction_method": "managed_nlp_with_pattern_fallback",
            },
            "reasoning_results": {
                "reasoning_text": "Because the privacy policy and vendor agreement both cite GDPR, obligations extend to third-party processors.",
                "reasoning_type": "deductive",
                "confidence_level": "high",
            },
            "pattern_results": {
                "document_type_distribution": {"contract": 1, "policy": 2},
                "entity_patterns": [["GDPR", 2], ["Data Retention", 2]],
                "pattern_analysis_method": "frequency_analysis",
                "total_patterns_identified": 4,
            },
            "analysis_metadata": {
                "analysis_method": "llm_with_entity_extraction",
                "tools_used": ["reasoning_model", "entity_detection", "pattern_analysis"],
                "confidence_score": 1.0,
            },
        },
        "final_report": {
            "query": query,
            "summary": canned_answer(query),
            "report_metadata": {
                "generated_at": Utc::now().to_rfc3339(),
                "report_type": "comprehensive_analysis",
                "confidence_score": 1.0,
                "agents_involved": ["RetrieverAgent", "AnalyzerAgent", "ReporterAgent"],
            },
        },
        "agent_status": {
            "PlannerAgent": "completed",
            "RetrieverAgent": "completed",
            "AnalyzerAgent": "completed",
            "ReporterAgent": "completed",
        },
        "workflow_metadata": {
            "total_agents": 4,
            "agents_completed": 4,
            "workflow_duration_secs": 2.4,
            "confidence_score": 1.0,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_graph_shape() {
        let graph = sample_graph();
        assert_eq!(graph.nodes.len(), 8);
        assert_eq!(graph.links.len(), 8);
        assert!(graph
            .nodes
            .iter()
            .filter(|n| n.node_type == "department")
            .all(|n| n.size == 15));
        assert!(graph
            .nodes
            .iter()
            .filter(|n| n.node_type == "entity")
            .all(|n| n.size == 12));
    }

    #[test]
    fn test_canned_answer_topic_routing() {
        assert!(canned_answer("What about GDPR compliance?").contains("compliance programs"));
        assert!(canned_answer("Explain the privacy rules").contains("Privacy Policy 2024"));
        assert!(canned_answer("List every policy").contains("reviewed annually"));
        assert!(canned_answer("random topic").contains("random topic"));
    }

    #[test]
    fn test_sample_workflow_is_completed() {
        let result = sample_workflow("test query");
        assert_eq!(result["workflow_status"], "completed");
        assert_eq!(result["workflow_metadata"]["agents_completed"], 4);
        assert_eq!(result["retrieval_results"]["documents_found"], 3);
    }
}
