// file: src/services/insight.rs
// description: Gemini client for graph-aware search and insight generation
// reference: https://ai.google.dev/api/generate-content

use crate::config::InsightConfig;
use crate::error::{AgentError, Result};
use crate::models::{FrontendGraph, GraphNode};
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use tracing::{debug, warn};

lazy_static! {
    // Model replies wrap JSON in prose or code fences; grab the outermost object.
    static ref JSON_BLOCK: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

/// A graph node annotated with the model's relevance judgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevantNode {
    #[serde(flatten)]
    pub node: GraphNode,
    pub relevance_score: f32,
    pub relevance_reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSearchResult {
    pub analysis_summary: String,
    pub relevant_nodes: Vec<RelevantNode>,
    pub total_analyzed: usize,
    pub total_relevant: usize,
}

pub struct InsightClient {
    client: Client,
    config: InsightConfig,
}

impl InsightClient {
    pub fn new(config: InsightConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn generate_content(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| AgentError::Llm("Insight API key not configured".to_string()))?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!("Sending generateContent request ({} chars)", prompt.len());

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Llm(format!("Failed to send insight request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AgentError::Llm(format!(
                "Insight request failed with status {}: {}",
                status, error_text
            )));
        }

        let content: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Llm(format!("Failed to parse insight response: {}", e)))?;

        content
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| AgentError::Llm("No candidates returned from insight API".to_string()))
    }

    /// Rank graph nodes by relevance to the query.
    ///
    /// Falls back to the first `limit` nodes when the model reply cannot
    /// be parsed as JSON.
    pub async fn find_relevant_nodes(
        &self,
        query: &str,
        nodes: &[GraphNode],
        limit: usize,
    ) -> Result<NodeSearchResult> {
        let node_descriptions: Vec<String> = nodes
            .iter()
            .map(|n| {
                format!(
                    "- id: {}, name: {}, type: {}, entities: [{}]",
                    n.id,
                    n.label,
                    n.node_type,
                    n.entities.join(", ")
                )
            })
            .collect();

        let prompt = format!(
            "Given the user query \"{}\" and the following knowledge graph nodes:\n{}\n\n\
             Return JSON with the shape {{\"analysis_summary\": string, \"relevant_nodes\": \
             [{{\"id\": string, \"relevance_score\": number between 0 and 1, \
             \"relevance_reasoning\": string}}]}}. Include at most {} nodes.",
            query,
            node_descriptions.join("\n"),
            limit
        );

        let reply = self.generate_content(&prompt).await?;

        if let Some(parsed) = extract_json(&reply) {
            let analysis_summary = parsed["analysis_summary"]
                .as_str()
                .unwrap_or("Analysis of knowledge graph nodes")
                .to_string();

            let mut relevant_nodes: Vec<RelevantNode> = parsed["relevant_nodes"]
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| {
                            let id = item["id"].as_str()?;
                            let node = nodes.iter().find(|n| n.id == id)?.clone();
                            Some(RelevantNode {
                                node,
                                relevance_score: item["relevance_score"].as_f64().unwrap_or(0.5)
                                    as f32,
                                relevance_reasoning: item["relevance_reasoning"]
                                    .as_str()
                                    .unwrap_or("")
                                    .to_string(),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();

            relevant_nodes.sort_by(|a, b| {
                b.relevance_score
                    .partial_cmp(&a.relevance_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            relevant_nodes.truncate(limit);

            return Ok(NodeSearchResult {
                analysis_summary,
                total_relevant: relevant_nodes.len(),
                total_analyzed: nodes.len(),
                relevant_nodes,
            });
        }

        warn!("Could not parse node relevance reply, using positional fallback");
        let relevant_nodes: Vec<RelevantNode> = nodes
            .iter()
            .take(limit.min(5))
            .map(|node| RelevantNode {
                node: node.clone(),
                relevance_score: 0.5,
                relevance_reasoning: "Selected by fallback ordering".to_string(),
            })
            .collect();

        Ok(NodeSearchResult {
            analysis_summary: reply.chars().take(500).collect(),
            total_relevant: relevant_nodes.len(),
            total_analyzed: nodes.len(),
            relevant_nodes,
        })
    }

    /// Generate structured insights over the visible portion of the graph.
    ///
    /// The reply is normalized so every expected field is present even when
    /// the model omits some.
    pub async fn generate_insights(
        &self,
        query: &str,
        visible_nodes: &[Value],
        graph: &FrontendGraph,
    ) -> Value {
        let structure = analyze_graph_structure(graph);

        let prompt = format!(
            "Analyze this knowledge graph for the query \"{}\".\n\
             Graph structure: {}\n\
             Visible nodes: {}\n\n\
             Return JSON with fields: summary, key_findings (array), \
             relationship_patterns (array), knowledge_gaps (array), \
             strategic_insights (array), data_quality_assessment, \
             suggested_next_steps (array), confidence_score (0 to 1).",
            query,
            structure,
            serde_json::to_string(visible_nodes).unwrap_or_else(|_| "[]".to_string())
        );

        let mut insights = match self.generate_content(&prompt).await {
            Ok(reply) => extract_json(&reply).unwrap_or_else(|| {
                warn!("Could not parse insight reply, using fallback");
                fallback_insights(&reply)
            }),
            Err(e) => {
                warn!("Insight generation failed: {}", e);
                fallback_insights("Insight generation is currently unavailable.")
            }
        };

        ensure_insight_fields(&mut insights);

        insights["metadata"] = json!({
            "query": query,
            "analysis_timestamp": Utc::now().to_rfc3339(),
            "nodes_analyzed": visible_nodes.len(),
            "total_nodes": graph.nodes.len(),
        });

        insights
    }

    /// Summarize the most relevant nodes as a direct answer to the query.
    ///
    /// Failures degrade to a count of the matched items so the search
    /// endpoint always returns a usable summary.
    pub async fn generate_summary(&self, query: &str, relevant_nodes: &[RelevantNode]) -> String {
        if relevant_nodes.is_empty() {
            return "No relevant information found for your query.".to_string();
        }

        let nodes_text: Vec<String> = relevant_nodes
            .iter()
            .take(10)
            .map(|item| {
                let summary = if item.node.summary.is_empty() {
                    "No summary available"
                } else {
                    item.node.summary.as_str()
                };
                format!("- {}: {}", item.node.label, summary)
            })
            .collect();

        let prompt = format!(
            "Based on the user's query \"{}\", here are the most relevant findings \
             from the knowledge graph:\n{}\n\n\
             Provide a summary that directly answers the query, highlights the key \
             findings and connections, and offers actionable insights where \
             applicable, written in a clear professional tone.",
            query,
            nodes_text.join("\n")
        );

        match self.generate_content(&prompt).await {
            Ok(summary) => summary.trim().to_string(),
            Err(e) => {
                warn!("Failed to generate search summary: {}", e);
                format!(
                    "Unable to generate summary. Found {} relevant items related to your query.",
                    relevant_nodes.len()
                )
            }
        }
    }

    pub async fn health_check(&self) -> String {
        if self.config.api_key.is_none() {
            return "not_configured".to_string();
        }
        match self.generate_content("Reply with the single word: ok").await {
            Ok(_) => "connected".to_string(),
            Err(e) => format!("error: {}", e),
        }
    }
}

/// Pull the outermost JSON object out of a model reply.
fn extract_json(reply: &str) -> Option<Value> {
    let block = JSON_BLOCK.find(reply)?;
    serde_json::from_str(block.as_str()).ok()
}

fn fallback_insights(summary: &str) -> Value {
    json!({
        "summary": summary.chars().take(500).collect::<String>(),
        "key_findings": [],
        "relationship_patterns": [],
        "knowledge_gaps": ["Automated insight analysis was unavailable for this query"],
        "strategic_insights": [],
        "data_quality_assessment": "unknown",
        "suggested_next_steps": ["Retry the analysis once the insight service is reachable"],
        "confidence_score": 0.3,
    })
}

/// Backfill any field the model left out so the frontend contract holds.
fn ensure_insight_fields(insights: &mut Value) {
    let defaults: &[(&str, Value)] = &[
        ("summary", json!("No summary available")),
        ("key_findings", json!([])),
        ("relationship_patterns", json!([])),
        ("knowledge_gaps", json!([])),
        ("strategic_insights", json!([])),
        ("data_quality_assessment", json!("unknown")),
        ("suggested_next_steps", json!([])),
        ("confidence_score", json!(0.5)),
    ];

    if !insights.is_object() {
        *insights = json!({});
    }

    for (field, default) in defaults {
        if insights.get(*field).is_none() {
            insights[*field] = default.clone();
        }
    }
}

/// Summarize node type counts and connectivity for the insight prompt.
fn analyze_graph_structure(graph: &FrontendGraph) -> String {
    let mut type_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for node in &graph.nodes {
        *type_counts.entry(node.node_type.as_str()).or_insert(0) += 1;
    }

    let avg_connections = if graph.nodes.is_empty() {
        0.0
    } else {
        graph.links.len() as f64 * 2.0 / graph.nodes.len() as f64
    };

    format!(
        "{} nodes ({}), {} links, {:.1} average connections per node",
        graph.nodes.len(),
        type_counts
            .iter()
            .map(|(t, c)| format!("{}: {}", t, c))
            .collect::<Vec<_>>()
            .join(", "),
        graph.links.len(),
        avg_connections
    )
}
