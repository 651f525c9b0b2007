// file: src/agents/planner.rs
// description: planner agent that analyzes query intent and builds the workflow plan
// reference: internal agent pipeline

use crate::error::Result;
use crate::models::{IntentAnalysis, PlanStep, PlanningResults, WorkflowPlan};
use crate::services::ReasoningClient;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

pub struct PlannerAgent {
    reasoning: Arc<ReasoningClient>,
}

impl PlannerAgent {
    pub fn new(reasoning: Arc<ReasoningClient>) -> Self {
        Self { reasoning }
    }

    /// Analyze the query and produce a plan for the downstream agents.
    pub async fn process_query(&self, query: &str) -> Result<PlanningResults> {
        info!("Planner analyzing query intent");

        let intent_analysis = self.analyze_intent(query).await;
        let workflow_plan = build_workflow_plan(&intent_analysis);
        let next_agents = next_agents_for(&intent_analysis);

        Ok(PlanningResults {
            query: query.to_string(),
            intent_analysis,
            workflow_plan,
            next_agents,
        })
    }

    /// Classify the query with the reasoning model, falling back to a
    /// permissive default when the reply cannot be parsed.
    async fn analyze_intent(&self, query: &str) -> IntentAnalysis {
        let prompt = format!(
            "Classify this enterprise document query: \"{}\"\n\n\
             Return JSON with fields: intent (one of document_search, \
             compliance_check, policy_question, general_query), complexity \
             (simple, moderate, complex), needs_retrieval (bool), \
             needs_analysis (bool), needs_summarization (bool).",
            query
        );

        match self.reasoning.query(&prompt).await {
            Ok(reply) => parse_intent_reply(&reply),
            Err(e) => {
                warn!("Intent analysis failed: {}. Using defaults.", e);
                IntentAnalysis::default()
            }
        }
    }
}

fn parse_intent_reply(reply: &str) -> IntentAnalysis {
    let start = reply.find('{');
    let end = reply.rfind('}');

    if let (Some(start), Some(end)) = (start, end) {
        if start < end {
            if let Ok(parsed) = serde_json::from_str::<Value>(&reply[start..=end]) {
                let defaults = IntentAnalysis::default();
                return IntentAnalysis {
                    intent: parsed["intent"]
                        .as_str()
                        .unwrap_or(&defaults.intent)
                        .to_string(),
                    complexity: parsed["complexity"]
                        .as_str()
                        .unwrap_or(&defaults.complexity)
                        .to_string(),
                    needs_retrieval: parsed["needs_retrieval"].as_bool().unwrap_or(true),
                    needs_analysis: parsed["needs_analysis"].as_bool().unwrap_or(true),
                    needs_summarization: parsed["needs_summarization"].as_bool().unwrap_or(true),
                    raw_analysis: None,
                };
            }
        }
    }

    IntentAnalysis {
        raw_analysis: Some(reply.chars().take(500).collect()),
        ..IntentAnalysis::default()
    }
}

/// The workflow is a fixed three-step pipeline behind the planner;
/// the intent analysis tunes expectations rather than the step order.
fn build_workflow_plan(intent: &IntentAnalysis) -> WorkflowPlan {
    WorkflowPlan {
        steps: vec![
            PlanStep {
                step: 1,
                agent: "RetrieverAgent".to_string(),
                action: "retrieve_relevant_documents".to_string(),
                description: "Search the vector store for documents relevant to the query"
                    .to_string(),
            },
            PlanStep {
                step: 2,
                agent: "AnalyzerAgent".to_string(),
                action: "analyze_documents".to_string(),
                description: "Analyze retrieved documents for entities, patterns, and reasoning"
                    .to_string(),
            },
            PlanStep {
                step: 3,
                agent: "ReporterAgent".to_string(),
                action: "generate_summary".to_string(),
                description: "Compile the final structured report with visualization data"
                    .to_string(),
            },
        ],
        estimated_complexity: intent.complexity.clone(),
        expected_output_type: "comprehensive_analysis".to_string(),
    }
}

fn next_agents_for(intent: &IntentAnalysis) -> Vec<String> {
    let mut agents = Vec::new();
    if intent.needs_retrieval {
        agents.push("RetrieverAgent".to_string());
    }
    if intent.needs_analysis {
        agents.push("AnalyzerAgent".to_string());
    }
    // The reporter always closes the workflow
    agents.push("ReporterAgent".to_string());
    agents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intent_reply_valid_json() {
        let reply = "Here is my classification: {\"intent\": \"compliance_check\", \
                     \"complexity\": \"complex\", \"needs_retrieval\": true, \
                     \"needs_analysis\": true, \"needs_summarization\": false}";
        let intent = parse_intent_reply(reply);
        assert_eq!(intent.intent, "compliance_check");
        assert_eq!(intent.complexity, "complex");
        assert!(!intent.needs_summarization);
        assert!(intent.raw_analysis.is_none());
    }

    #[test]
    fn test_parse_intent_reply_unparseable() {
        let intent = parse_intent_reply("I could not classify this query.");
        assert_eq!(intent.intent, "general_query");
        assert!(intent.raw_analysis.is_some());
    }

    #[test]
    fn test_workflow_plan_is_three_fixed_steps() {
        let plan = build_workflow_plan(&IntentAnalysis::default());
        assert_eq!(plan.steps.len(), 3);
        assert_eq!(plan.steps[0].agent, "RetrieverAgent");
        assert_eq!(plan.steps[1].agent, "AnalyzerAgent");
        assert_eq!(plan.steps[2].agent, "ReporterAgent");
        assert_eq!(plan.expected_output_type, "comprehensive_analysis");
    }

    #[test]
    fn test_reporter_always_last() {
        let intent = IntentAnalysis {
            needs_retrieval: false,
            needs_analysis: false,
            ..IntentAnalysis::default()
        };
        let agents = next_agents_for(&intent);
        assert_eq!(agents, vec!["ReporterAgent".to_string()]);
    }
}
