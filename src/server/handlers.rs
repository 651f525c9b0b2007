// file: src/server/handlers.rs
// description: API endpoint handlers for document upload, query, and agents
// reference: https://docs.rs/axum

use crate::demo;
use crate::error::AgentError;
use crate::models::Document;
use crate::server::error::ApiError;
use crate::server::{AppState, Runtime};
use axum::Json;
use axum::extract::{Multipart, State};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct InsightRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub visible_nodes: Vec<Value>,
}

fn runtime(state: &AppState) -> Result<&Runtime, ApiError> {
    state
        .runtime
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Live services are not configured"))
}

fn require_query(query: &str) -> Result<(), ApiError> {
    if query.trim().is_empty() {
        return Err(AgentError::Validation("Query is required".to_string()).into());
    }
    Ok(())
}

pub async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "service": "context-agents",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "mode": if state.demo { "demo" } else { "live" },
        "agents": crate::agents::AGENT_NAMES,
    }))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let rt = match &state.runtime {
        Some(rt) if !state.demo => rt,
        _ => {
            return Json(json!({
                "status": "healthy",
                "services": {
                    "vector_store": "demo_mode",
                    "object_store": "demo_mode",
                    "document_ai": "demo_mode",
                    "reasoning": "demo_mode",
                    "insight": "demo_mode",
                },
                "agents_ready": true,
            }));
        }
    };

    let vector_store = match rt.store.ping().await {
        Ok(_) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let object_store = match &rt.object_store {
        Some(store) => store.health_check().await,
        None => "not_configured".to_string(),
    };

    let status = if vector_store == "connected" {
        "healthy"
    } else {
        "degraded"
    };

    Json(json!({
        "status": status,
        "services": {
            "vector_store": vector_store,
            "object_store": object_store,
            "document_ai": rt.document_ai.health_check(),
            "reasoning": rt.reasoning.health_check().await,
            "insight": rt.insight.health_check().await,
        },
        "agents_ready": true,
    }))
}

/// Ingest an uploaded document: OCR, archival, entity detection, and
/// vector indexing.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename = "upload.bin".to_string();
    let mut document_type = "general".to_string();
    let mut metadata_raw = "{}".to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        match field.name().unwrap_or_default() {
            "file" => {
                if let Some(name) = field.file_name() {
                    filename = name.to_string();
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
                file_bytes = Some(bytes.to_vec());
            }
            "document_type" => {
                document_type = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid document_type: {}", e)))?;
            }
            "metadata" => {
                metadata_raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid metadata: {}", e)))?;
            }
            _ => {}
        }
    }

    let file_bytes = file_bytes.ok_or_else(|| ApiError::bad_request("No file provided"))?;

    if state.demo && state.runtime.is_none() {
        return Ok(Json(json!({
            "message": "Document processed successfully",
            "document_id": uuid::Uuid::new_v4().to_string(),
            "storage_uri": format!("s3://demo-bucket/documents/demo/{}", filename),
            "entities_found": 3,
            "filename": filename,
        })));
    }

    let rt = runtime(&state)?;

    let upload_metadata: Value = serde_json::from_str(&metadata_raw)
        .map_err(|e| ApiError::bad_request(format!("Metadata is not valid JSON: {}", e)))?;

    info!("Processing upload: {} ({} bytes)", filename, file_bytes.len());

    let content = rt.document_ai.extract_text(&file_bytes).await;
    if content.trim().is_empty() {
        return Err(ApiError::bad_request(
            "No text could be extracted from the file",
        ));
    }

    let mut document = Document::new(filename.clone(), document_type, content);
    document.upload_metadata = upload_metadata;

    if let Some(object_store) = &rt.object_store {
        match object_store
            .store_document(&document.id, &filename, file_bytes)
            .await
        {
            Ok(uri) => document.storage_uri = uri,
            Err(e) => warn!("Failed to archive original file: {}", e),
        }
        if let Err(e) = object_store
            .store_extracted_text(&document.id, &document.content)
            .await
        {
            warn!("Failed to archive extracted text: {}", e);
        }
    }

    document.entities = rt.document_ai.detect_entities(&document.content).await;

    rt.store
        .insert_document(&document)
        .await
        .map_err(|e| ApiError::internal(format!("Upload failed: {}", e)))?;

    Ok(Json(json!({
        "message": "Document processed successfully",
        "document_id": document.id,
        "storage_uri": document.storage_uri,
        "entities_found": document.entities.len(),
        "filename": filename,
    })))
}

/// Forward a question directly to the reasoning model.
///
/// Retrieval-grounded answering runs through /agents/run; this endpoint
/// is the raw pass-through.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<Value>, ApiError> {
    require_query(&request.query)?;

    if state.demo && state.runtime.is_none() {
        return Ok(Json(json!({
            "message": "Reasoning response generated",
            "query": request.query,
            "answer": demo::canned_answer(&request.query),
        })));
    }

    let rt = runtime(&state)?;

    info!("Forwarding query to reasoning model");

    let answer = rt
        .reasoning
        .query(&request.query)
        .await
        .map_err(|e| ApiError::internal(format!("Reasoning query failed: {}", e)))?;

    Ok(Json(json!({
        "message": "Reasoning response generated",
        "query": request.query,
        "answer": answer,
    })))
}

/// Execute the full four-agent workflow.
pub async fn run_agents(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<Value>, ApiError> {
    require_query(&request.query)?;

    if state.demo && state.runtime.is_none() {
        return Ok(Json(json!({
            "result": demo::sample_workflow(&request.query),
            "agents_executed": 4,
        })));
    }

    let rt = runtime(&state)?;

    let result = rt
        .orchestrator
        .process_query(&request.query)
        .await
        .map_err(|e| ApiError::internal(format!("Agent execution failed: {}", e)))?;

    let agents_executed = result.workflow_metadata.agents_completed;

    Ok(Json(json!({
        "result": result,
        "agents_executed": agents_executed,
    })))
}

pub async fn agent_status(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    if state.demo && state.runtime.is_none() {
        return Ok(Json(demo::sample_agent_status()));
    }

    let rt = runtime(&state)?;
    Ok(Json(rt.orchestrator.get_status().await))
}

pub async fn reset_agents(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    if state.demo && state.runtime.is_none() {
        return Ok(Json(json!({ "message": "Agents reset", "mode": "demo" })));
    }

    let rt = runtime(&state)?;
    rt.orchestrator.reset().await;
    Ok(Json(json!({ "message": "Agents reset" })))
}

/// Knowledge graph in the shape the frontend visualization expects.
pub async fn graph(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    if state.demo && state.runtime.is_none() {
        let graph = demo::sample_graph();
        let node_count = graph.nodes.len();
        let edge_count = graph.links.len();
        return Ok(Json(json!({
            "graph": graph,
            "node_count": node_count,
            "edge_count": edge_count,
        })));
    }

    let rt = runtime(&state)?;

    let graph = rt
        .store
        .knowledge_graph(rt.config.agents.graph_node_limit)
        .await
        .map_err(|e| ApiError::internal(format!("Graph retrieval failed: {}", e)))?;

    let frontend = graph.to_frontend();
    let node_count = frontend.nodes.len();
    let edge_count = frontend.links.len();

    Ok(Json(json!({
        "graph": frontend,
        "node_count": node_count,
        "edge_count": edge_count,
    })))
}

/// Rank graph nodes by relevance using the insight model.
pub async fn search_gemini(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<Value>, ApiError> {
    require_query(&request.query)?;

    if state.demo && state.runtime.is_none() {
        let graph = demo::sample_graph();
        let relevant: Vec<Value> = graph
            .nodes
            .iter()
            .take(3)
            .map(|node| {
                json!({
                    "id": node.id,
                    "name": node.name,
                    "type": node.node_type,
                    "relevance_score": 0.8,
                    "relevance_reasoning": "Demo mode: top nodes returned without model ranking",
                })
            })
            .collect();
        return Ok(Json(json!({
            "analysis_summary": "Demo-mode relevance ranking over the sample graph",
            "relevant_nodes": relevant,
            "summary": "The sample knowledge graph links legal and HR policy documents \
                        to GDPR, CCPA, and data retention obligations.",
            "total_analyzed": graph.nodes.len(),
            "total_relevant": 3,
        })));
    }

    let rt = runtime(&state)?;

    let graph = rt
        .store
        .knowledge_graph(rt.config.agents.graph_node_limit)
        .await
        .map_err(|e| ApiError::internal(format!("Graph retrieval failed: {}", e)))?;

    let result = rt
        .insight
        .find_relevant_nodes(&request.query, &graph.nodes, 10)
        .await
        .map_err(|e| ApiError::internal(format!("Node search failed: {}", e)))?;

    let summary = rt
        .insight
        .generate_summary(&request.query, &result.relevant_nodes)
        .await;

    let mut body = serde_json::to_value(&result)
        .map_err(|e| ApiError::internal(format!("Failed to serialize result: {}", e)))?;
    body["summary"] = json!(summary);

    Ok(Json(body))
}

/// Generate structured insights over the visible graph.
pub async fn generate_insights(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InsightRequest>,
) -> Result<Json<Value>, ApiError> {
    require_query(&request.query)?;

    if state.demo && state.runtime.is_none() {
        return Ok(Json(json!({
            "summary": "The sample graph shows legal and HR documents anchored by privacy regulations.",
            "key_findings": [
                "GDPR is the most connected entity in the graph",
                "Data retention obligations span both departments",
            ],
            "relationship_patterns": ["Departments own documents which reference regulations"],
            "knowledge_gaps": ["No financial compliance documents are present"],
            "strategic_insights": ["Consolidating retention policies would reduce duplication"],
            "data_quality_assessment": "good",
            "suggested_next_steps": ["Upload vendor audit reports for fuller coverage"],
            "confidence_score": 0.85,
            "metadata": {
                "query": request.query,
                "nodes_analyzed": request.visible_nodes.len(),
                "total_nodes": demo::sample_graph().nodes.len(),
            },
        })));
    }

    let rt = runtime(&state)?;

    let graph = rt
        .store
        .knowledge_graph(rt.config.agents.graph_node_limit)
        .await
        .map_err(|e| ApiError::internal(format!("Graph retrieval failed: {}", e)))?;

    let insights = rt
        .insight
        .generate_insights(&request.query, &request.visible_nodes, &graph.to_frontend())
        .await;

    Ok(Json(insights))
}
