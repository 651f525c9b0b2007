// file: tests/demo_api.rs
// description: HTTP API integration tests against the demo-mode router

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use context_agents::{AppState, build_router};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn demo_router() -> axum::Router {
    build_router(Arc::new(AppState::demo_only()))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

fn json_post(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

#[tokio::test]
async fn root_reports_demo_mode() {
    let response = demo_router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["service"], "context-agents");
    assert_eq!(json["mode"], "demo");
}

#[tokio::test]
async fn health_is_healthy_in_demo_mode() {
    let response = demo_router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["services"]["vector_store"], "demo_mode");
    assert_eq!(json["agents_ready"], true);
}

#[tokio::test]
async fn graph_returns_sample_nodes_and_links() {
    let response = demo_router()
        .oneshot(
            Request::builder()
                .uri("/graph")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["node_count"].as_u64().unwrap() > 0);
    assert!(json["graph"]["nodes"].is_array());
    // Frontend shape uses "links" with strength, not labelled edges
    assert!(json["graph"]["links"][0]["strength"].is_number());
    assert!(json["graph"]["nodes"][0]["name"].is_string());
}

#[tokio::test]
async fn ask_returns_canned_answer() {
    let response = demo_router()
        .oneshot(json_post(
            "/ask",
            r#"{"query": "What is our privacy policy?"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Reasoning response generated");
    assert_eq!(json["query"], "What is our privacy policy?");
    assert!(json["answer"].as_str().unwrap().contains("Privacy Policy 2024"));
}

#[tokio::test]
async fn ask_rejects_empty_query() {
    let response = demo_router()
        .oneshot(json_post("/ask", r#"{"query": ""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["detail"], "Query is required");
}

#[tokio::test]
async fn ask_rejects_missing_query_field() {
    let response = demo_router()
        .oneshot(json_post("/ask", r#"{}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

fn multipart_post(path: &str, boundary: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .expect("request should build")
}

#[tokio::test]
async fn upload_accepts_multipart_document() {
    let boundary = "demo-upload-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"retention_policy.txt\"\r\n\
         Content-Type: text/plain\r\n\
         \r\n\
         Customer records are retained for 7 years after contract end.\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"document_type\"\r\n\
         \r\n\
         policy\r\n\
         --{b}--\r\n",
        b = boundary
    );

    let response = demo_router()
        .oneshot(multipart_post("/upload", boundary, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Document processed successfully");
    assert_eq!(json["filename"], "retention_policy.txt");
    assert!(json["document_id"].is_string());
    assert!(
        json["storage_uri"]
            .as_str()
            .unwrap()
            .starts_with("s3://demo-bucket/")
    );
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let boundary = "demo-upload-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"document_type\"\r\n\
         \r\n\
         policy\r\n\
         --{b}--\r\n",
        b = boundary
    );

    let response = demo_router()
        .oneshot(multipart_post("/upload", boundary, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["detail"], "No file provided");
}

#[tokio::test]
async fn run_agents_returns_completed_workflow() {
    let response = demo_router()
        .oneshot(json_post(
            "/agents/run",
            r#"{"query": "Summarize compliance posture"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["agents_executed"], 4);
    assert_eq!(json["result"]["workflow_status"], "completed");
    assert_eq!(
        json["result"]["planning_results"]["workflow_plan"]["steps"]
            .as_array()
            .unwrap()
            .len(),
        3
    );
}

#[tokio::test]
async fn agent_status_reports_all_agents_ready() {
    let response = demo_router()
        .oneshot(
            Request::builder()
                .uri("/agents/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["orchestrator_status"], "operational");
    assert_eq!(json["summary"]["total"], 4);
    assert_eq!(json["agents"]["PlannerAgent"], "ready");
}

#[tokio::test]
async fn search_gemini_returns_ranked_nodes() {
    let response = demo_router()
        .oneshot(json_post(
            "/search/gemini",
            r#"{"query": "privacy regulations"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total_relevant"], 3);
    assert!(json["relevant_nodes"][0]["relevance_score"].is_number());
}

#[tokio::test]
async fn search_gemini_includes_summary() {
    let response = demo_router()
        .oneshot(json_post(
            "/search/gemini",
            r#"{"query": "data retention obligations"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(!json["summary"].as_str().unwrap().is_empty());
    assert!(json["analysis_summary"].is_string());
}

#[tokio::test]
async fn insights_include_required_fields() {
    let response = demo_router()
        .oneshot(json_post(
            "/insights/generate",
            r#"{"query": "compliance coverage", "visible_nodes": []}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    for field in [
        "summary",
        "key_findings",
        "relationship_patterns",
        "knowledge_gaps",
        "strategic_insights",
        "data_quality_assessment",
        "suggested_next_steps",
        "confidence_score",
    ] {
        assert!(json.get(field).is_some(), "missing field {}", field);
    }
    assert_eq!(json["metadata"]["query"], "compliance coverage");
}

#[tokio::test]
async fn reset_agents_responds_in_demo_mode() {
    let response = demo_router()
        .oneshot(json_post("/agents/reset", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["mode"], "demo");
}
