// file: src/server/mod.rs
// description: HTTP server setup, shared state, and router wiring
// reference: https://docs.rs/axum

pub mod error;
pub mod handlers;

use crate::agents::AgentOrchestrator;
use crate::config::Config;
use crate::error::{AgentError, Result};
use crate::services::{DocumentAiClient, DocumentStore, InsightClient, ObjectStore, ReasoningClient};
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Live service handles behind the API. Absent in pure demo mode.
pub struct Runtime {
    pub store: Arc<DocumentStore>,
    pub reasoning: Arc<ReasoningClient>,
    pub insight: Arc<InsightClient>,
    pub object_store: Option<Arc<ObjectStore>>,
    pub document_ai: Arc<DocumentAiClient>,
    pub orchestrator: Arc<AgentOrchestrator>,
    pub config: Config,
}

impl Runtime {
    pub async fn from_config(config: Config) -> Result<Self> {
        let store = Arc::new(DocumentStore::new(config.storage.clone()).await?);
        let reasoning = Arc::new(ReasoningClient::new(config.reasoning.clone()));
        let insight = Arc::new(InsightClient::new(config.insight.clone()));
        let object_store = ObjectStore::new(&config.object_store).map(Arc::new);
        let document_ai = Arc::new(DocumentAiClient::new(config.document_ai.clone()));

        let orchestrator = Arc::new(AgentOrchestrator::new(
            store.clone(),
            reasoning.clone(),
            document_ai.clone(),
            config.agents.clone(),
        ));
        orchestrator.initialize().await;

        Ok(Self {
            store,
            reasoning,
            insight,
            object_store,
            document_ai,
            orchestrator,
            config,
        })
    }
}

/// Shared application state for all handlers.
pub struct AppState {
    pub demo: bool,
    pub runtime: Option<Runtime>,
}

impl AppState {
    pub fn demo_only() -> Self {
        Self {
            demo: true,
            runtime: None,
        }
    }

    pub fn with_runtime(runtime: Runtime, demo: bool) -> Self {
        Self {
            demo,
            runtime: Some(runtime),
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/upload", post(handlers::upload))
        .route("/ask", post(handlers::ask))
        .route("/agents/run", post(handlers::run_agents))
        .route("/agents/status", get(handlers::agent_status))
        .route("/agents/reset", post(handlers::reset_agents))
        .route("/graph", get(handlers::graph))
        .route("/search/gemini", post(handlers::search_gemini))
        .route("/insights/generate", post(handlers::generate_insights))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>, host: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AgentError::Config(format!("Failed to bind {}: {}", addr, e)))?;

    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AgentError::Config(format!("Server error: {}", e)))?;

    Ok(())
}
