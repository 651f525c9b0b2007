// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use context_agents::utils::{
    HealthCheck, HealthReport, OperationTimer, format_error, format_info, format_success,
    format_warning,
};
use context_agents::{AppState, Config, Document, Runtime};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "context_agents")]
#[command(version = "0.1.0")]
#[command(about = "Multi-agent document intelligence over LanceDB", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,

        /// Serve canned sample data without backing services
        #[arg(long)]
        demo: bool,
    },

    /// Ingest a document from disk
    Upload {
        /// Path to the file to ingest
        file: PathBuf,

        #[arg(short, long, default_value = "general")]
        document_type: String,

        /// Arbitrary JSON metadata attached to the document
        #[arg(short, long, default_value = "{}")]
        metadata: String,
    },

    /// Ask a question against the document store
    Ask {
        query: String,

        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Run the full four-agent workflow for a query
    Run { query: String },

    /// Print the knowledge graph as JSON
    Graph {
        #[arg(short, long)]
        pretty: bool,
    },

    /// Check connectivity of all backing services
    Health,

    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    context_agents::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Context Agents");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Serve { host, port, demo } => {
            cmd_serve(config, host, port, demo).await?;
        }
        Commands::Upload {
            file,
            document_type,
            metadata,
        } => {
            cmd_upload(&config, &file, &document_type, &metadata).await?;
        }
        Commands::Ask { query, limit } => {
            cmd_ask(&config, &query, limit).await?;
        }
        Commands::Run { query } => {
            cmd_run(&config, &query).await?;
        }
        Commands::Graph { pretty } => {
            cmd_graph(&config, pretty).await?;
        }
        Commands::Health => {
            cmd_health(&config).await?;
        }
        Commands::Stats => {
            cmd_stats(&config).await?;
        }
    }

    Ok(())
}

async fn cmd_serve(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
    demo: bool,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let demo = demo || config.server.demo_mode;

    let state = if demo {
        info!("Starting in demo mode with sample data");
        Arc::new(AppState::demo_only())
    } else {
        let runtime = Runtime::from_config(config.clone())
            .await
            .context("Failed to initialize backing services")?;
        Arc::new(AppState::with_runtime(runtime, false))
    };

    let host = config.server.host.clone();
    let port = config.server.port;

    context_agents::serve(state, &host, port)
        .await
        .context("Server exited with an error")?;

    Ok(())
}

async fn cmd_upload(
    config: &Config,
    file: &PathBuf,
    document_type: &str,
    metadata: &str,
) -> Result<()> {
    let timer = OperationTimer::new("document upload");

    let runtime = Runtime::from_config(config.clone())
        .await
        .context("Failed to initialize backing services")?;

    let bytes = std::fs::read(file)
        .with_context(|| format!("Failed to read file {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.bin".to_string());

    let upload_metadata: serde_json::Value =
        serde_json::from_str(metadata).context("Metadata is not valid JSON")?;

    let content = runtime.document_ai.extract_text(&bytes).await;
    if content.trim().is_empty() {
        println!("{}", format_error("No text could be extracted from the file"));
        return Ok(());
    }

    let mut document = Document::new(filename.clone(), document_type.to_string(), content);
    document.upload_metadata = upload_metadata;

    if let Some(object_store) = &runtime.object_store {
        match object_store
            .store_document(&document.id, &filename, bytes)
            .await
        {
            Ok(uri) => {
                document.storage_uri = uri;
                if let Err(e) = object_store
                    .store_extracted_text(&document.id, &document.content)
                    .await
                {
                    warn!("Failed to archive extracted text: {}", e);
                }
            }
            Err(e) => warn!("Failed to archive original file: {}", e),
        }
    } else {
        println!("{}", format_warning("Object store not configured, skipping archival"));
    }

    document.entities = runtime.document_ai.detect_entities(&document.content).await;

    let sentiment = runtime.document_ai.detect_sentiment(&document.content).await;
    if sentiment.sentiment != "unknown" {
        println!(
            "{}",
            format_info(&format!("Document sentiment: {}", sentiment.sentiment))
        );
    }

    let key_phrases = runtime.document_ai.detect_key_phrases(&document.content).await;
    if !key_phrases.is_empty() {
        println!(
            "{}",
            format_info(&format!("Key phrases: {}", key_phrases.join(", ")))
        );
    }

    runtime
        .store
        .insert_document(&document)
        .await
        .context("Failed to index document")?;

    println!("{}", format_success(&format!("Ingested {}", filename)));
    println!("  Document ID: {}", document.id);
    if !document.storage_uri.is_empty() {
        println!("  Storage URI: {}", document.storage_uri);
    }
    println!("  Entities: {}", document.entities.join(", "));

    timer.finish();
    Ok(())
}

async fn cmd_ask(config: &Config, query: &str, limit: usize) -> Result<()> {
    let runtime = Runtime::from_config(config.clone())
        .await
        .context("Failed to initialize backing services")?;

    let documents = runtime
        .store
        .query_documents(query, limit)
        .await
        .context("Document search failed")?;

    if documents.is_empty() {
        println!("\nNo relevant documents found for: \"{}\"\n", query);
        println!("Upload documents first with the `upload` command.");
        return Ok(());
    }

    let context: Vec<String> = documents
        .iter()
        .take(3)
        .map(|doc| format!("[{}]\n{}", doc.filename, doc.content_preview(1500)))
        .collect();

    let prompt = format!(
        "Answer the question using only the document context below.\n\n\
         Context:\n{}\n\nQuestion: {}",
        context.join("\n\n"),
        query
    );

    let answer = runtime
        .reasoning
        .query(&prompt)
        .await
        .context("Answer generation failed")?;

    println!("\nQuestion: {}\n", query);
    println!("{}\n", answer);
    println!("Sources:");
    for doc in &documents {
        println!("  - {} (certainty {:.2})", doc.filename, doc.certainty);
    }

    Ok(())
}

async fn cmd_run(config: &Config, query: &str) -> Result<()> {
    let runtime = Runtime::from_config(config.clone())
        .await
        .context("Failed to initialize backing services")?;

    let result = runtime
        .orchestrator
        .process_query(query)
        .await
        .context("Agent workflow failed")?;

    println!(
        "\nWorkflow {} in {:.2}s ({}/{} agents completed)\n",
        result.workflow_status,
        result.workflow_metadata.workflow_duration_secs,
        result.workflow_metadata.agents_completed,
        result.workflow_metadata.total_agents
    );
    println!("{}", result.final_report.summary);
    println!(
        "\nConfidence: {:.2} ({})",
        result.workflow_metadata.confidence_score,
        result
            .final_report
            .structured_report
            .executive_summary
            .confidence_level
    );

    Ok(())
}

async fn cmd_graph(config: &Config, pretty: bool) -> Result<()> {
    let runtime = Runtime::from_config(config.clone())
        .await
        .context("Failed to initialize backing services")?;

    let graph = runtime
        .store
        .knowledge_graph(config.agents.graph_node_limit)
        .await
        .context("Graph retrieval failed")?;

    let frontend = graph.to_frontend();
    let output = if pretty {
        serde_json::to_string_pretty(&frontend)?
    } else {
        serde_json::to_string(&frontend)?
    };
    println!("{}", output);

    Ok(())
}

async fn cmd_health(config: &Config) -> Result<()> {
    let runtime = Runtime::from_config(config.clone())
        .await
        .context("Failed to initialize backing services")?;

    let mut checks = Vec::new();

    let start = Instant::now();
    match runtime.store.ping().await {
        Ok(_) => checks.push(HealthCheck::healthy("vector_store", start.elapsed())),
        Err(e) => checks.push(HealthCheck::unhealthy(
            "vector_store",
            e.to_string(),
            start.elapsed(),
        )),
    }

    let start = Instant::now();
    match &runtime.object_store {
        Some(store) => {
            let status = store.health_check().await;
            if status == "connected" {
                checks.push(HealthCheck::healthy("object_store", start.elapsed()));
            } else {
                checks.push(HealthCheck::unhealthy("object_store", status, start.elapsed()));
            }
        }
        None => checks.push(HealthCheck::degraded(
            "object_store",
            "not configured".to_string(),
            start.elapsed(),
        )),
    }

    let start = Instant::now();
    let status = runtime.document_ai.health_check();
    if status == "configured" {
        checks.push(HealthCheck::healthy("document_ai", start.elapsed()));
    } else {
        checks.push(HealthCheck::degraded("document_ai", status, start.elapsed()));
    }

    let start = Instant::now();
    let status = runtime.reasoning.health_check().await;
    if status == "connected" {
        checks.push(HealthCheck::healthy("reasoning", start.elapsed()));
    } else {
        checks.push(HealthCheck::degraded("reasoning", status, start.elapsed()));
    }

    let start = Instant::now();
    let status = runtime.insight.health_check().await;
    if status == "connected" {
        checks.push(HealthCheck::healthy("insight", start.elapsed()));
    } else {
        checks.push(HealthCheck::degraded("insight", status, start.elapsed()));
    }

    let report = HealthReport::new(checks, env!("CARGO_PKG_VERSION").to_string());
    println!("{}", report.format());

    Ok(())
}

async fn cmd_stats(config: &Config) -> Result<()> {
    let runtime = Runtime::from_config(config.clone())
        .await
        .context("Failed to initialize backing services")?;

    let doc_count = runtime.store.document_count().await?;
    info!("Total documents: {}", doc_count);
    println!("Total documents: {}", doc_count);

    Ok(())
}
