// file: src/services/store.rs
// description: LanceDB document store with vector search and graph projection
// reference: https://docs.rs/lancedb

use crate::config::StorageConfig;
use crate::error::{AgentError, Result};
use crate::models::{Document, GraphEdge, GraphNode, KnowledgeGraph, RetrievedDocument};
use crate::services::embeddings::EmbeddingClient;
use arrow_array::{
    FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray, UInt64Array,
};
use arrow_schema::{DataType, Field, Schema};
use futures::StreamExt;
use lance_arrow::FixedSizeListArrayExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, Table, connect};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fixed embedding dimension for the documents table.
pub const EMBEDDING_DIM: usize = 768;

#[derive(Clone)]
pub struct DocumentStore {
    connection: Connection,
    config: StorageConfig,
    embedding_client: Option<Arc<EmbeddingClient>>,
}

impl DocumentStore {
    pub async fn new(config: StorageConfig) -> Result<Self> {
        info!("Connecting to LanceDB at {}", config.uri);

        let connection = connect(&config.uri)
            .execute()
            .await
            .map_err(|e| AgentError::Storage(format!("Failed to connect to LanceDB: {}", e)))?;

        let embedding_client = config.embedding_api_key.as_ref().map(|key| {
            Arc::new(EmbeddingClient::new(
                key.clone(),
                config.embedding_model.clone(),
                config.embedding_base_url.clone(),
            ))
        });

        if embedding_client.is_some() {
            info!("Document store initialized with API embeddings");
        } else {
            warn!("Document store initialized without embedding API key - using fallback embeddings");
        }

        Ok(Self {
            connection,
            config,
            embedding_client,
        })
    }

    pub async fn ping(&self) -> Result<bool> {
        debug!("Checking LanceDB connection");

        match self.connection.table_names().execute().await {
            Ok(_) => Ok(true),
            Err(e) => Err(AgentError::Storage(format!(
                "LanceDB connection failed: {}",
                e
            ))),
        }
    }

    pub async fn table_exists(&self) -> Result<bool> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| AgentError::Storage(format!("Failed to list tables: {}", e)))?;

        Ok(table_names.iter().any(|name| name == &self.config.table_name))
    }

    async fn get_table(&self) -> Result<Table> {
        self.connection
            .open_table(&self.config.table_name)
            .execute()
            .await
            .map_err(|e| {
                AgentError::Storage(format!(
                    "Failed to open table {}: {}",
                    self.config.table_name, e
                ))
            })
    }

    pub async fn document_count(&self) -> Result<u64> {
        if !self.table_exists().await? {
            return Ok(0);
        }

        let table = self.get_table().await?;
        let count = table
            .count_rows(None)
            .await
            .map_err(|e| AgentError::Storage(format!("Failed to count rows: {}", e)))?;

        Ok(count as u64)
    }

    /// Returns the Arrow schema for the documents table with vector embeddings
    fn documents_schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("filename", DataType::Utf8, false),
            Field::new("document_type", DataType::Utf8, false),
            Field::new("content", DataType::Utf8, false),
            Field::new("content_hash", DataType::Utf8, false),
            Field::new("storage_uri", DataType::Utf8, false),
            // Entities and upload metadata are stored as JSON strings
            Field::new("entities", DataType::Utf8, false),
            Field::new("upload_metadata", DataType::Utf8, false),
            Field::new("created_at", DataType::UInt64, false),
            // Vector embedding field for similarity search
            Field::new(
                "embedding",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    EMBEDDING_DIM as i32,
                ),
                false,
            ),
        ]))
    }

    /// Insert a single document with its embedding.
    /// Creates the table on first insert.
    pub async fn insert_document(&self, document: &Document) -> Result<String> {
        let schema = Self::documents_schema();
        let embedding = self.generate_embedding(&document.content).await;
        let record_batch = Self::create_record_batch(schema.clone(), document, embedding)?;

        if !self.table_exists().await? {
            self.connection
                .create_table(
                    &self.config.table_name,
                    RecordBatchIterator::new(vec![Ok(record_batch)], schema.clone()),
                )
                .execute()
                .await
                .map_err(|e| AgentError::Storage(format!("Failed to create table: {}", e)))?;
            info!("Created new table: {}", self.config.table_name);
        } else {
            let table = self.get_table().await?;
            table
                .add(RecordBatchIterator::new(vec![Ok(record_batch)], schema))
                .execute()
                .await
                .map_err(|e| AgentError::Storage(format!("Failed to insert document: {}", e)))?;
        }

        debug!("Inserted document: {}", document.id);
        Ok(document.id.clone())
    }

    fn create_record_batch(
        schema: Arc<Schema>,
        document: &Document,
        embedding: Vec<f32>,
    ) -> Result<RecordBatch> {
        let ids = StringArray::from(vec![document.id.clone()]);
        let filenames = StringArray::from(vec![document.filename.clone()]);
        let document_types = StringArray::from(vec![document.document_type.clone()]);
        let contents = StringArray::from(vec![document.content.clone()]);
        let content_hashes = StringArray::from(vec![document.content_hash.clone()]);
        let storage_uris = StringArray::from(vec![document.storage_uri.clone()]);

        let entities_json = serde_json::to_string(&document.entities)?;
        let entities = StringArray::from(vec![entities_json]);

        let metadata_json = serde_json::to_string(&document.upload_metadata)?;
        let upload_metadata = StringArray::from(vec![metadata_json]);

        let created_ats = UInt64Array::from(vec![document.created_at]);

        let embedding_values: Float32Array = embedding.iter().copied().map(Some).collect();
        let embedding_list =
            FixedSizeListArray::try_new_from_values(embedding_values, EMBEDDING_DIM as i32)
                .map_err(|e| {
                    AgentError::Storage(format!("Failed to create embedding array: {}", e))
                })?;

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(ids),
                Arc::new(filenames),
                Arc::new(document_types),
                Arc::new(contents),
                Arc::new(content_hashes),
                Arc::new(storage_uris),
                Arc::new(entities),
                Arc::new(upload_metadata),
                Arc::new(created_ats),
                Arc::new(embedding_list),
            ],
        )
        .map_err(|e| AgentError::Storage(format!("Failed to create record batch: {}", e)))
    }

    /// Generate an embedding via the API, falling back to deterministic
    /// hash embeddings when the API is unavailable.
    async fn generate_embedding(&self, text: &str) -> Vec<f32> {
        if let Some(ref client) = self.embedding_client {
            match client.generate_embedding(text).await {
                Ok(embedding) if embedding.len() == EMBEDDING_DIM => {
                    debug!("Generated API embedding for {} chars", text.len());
                    return embedding;
                }
                Ok(embedding) => {
                    warn!(
                        "Embedding API returned dimension {}, expected {}. Using fallback.",
                        embedding.len(),
                        EMBEDDING_DIM
                    );
                }
                Err(e) => {
                    warn!("Embedding API failed: {}. Using fallback.", e);
                }
            }
        }
        EmbeddingClient::generate_fallback_embedding(text, EMBEDDING_DIM)
    }

    /// Search for documents by vector similarity against the query text.
    ///
    /// Returns results ordered by similarity (highest first), with
    /// distance converted to certainty as `1 / (1 + distance)`.
    pub async fn query_documents(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RetrievedDocument>> {
        if !self.table_exists().await? {
            warn!("Table does not exist, returning empty results");
            return Ok(Vec::new());
        }

        let table = self.get_table().await?;
        let query_embedding = self.generate_embedding(query).await;

        info!("Performing vector search with limit {}", limit);

        let search = table
            .vector_search(query_embedding)
            .map_err(|e| AgentError::Storage(format!("Failed to create vector search: {}", e)))?
            .limit(limit);

        let mut results_stream = search
            .execute()
            .await
            .map_err(|e| AgentError::Storage(format!("Vector search failed: {}", e)))?;

        let mut results = Vec::new();

        while let Some(batch_result) = results_stream.next().await {
            let batch = batch_result
                .map_err(|e| AgentError::Storage(format!("Failed to read result batch: {}", e)))?;

            let num_rows = batch.num_rows();

            let ids = string_column(&batch, "id")?;
            let filenames = string_column(&batch, "filename")?;
            let document_types = string_column(&batch, "document_type")?;
            let contents = string_column(&batch, "content")?;
            let storage_uris = string_column(&batch, "storage_uri")?;
            let entities_col = string_column(&batch, "entities")?;

            // LanceDB returns the distance score in a special column
            let distances = batch
                .column_by_name("_distance")
                .and_then(|col| col.as_any().downcast_ref::<Float32Array>());

            for i in 0..num_rows {
                let (certainty, distance) = if let Some(dist_array) = distances {
                    let dist = dist_array.value(i);
                    (1.0 / (1.0 + dist), Some(dist))
                } else {
                    (1.0, None)
                };

                let entities: Vec<String> =
                    serde_json::from_str(entities_col.value(i)).unwrap_or_default();

                results.push(RetrievedDocument {
                    id: ids.value(i).to_string(),
                    filename: filenames.value(i).to_string(),
                    document_type: document_types.value(i).to_string(),
                    content: contents.value(i).to_string(),
                    storage_uri: storage_uris.value(i).to_string(),
                    entities,
                    certainty,
                    distance,
                });
            }
        }

        info!("Vector search returned {} results", results.len());
        Ok(results)
    }

    /// Project stored documents and their entities into a knowledge graph.
    ///
    /// Each document becomes a node, each distinct entity becomes a node,
    /// with "contains" edges from document to entity.
    pub async fn knowledge_graph(&self, limit: usize) -> Result<KnowledgeGraph> {
        let mut graph = KnowledgeGraph::default();

        if !self.table_exists().await? {
            info!("Table does not exist, returning empty graph");
            return Ok(graph);
        }

        let table = self.get_table().await?;

        let mut results_stream = table
            .query()
            .limit(limit)
            .execute()
            .await
            .map_err(|e| AgentError::Storage(format!("Graph query failed: {}", e)))?;

        let mut seen_entities: HashSet<String> = HashSet::new();
        let mut doc_index = 0usize;

        while let Some(batch_result) = results_stream.next().await {
            let batch = batch_result
                .map_err(|e| AgentError::Storage(format!("Failed to read result batch: {}", e)))?;

            let filenames = string_column(&batch, "filename")?;
            let document_types = string_column(&batch, "document_type")?;
            let contents = string_column(&batch, "content")?;
            let entities_col = string_column(&batch, "entities")?;

            for i in 0..batch.num_rows() {
                let doc_node_id = format!("doc_{}", doc_index);
                doc_index += 1;

                let content = contents.value(i);
                let preview: String = content.chars().take(100).collect();

                let entities: Vec<String> =
                    serde_json::from_str(entities_col.value(i)).unwrap_or_default();

                let mut doc_node = GraphNode::new(
                    doc_node_id.clone(),
                    filenames.value(i).to_string(),
                    document_types.value(i).to_string(),
                );
                doc_node.entities = entities.clone();
                doc_node.content_preview = preview;
                graph.nodes.push(doc_node);

                for entity in entities {
                    let entity_node_id = format!("entity_{}", entity);
                    if seen_entities.insert(entity.clone()) {
                        graph.nodes.push(GraphNode::new(
                            entity_node_id.clone(),
                            entity,
                            "entity".to_string(),
                        ));
                    }
                    graph.edges.push(GraphEdge {
                        source: doc_node_id.clone(),
                        target: entity_node_id,
                        label: "contains".to_string(),
                    });
                }
            }
        }

        info!(
            "Built knowledge graph with {} nodes and {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );
        Ok(graph)
    }
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| AgentError::Storage(format!("Missing '{}' column", name)))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| AgentError::Storage(format!("Invalid '{}' column type", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_documents_schema() {
        let schema = DocumentStore::documents_schema();
        assert_eq!(schema.fields().len(), 10);

        let embedding_field = schema.field_with_name("embedding").unwrap();
        assert!(matches!(
            embedding_field.data_type(),
            DataType::FixedSizeList(_, 768)
        ));
    }

    #[test]
    fn test_create_record_batch() {
        let mut document = Document::new(
            "policy.pdf".to_string(),
            "policy".to_string(),
            "Data retention policy text".to_string(),
        );
        document.entities = vec!["GDPR".to_string()];
        document.upload_metadata = json!({"department": "Legal"});

        let embedding = EmbeddingClient::generate_fallback_embedding("test", EMBEDDING_DIM);
        let batch = DocumentStore::create_record_batch(
            DocumentStore::documents_schema(),
            &document,
            embedding,
        )
        .unwrap();

        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.num_columns(), 10);
    }
}
