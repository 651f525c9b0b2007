// file: tests/store_roundtrip.rs
// description: LanceDB document store integration tests over a temp directory

use context_agents::config::StorageConfig;
use context_agents::models::Document;
use context_agents::services::DocumentStore;
use serde_json::json;

fn temp_storage_config(dir: &tempfile::TempDir) -> StorageConfig {
    StorageConfig {
        uri: dir.path().to_string_lossy().into_owned(),
        table_name: "documents".to_string(),
        embedding_api_key: None,
        embedding_model: "openai/gpt-oss-120b".to_string(),
        embedding_base_url: "https://api.groq.com/openai/v1".to_string(),
    }
}

fn policy_document(filename: &str, content: &str, entities: &[&str]) -> Document {
    let mut document = Document::new(
        filename.to_string(),
        "policy".to_string(),
        content.to_string(),
    );
    document.entities = entities.iter().map(|s| s.to_string()).collect();
    document.upload_metadata = json!({"department": "Legal"});
    document
}

#[tokio::test]
async fn insert_and_count_documents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = DocumentStore::new(temp_storage_config(&dir))
        .await
        .expect("store should connect");

    assert_eq!(store.document_count().await.unwrap(), 0);

    let doc = policy_document(
        "retention_policy.txt",
        "Records are retained for seven years before secure disposal. \
         The retention schedule is reviewed annually by the legal team.",
        &["Data Retention"],
    );
    store.insert_document(&doc).await.expect("insert");

    assert_eq!(store.document_count().await.unwrap(), 1);

    let second = policy_document(
        "privacy_policy.txt",
        "Personal data is processed under GDPR requirements, including \
         the right of access and the right to erasure for data subjects.",
        &["GDPR"],
    );
    store.insert_document(&second).await.expect("second insert");

    assert_eq!(store.document_count().await.unwrap(), 2);
}

#[tokio::test]
async fn query_returns_stored_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = DocumentStore::new(temp_storage_config(&dir))
        .await
        .expect("store should connect");

    let doc = policy_document(
        "privacy_policy.txt",
        "Personal data is processed under GDPR requirements, including \
         the right of access and the right to erasure for data subjects.",
        &["GDPR"],
    );
    store.insert_document(&doc).await.expect("insert");

    let results = store
        .query_documents("data subject rights", 5)
        .await
        .expect("query");

    assert_eq!(results.len(), 1);
    let retrieved = &results[0];
    assert_eq!(retrieved.filename, "privacy_policy.txt");
    assert_eq!(retrieved.document_type, "policy");
    assert_eq!(retrieved.entities, vec!["GDPR".to_string()]);
    assert!(retrieved.certainty > 0.0 && retrieved.certainty <= 1.0);
}

#[tokio::test]
async fn empty_store_returns_empty_results() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = DocumentStore::new(temp_storage_config(&dir))
        .await
        .expect("store should connect");

    let results = store.query_documents("anything", 5).await.expect("query");
    assert!(results.is_empty());

    let graph = store.knowledge_graph(100).await.expect("graph");
    assert!(graph.nodes.is_empty());
    assert!(graph.edges.is_empty());
}

#[tokio::test]
async fn knowledge_graph_links_documents_to_entities() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = DocumentStore::new(temp_storage_config(&dir))
        .await
        .expect("store should connect");

    let doc = policy_document(
        "vendor_agreement.txt",
        "This vendor agreement requires GDPR-equivalent safeguards from \
         all third-party processors handling company data.",
        &["GDPR", "Vendor Management"],
    );
    store.insert_document(&doc).await.expect("insert");

    let graph = store.knowledge_graph(100).await.expect("graph");

    // One document node plus two entity nodes
    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.edges.len(), 2);
    assert!(graph.edges.iter().all(|e| e.label == "contains"));

    let doc_node = graph
        .nodes
        .iter()
        .find(|n| n.node_type == "policy")
        .expect("document node");
    assert_eq!(doc_node.label, "vendor_agreement.txt");
    assert!(!doc_node.content_preview.is_empty());
}
