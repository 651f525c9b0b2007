// file: src/models/document.rs
// description: core document models with content hashing
// reference: internal data structures

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// A document as stored in the vector database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub filename: String,
    pub document_type: String,
    pub content: String,
    pub content_hash: String,
    pub storage_uri: String,
    pub entities: Vec<String>,
    pub upload_metadata: serde_json::Value,
    pub created_at: u64,
}

impl Document {
    pub fn new(filename: String, document_type: String, content: String) -> Self {
        let content_hash = Self::compute_hash(&content);
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        Self {
            id: Uuid::new_v4().to_string(),
            filename,
            document_type,
            content,
            content_hash,
            storage_uri: String::new(),
            entities: Vec::new(),
            upload_metadata: serde_json::Value::Object(serde_json::Map::new()),
            created_at,
        }
    }

    fn compute_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// A document returned from a similarity query, carrying its certainty score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub id: String,
    pub filename: String,
    pub document_type: String,
    pub content: String,
    pub storage_uri: String,
    pub entities: Vec<String>,

    /// Similarity certainty in 0.0-1.0 (higher is more similar).
    pub certainty: f32,

    /// Raw vector distance (lower is more similar).
    pub distance: Option<f32>,
}

impl RetrievedDocument {
    /// Truncated content preview for prompts and graph nodes.
    pub fn content_preview(&self, max_chars: usize) -> String {
        if self.content.chars().count() > max_chars {
            let preview: String = self.content.chars().take(max_chars).collect();
            format!("{}...", preview)
        } else {
            self.content.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = Document::new(
            "policy.pdf".to_string(),
            "policy".to_string(),
            "Data retention policy".to_string(),
        );

        assert_eq!(doc.filename, "policy.pdf");
        assert!(!doc.id.is_empty());
        assert!(!doc.content_hash.is_empty());
        assert!(doc.entities.is_empty());
        assert!(doc.storage_uri.is_empty());
    }

    #[test]
    fn test_hash_consistency() {
        let a = Document::new("a".into(), "general".into(), "Same content".into());
        let b = Document::new("b".into(), "general".into(), "Same content".into());
        assert_eq!(a.content_hash, b.content_hash);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_content_preview_truncation() {
        let doc = RetrievedDocument {
            id: "1".into(),
            filename: "f".into(),
            document_type: "general".into(),
            content: "abcdefghij".into(),
            storage_uri: String::new(),
            entities: vec![],
            certainty: 0.9,
            distance: None,
        };

        assert_eq!(doc.content_preview(5), "abcde...");
        assert_eq!(doc.content_preview(20), "abcdefghij");
    }
}
