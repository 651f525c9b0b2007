// file: src/services/object_store.rs
// description: S3-compatible object store client for raw document archival
// reference: https://docs.aws.amazon.com/AmazonS3/latest/API/API_PutObject.html

use crate::config::ObjectStoreConfig;
use crate::error::{AgentError, Result};
use reqwest::Client;
use tracing::{debug, info};

pub struct ObjectStore {
    client: Client,
    endpoint: String,
    bucket: String,
}

impl ObjectStore {
    pub fn new(config: &ObjectStoreConfig) -> Option<Self> {
        let endpoint = config.endpoint.clone()?;
        Some(Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
        })
    }

    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String> {
        let url = format!("{}/{}/{}", self.endpoint, self.bucket, key);

        debug!("Uploading {} bytes to {}", body.len(), url);

        let response = self
            .client
            .put(&url)
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| AgentError::ObjectStore(format!("Failed to upload object: {}", e)))?;

        if !response.status().is_success() {
            return Err(AgentError::ObjectStore(format!(
                "Object upload failed with status {}",
                response.status()
            )));
        }

        let uri = format!("s3://{}/{}", self.bucket, key);
        info!("Stored object at {}", uri);
        Ok(uri)
    }

    /// Store the original uploaded file under the document's prefix.
    pub async fn store_document(
        &self,
        doc_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<String> {
        let key = format!("documents/{}/{}", doc_id, filename);
        self.put_object(&key, bytes, "application/octet-stream")
            .await
    }

    /// Store the extracted plain text next to the original file.
    pub async fn store_extracted_text(&self, doc_id: &str, text: &str) -> Result<String> {
        let key = format!("documents/{}/extracted_text.txt", doc_id);
        self.put_object(&key, text.as_bytes().to_vec(), "text/plain")
            .await
    }

    pub async fn health_check(&self) -> String {
        let url = format!("{}/{}", self.endpoint, self.bucket);
        match self.client.head(&url).send().await {
            Ok(response) if response.status().is_success() => "connected".to_string(),
            Ok(response) => format!("error: status {}", response.status()),
            Err(e) => format!("error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_endpoint() {
        let config = ObjectStoreConfig {
            endpoint: None,
            bucket: "documents".to_string(),
        };
        assert!(ObjectStore::new(&config).is_none());

        let config = ObjectStoreConfig {
            endpoint: Some("http://localhost:9000/".to_string()),
            bucket: "documents".to_string(),
        };
        let store = ObjectStore::new(&config).unwrap();
        assert_eq!(store.endpoint, "http://localhost:9000");
    }
}
