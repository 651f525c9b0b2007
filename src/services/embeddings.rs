// file: src/services/embeddings.rs
// description: hosted embeddings API client used for similarity queries
// reference: https://platform.openai.com/docs/api-reference/embeddings

use crate::error::{AgentError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    input: Vec<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

pub struct EmbeddingClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl EmbeddingClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    pub async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embeddings", self.base_url.trim_end_matches('/'));

        let request = EmbeddingRequest {
            input: vec![text.to_string()],
            model: self.model.clone(),
        };

        debug!("Requesting embedding for {} chars", text.len());

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Llm(format!("Failed to send embedding request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AgentError::Llm(format!(
                "Embedding request failed with status {}: {}",
                status, error_text
            )));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Llm(format!("Failed to parse embedding response: {}", e)))?;

        if let Some(embedding_data) = embedding_response.data.into_iter().next() {
            debug!(
                "Received embedding of dimension {}",
                embedding_data.embedding.len()
            );
            Ok(embedding_data.embedding)
        } else {
            Err(AgentError::Llm(
                "No embedding data returned from API".to_string(),
            ))
        }
    }

    /// Generate a fallback embedding when the API is unavailable.
    /// Deterministic per input so repeated queries stay stable.
    pub fn generate_fallback_embedding(text: &str, dim: usize) -> Vec<f32> {
        warn!("Using fallback embedding generation");
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_add(b as u64));
        (0..dim)
            .map(|i| (hash.wrapping_add(i as u64) % 1000) as f32 / 1000.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_embedding() {
        let embedding = EmbeddingClient::generate_fallback_embedding("test text", 384);
        assert_eq!(embedding.len(), 384);
        assert!(embedding.iter().all(|&x| (0.0..=1.0).contains(&x)));
    }

    #[test]
    fn test_fallback_embedding_deterministic() {
        let emb1 = EmbeddingClient::generate_fallback_embedding("same text", 128);
        let emb2 = EmbeddingClient::generate_fallback_embedding("same text", 128);
        assert_eq!(emb1, emb2);
    }
}
