// file: src/services/document_ai.rs
// description: managed OCR and NLP client with local extraction fallbacks
// reference: https://docs.aws.amazon.com/textract/latest/dg/API_DetectDocumentText.html

use crate::config::DocumentAiConfig;
use crate::error::{AgentError, Result};
use crate::extractor::EntityExtractor;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

const AMZ_JSON: &str = "application/x-amz-json-1.1";

#[derive(Debug, Deserialize)]
struct DetectTextResponse {
    #[serde(rename = "Blocks", default)]
    blocks: Vec<TextBlock>,
}

#[derive(Debug, Deserialize)]
struct TextBlock {
    #[serde(rename = "BlockType")]
    block_type: String,
    #[serde(rename = "Text", default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct DetectEntitiesResponse {
    #[serde(rename = "Entities", default)]
    entities: Vec<DetectedEntity>,
}

#[derive(Debug, Deserialize)]
struct DetectedEntity {
    #[serde(rename = "Text")]
    text: String,
    #[serde(rename = "Score", default)]
    score: f32,
}

#[derive(Debug, Deserialize)]
struct DetectSentimentResponse {
    #[serde(rename = "Sentiment", default)]
    sentiment: String,
    #[serde(rename = "SentimentScore", default)]
    score: SentimentScores,
}

#[derive(Debug, Default, Deserialize)]
struct SentimentScores {
    #[serde(rename = "Positive", default)]
    positive: f32,
    #[serde(rename = "Negative", default)]
    negative: f32,
    #[serde(rename = "Neutral", default)]
    neutral: f32,
    #[serde(rename = "Mixed", default)]
    mixed: f32,
}

#[derive(Debug, Deserialize)]
struct DetectKeyPhrasesResponse {
    #[serde(rename = "KeyPhrases", default)]
    key_phrases: Vec<KeyPhrase>,
}

#[derive(Debug, Deserialize)]
struct KeyPhrase {
    #[serde(rename = "Text")]
    text: String,
    #[serde(rename = "Score", default)]
    score: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentResult {
    pub sentiment: String,
    pub positive: f32,
    pub negative: f32,
    pub neutral: f32,
    pub mixed: f32,
}

impl Default for SentimentResult {
    fn default() -> Self {
        Self {
            sentiment: "unknown".to_string(),
            positive: 0.0,
            negative: 0.0,
            neutral: 0.0,
            mixed: 0.0,
        }
    }
}

pub struct DocumentAiClient {
    client: Client,
    config: DocumentAiConfig,
}

impl DocumentAiClient {
    pub fn new(config: DocumentAiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn call(&self, target: &str, body: Value) -> Result<Value> {
        let endpoint = self
            .config
            .endpoint
            .as_ref()
            .ok_or_else(|| AgentError::DocumentAi("Document AI endpoint not configured".to_string()))?;

        let response = self
            .client
            .post(endpoint)
            .header("Content-Type", AMZ_JSON)
            .header("X-Amz-Target", target)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::DocumentAi(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            return Err(AgentError::DocumentAi(format!(
                "{} failed with status {}",
                target,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AgentError::DocumentAi(format!("Failed to parse {} response: {}", target, e)))
    }

    fn truncate(&self, text: &str) -> String {
        text.chars().take(self.config.max_text_chars).collect()
    }

    /// OCR the uploaded bytes into plain text.
    ///
    /// Falls back to lossy UTF-8 decoding when the managed service is
    /// unreachable, which covers plain-text uploads.
    pub async fn extract_text(&self, bytes: &[u8]) -> String {
        if self.config.endpoint.is_some() {
            let body = json!({
                "Document": { "Bytes": BASE64.encode(bytes) }
            });

            match self.call("Textract.DetectDocumentText", body).await {
                Ok(value) => match serde_json::from_value::<DetectTextResponse>(value) {
                    Ok(response) => {
                        let lines: Vec<String> = response
                            .blocks
                            .into_iter()
                            .filter(|b| b.block_type == "LINE")
                            .map(|b| b.text)
                            .collect();
                        debug!("OCR extracted {} lines", lines.len());
                        return lines.join("\n");
                    }
                    Err(e) => warn!("Unexpected OCR response shape: {}", e),
                },
                Err(e) => warn!("OCR request failed: {}. Using plain-text fallback.", e),
            }
        }

        String::from_utf8_lossy(bytes).into_owned()
    }

    /// Detect named entities, keeping only confident matches.
    ///
    /// Falls back to pattern-based extraction when the managed service is
    /// unreachable. Never errors; entity extraction is best effort.
    pub async fn detect_entities(&self, text: &str) -> Vec<String> {
        let truncated = self.truncate(text);

        if self.config.endpoint.is_some() {
            let body = json!({
                "Text": truncated,
                "LanguageCode": "en"
            });

            match self.call("Comprehend_20171127.DetectEntities", body).await {
                Ok(value) => match serde_json::from_value::<DetectEntitiesResponse>(value) {
                    Ok(response) => {
                        let mut seen = std::collections::HashSet::new();
                        let entities: Vec<String> = response
                            .entities
                            .into_iter()
                            .filter(|e| e.score > self.config.min_entity_score)
                            .map(|e| e.text)
                            .filter(|text| seen.insert(text.clone()))
                            .collect();
                        debug!("Detected {} entities", entities.len());
                        return entities;
                    }
                    Err(e) => warn!("Unexpected entity response shape: {}", e),
                },
                Err(e) => warn!("Entity detection failed: {}. Using pattern fallback.", e),
            }
        }

        EntityExtractor::extract(&truncated)
    }

    /// Detect overall document sentiment. Best effort, "unknown" on failure.
    pub async fn detect_sentiment(&self, text: &str) -> SentimentResult {
        if self.config.endpoint.is_none() {
            return SentimentResult::default();
        }

        let body = json!({
            "Text": self.truncate(text),
            "LanguageCode": "en"
        });

        match self.call("Comprehend_20171127.DetectSentiment", body).await {
            Ok(value) => match serde_json::from_value::<DetectSentimentResponse>(value) {
                Ok(response) => SentimentResult {
                    sentiment: response.sentiment.to_lowercase(),
                    positive: response.score.positive,
                    negative: response.score.negative,
                    neutral: response.score.neutral,
                    mixed: response.score.mixed,
                },
                Err(e) => {
                    warn!("Unexpected sentiment response shape: {}", e);
                    SentimentResult::default()
                }
            },
            Err(e) => {
                warn!("Sentiment detection failed: {}", e);
                SentimentResult::default()
            }
        }
    }

    /// Detect key phrases, keeping only confident matches. Best effort.
    pub async fn detect_key_phrases(&self, text: &str) -> Vec<String> {
        if self.config.endpoint.is_none() {
            return Vec::new();
        }

        let body = json!({
            "Text": self.truncate(text),
            "LanguageCode": "en"
        });

        match self.call("Comprehend_20171127.DetectKeyPhrases", body).await {
            Ok(value) => match serde_json::from_value::<DetectKeyPhrasesResponse>(value) {
                Ok(response) => response
                    .key_phrases
                    .into_iter()
                    .filter(|p| p.score > self.config.min_entity_score)
                    .map(|p| p.text)
                    .collect(),
                Err(e) => {
                    warn!("Unexpected key phrase response shape: {}", e);
                    Vec::new()
                }
            },
            Err(e) => {
                warn!("Key phrase detection failed: {}", e);
                Vec::new()
            }
        }
    }

    pub fn health_check(&self) -> String {
        if self.config.endpoint.is_some() {
            "configured".to_string()
        } else {
            "local_fallback".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> DocumentAiConfig {
        DocumentAiConfig {
            endpoint: None,
            min_entity_score: 0.7,
            max_text_chars: 5000,
        }
    }

    #[tokio::test]
    async fn test_extract_text_fallback() {
        let client = DocumentAiClient::new(local_config());
        let text = client.extract_text(b"Plain text document content").await;
        assert_eq!(text, "Plain text document content");
    }

    #[tokio::test]
    async fn test_detect_entities_fallback() {
        let client = DocumentAiClient::new(local_config());
        let entities = client
            .detect_entities("Our GDPR compliance contact is privacy@example.com")
            .await;
        assert!(entities.contains(&"GDPR".to_string()));
        assert!(entities.contains(&"privacy@example.com".to_string()));
    }

    #[tokio::test]
    async fn test_sentiment_unknown_without_endpoint() {
        let client = DocumentAiClient::new(local_config());
        let result = client.detect_sentiment("some text").await;
        assert_eq!(result.sentiment, "unknown");
    }

    #[test]
    fn test_truncate_respects_limit() {
        let mut config = local_config();
        config.max_text_chars = 10;
        let client = DocumentAiClient::new(config);
        assert_eq!(client.truncate("abcdefghijklmnop"), "abcdefghij");
    }
}
