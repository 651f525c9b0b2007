// file: src/services/reasoning.rs
// description: hosted chat-completions client used by the agent workflow
// reference: https://friendli.ai/docs/openapi/serverless/chat-completions

use crate::config::ReasoningConfig;
use crate::error::{AgentError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are an AI assistant for an enterprise knowledge management system. \
Provide clear, accurate answers grounded in the supplied document context.";

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

pub struct ReasoningClient {
    client: Client,
    config: ReasoningConfig,
}

impl ReasoningClient {
    pub fn new(config: ReasoningConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Send a prompt through the chat-completions endpoint and return the
    /// assistant's reply text.
    pub async fn query(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| AgentError::Llm("Reasoning API key not configured".to_string()))?;

        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending chat completion request ({} chars)", prompt.len());

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Llm(format!("Failed to send chat request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AgentError::Llm(format!(
                "Chat request failed with status {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Llm(format!("Failed to parse chat response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AgentError::Llm("No choices returned from chat API".to_string()))
    }

    /// Minimal round trip used by the health endpoint.
    pub async fn health_check(&self) -> String {
        if self.config.api_key.is_none() {
            return "not_configured".to_string();
        }
        match self.query("Reply with the single word: ok").await {
            Ok(_) => "connected".to_string(),
            Err(e) => format!("error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(api_key: Option<String>) -> ReasoningConfig {
        ReasoningConfig {
            api_key,
            model: "llama-2-70b-chat".to_string(),
            base_url: "https://api.friendli.ai/serverless".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn test_query_without_api_key() {
        let client = ReasoningClient::new(test_config(None));
        let result = client.query("hello").await;
        assert!(matches!(result, Err(AgentError::Llm(_))));
    }

    #[tokio::test]
    async fn test_health_check_without_api_key() {
        let client = ReasoningClient::new(test_config(None));
        assert_eq!(client.health_check().await, "not_configured");
    }
}
