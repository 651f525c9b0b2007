// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{AgentError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub object_store: ObjectStoreConfig,
    pub document_ai: DocumentAiConfig,
    pub reasoning: ReasoningConfig,
    pub insight: InsightConfig,
    pub agents: AgentConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub demo_mode: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub uri: String,
    pub table_name: String,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    pub embedding_base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObjectStoreConfig {
    /// S3-compatible endpoint; uploads skip object storage when unset.
    pub endpoint: Option<String>,
    pub bucket: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentAiConfig {
    /// OCR/NLP endpoint; local fallbacks are used when unset.
    pub endpoint: Option<String>,
    pub min_entity_score: f32,
    pub max_text_chars: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReasoningConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InsightConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentConfig {
    pub retrieval_limit: usize,
    pub graph_node_limit: usize,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CONTEXT_AGENTS")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| AgentError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| AgentError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                demo_mode: false,
            },
            storage: StorageConfig {
                uri: "data/lancedb".to_string(),
                table_name: "documents".to_string(),
                embedding_api_key: None,
                embedding_model: "openai/gpt-oss-120b".to_string(),
                embedding_base_url: "https://api.groq.com/openai/v1".to_string(),
            },
            object_store: ObjectStoreConfig {
                endpoint: None,
                bucket: "context-agents-documents".to_string(),
            },
            document_ai: DocumentAiConfig {
                endpoint: None,
                min_entity_score: 0.7,
                max_text_chars: 5000,
            },
            reasoning: ReasoningConfig {
                api_key: None,
                model: "llama-2-70b-chat".to_string(),
                base_url: "https://api.friendli.ai/serverless".to_string(),
                max_tokens: 1000,
                temperature: 0.7,
            },
            insight: InsightConfig {
                api_key: None,
                model: "gemini-2.5-flash".to_string(),
                base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            },
            agents: AgentConfig {
                retrieval_limit: 10,
                graph_node_limit: 100,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AgentError::Config(
                "server.port must be greater than 0".to_string(),
            ));
        }

        if self.agents.retrieval_limit == 0 {
            return Err(AgentError::Config(
                "agents.retrieval_limit must be greater than 0".to_string(),
            ));
        }

        if self.document_ai.max_text_chars == 0 {
            return Err(AgentError::Config(
                "document_ai.max_text_chars must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.document_ai.min_entity_score) {
            return Err(AgentError::Config(
                "document_ai.min_entity_score must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.agents.retrieval_limit, 10);
    }

    #[test]
    fn test_zero_retrieval_limit_rejected() {
        let mut config = Config::default_config();
        config.agents.retrieval_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_entity_score_range_enforced() {
        let mut config = Config::default_config();
        config.document_ai.min_entity_score = 1.5;
        assert!(config.validate().is_err());
    }
}
