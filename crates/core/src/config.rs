//! Tutor Configuration
//!
//! Settings shared by every front end, loaded from environment variables,
//! plus the wiring that turns them into the collaborators the agents run
//! against. Reading a `.env` file is left to the binaries.

use crate::{
    agents::AgentContext,
    book::BookProfile,
    llm_client::OpenAICompatibleClient,
    prompts::Prompts,
    retrieval::{QdrantConfig, QdrantRetriever, Retriever, StaticRetriever},
};
use async_openai::config::OpenAIConfig;
use std::{path::PathBuf, sync::Arc};
use tracing::{Level, info};

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Defines the supported OpenAI-compatible generation providers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provider {
    Groq,
    OpenAI,
    Gemini,
}

impl Provider {
    pub fn api_base(&self) -> &'static str {
        match self {
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::OpenAI => "https://api.openai.com/v1/",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
        }
    }

    /// Name of the environment variable holding this provider's API key.
    pub fn key_var(&self) -> &'static str {
        match self {
            Provider::Groq => "GROQ_API_KEY",
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }
}

/// Holds all tutor configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct TutorConfig {
    pub provider: Provider,
    pub api_key: String,
    pub chat_model: String,
    pub log_level: Level,
    pub qdrant: Option<QdrantConfig>,
    pub prompts_path: Option<PathBuf>,
    pub book_profile_path: Option<PathBuf>,
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl TutorConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider_str = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "groq".to_string());
        let provider = match provider_str.to_lowercase().as_str() {
            "groq" => Provider::Groq,
            "openai" => Provider::OpenAI,
            "gemini" => Provider::Gemini,
            other => {
                return Err(ConfigError::InvalidValue(
                    "LLM_PROVIDER".to_string(),
                    format!("'{}' is not one of groq, openai, gemini", other),
                ));
            }
        };

        let api_key = optional_var(provider.key_var()).ok_or_else(|| {
            ConfigError::MissingVar(format!(
                "{} must be set for '{}' provider",
                provider.key_var(),
                provider_str.to_lowercase()
            ))
        })?;

        let chat_model =
            std::env::var("CHAT_MODEL").unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let qdrant = optional_var("QDRANT_URL").map(|url| QdrantConfig {
            url,
            api_key: optional_var("QDRANT_API_KEY"),
            collection: optional_var("QDRANT_COLLECTION")
                .unwrap_or_else(|| "rich_dad_poor_dad".to_string()),
        });

        Ok(Self {
            provider,
            api_key,
            chat_model,
            log_level,
            qdrant,
            prompts_path: optional_var("PROMPTS_PATH").map(PathBuf::from),
            book_profile_path: optional_var("BOOK_PROFILE_PATH").map(PathBuf::from),
        })
    }
}

impl AgentContext {
    /// Builds the collaborators described by `config`.
    ///
    /// Without `QDRANT_URL` the agents search the built-in passage set.
    pub fn from_config(config: &TutorConfig) -> anyhow::Result<Self> {
        let book = match &config.book_profile_path {
            Some(path) => BookProfile::from_file(path)?,
            None => BookProfile::default(),
        };
        let prompts = match &config.prompts_path {
            Some(path) => Prompts::with_overrides(path)?,
            None => Prompts::default(),
        };

        let retriever: Arc<dyn Retriever> = match &config.qdrant {
            Some(qdrant) => {
                info!(url = %qdrant.url, collection = %qdrant.collection, "Using Qdrant retriever.");
                Arc::new(QdrantRetriever::new(
                    qdrant.clone(),
                    StaticRetriever::rich_dad_poor_dad(),
                ))
            }
            None => {
                info!("QDRANT_URL not set, using built-in passages.");
                Arc::new(StaticRetriever::rich_dad_poor_dad())
            }
        };

        info!(provider = ?config.provider, model = %config.chat_model, book = %book.title, "Using LLM provider.");
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(config.provider.api_base());

        Ok(Self {
            retriever,
            llm: Arc::new(OpenAICompatibleClient::new(openai_config)),
            book: Arc::new(book),
            prompts: Arc::new(prompts),
            model: config.chat_model.clone(),
        })
    }
}
