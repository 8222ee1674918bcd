use std::env;
use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

/// How a syllabus is produced from a topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyllabusStrategy {
    /// Instructor and learner agents negotiate, then a summarizer writes the syllabus.
    Negotiated,
    /// One templated prompt, one model call.
    SingleCall,
}

impl SyllabusStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "negotiated" => Some(SyllabusStrategy::Negotiated),
            "single_call" | "single-call" => Some(SyllabusStrategy::SingleCall),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub model_api_key: Option<SecretString>,
    pub llm_api_base: String,
    pub llm_model: String,
    pub embedding_api_base: String,
    pub embedding_model: String,
    pub embedding_api_key: Option<SecretString>,
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub chunks_collection: String,
    pub retrieval_top_k: usize,
    pub embedding_batch_size: usize,
    pub syllabus_strategy: SyllabusStrategy,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            model_api_key: env::var("GROQ_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            llm_api_base: env::var("LLM_API_BASE")
                .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "llama-3.1-8b-instant".to_string()),
            embedding_api_base: env::var("EMBEDDING_API_BASE")
                .unwrap_or_else(|_| "http://localhost:11434/v1".to_string()),
            embedding_model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "nomic-embed-text".to_string()),
            embedding_api_key: env::var("EMBEDDING_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME").unwrap_or_else(|_| "learnwise-local".to_string()),
            chunks_collection: env::var("CHUNKS_COLLECTION")
                .unwrap_or_else(|_| "document_chunks".to_string()),
            retrieval_top_k: env::var("RETRIEVAL_TOP_K")
                .ok()
                .and_then(|k| k.parse().ok())
                .filter(|k: &usize| *k > 0)
                .unwrap_or(3),
            embedding_batch_size: env::var("EMBEDDING_BATCH_SIZE")
                .ok()
                .and_then(|size| size.parse().ok())
                .filter(|size: &usize| *size > 0)
                .unwrap_or(64),
            syllabus_strategy: env::var("SYLLABUS_STRATEGY")
                .ok()
                .and_then(|s| SyllabusStrategy::parse(&s))
                .unwrap_or(SyllabusStrategy::Negotiated),
        }
    }

    /// The model credential, or a structured error naming the missing variable.
    pub fn model_api_key(&self) -> AppResult<&SecretString> {
        self.model_api_key.as_ref().ok_or_else(|| {
            AppError::MissingConfiguration(
                "GROQ_API_KEY not found. Please set it in your .env file.".to_string(),
            )
        })
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            model_api_key: Some(SecretString::from("test_api_key".to_string())),
            llm_api_base: "http://127.0.0.1:9/v1".to_string(),
            llm_model: "test-model".to_string(),
            embedding_api_base: "http://127.0.0.1:9/v1".to_string(),
            embedding_model: "test-embedding".to_string(),
            embedding_api_key: None,
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "learnwise-test".to_string(),
            chunks_collection: "document_chunks".to_string(),
            retrieval_top_k: 3,
            embedding_batch_size: 64,
            syllabus_strategy: SyllabusStrategy::Negotiated,
        }
    }
}
