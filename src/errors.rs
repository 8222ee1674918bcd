use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Failed to find valid JSON in the model response")]
    JsonNotFound { raw: String },

    #[error("Failed to decode JSON from the model response: {reason}")]
    MalformedJson { extracted: String, reason: String },

    #[error("Invalid quiz shape: {0}")]
    InvalidQuizShape(String),

    #[error("No documents indexed yet. Ingest a PDF first.")]
    NoIndex,

    #[error("PDF error: {0}")]
    Pdf(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
            AppError::MissingConfiguration(_) => "MISSING_CONFIGURATION",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::JsonNotFound { .. } => "JSON_NOT_FOUND",
            AppError::MalformedJson { .. } => "MALFORMED_JSON",
            AppError::InvalidQuizShape(_) => "INVALID_QUIZ_SHAPE",
            AppError::NoIndex => "NO_INDEX",
            AppError::Pdf(_) => "PDF_ERROR",
        }
    }

    /// Model output attached to parsing errors, kept for debugging.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            AppError::JsonNotFound { raw } => Some(raw),
            AppError::MalformedJson { extracted, .. } => Some(extracted),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        ErrorResponse {
            error: err.to_string(),
            code: err.error_code(),
            raw_response: err.raw_text().map(str::to_string),
        }
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
impl From<async_openai::error::OpenAIError> for AppError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        AppError::Upstream(err.to_string())
    }
}
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(err.to_string())
    }
}
impl From<lopdf::Error> for AppError {
    fn from(err: lopdf::Error) -> Self {
        AppError::Pdf(err.to_string())
    }
}
impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("Background task failed: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
