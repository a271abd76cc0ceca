//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::traits::ModelError;

/// Hint appended to every failure of the analysis service.
pub const SERVICE_HINT: &str = "Make sure GEMINI_API_KEY is set and the model endpoint is reachable.";

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("No document provided")]
    NoDocument,

    #[error("Document is empty")]
    EmptyDocument,

    #[error("document too large: {path} ({size} bytes, limit {limit})")]
    DocumentTooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    #[error("Error analyzing document: {source}\n\n{}", SERVICE_HINT)]
    Analysis {
        #[source]
        source: ModelError,
    },

    #[error(
        "Failed to parse AI response: {reason}\nraw response:\n{raw}\n\n{}",
        SERVICE_HINT
    )]
    MalformedResponse { reason: String, raw: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
