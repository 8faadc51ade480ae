//! Ingestion error types

use thiserror::Error;

/// Errors raised while turning an upload into records
#[derive(Debug, Error)]
pub enum IngestionError {
    /// The source could not be read at all
    #[error("Failed to read input {source_name}: {source}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    /// The source was read but is not tabular data
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },
}

impl IngestionError {
    pub fn io(source_name: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            source_name: source_name.into(),
            source,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }
}

/// Result type for ingestion operations
pub type IngestionResult<T> = Result<T, IngestionError>;
