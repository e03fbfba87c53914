//! Error handling for the CV extractor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing resource: {0}")]
    MissingResource(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExtractorError>;

impl From<regex::Error> for ExtractorError {
    fn from(err: regex::Error) -> Self {
        ExtractorError::InvalidPattern(err.to_string())
    }
}
