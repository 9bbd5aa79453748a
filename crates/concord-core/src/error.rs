use thiserror::Error;

/// Top-level error type for the Concord system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates return
/// `ConcordError` directly so the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConcordError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Completion API error: {0}")]
    Completion(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for ConcordError {
    fn from(err: toml::de::Error) -> Self {
        ConcordError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ConcordError {
    fn from(err: toml::ser::Error) -> Self {
        ConcordError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ConcordError {
    fn from(err: serde_json::Error) -> Self {
        ConcordError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Concord operations.
pub type Result<T> = std::result::Result<T, ConcordError>;
