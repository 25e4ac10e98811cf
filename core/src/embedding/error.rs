use thiserror::Error;
use std::error::Error as StdError;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Error related to the configuration of the embedder (e.g., a zero dimension).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error loading or initializing a local embedding model.
    #[error("Error loading local model: {0}")]
    ModelLoad(#[source] Box<dyn StdError + Send + Sync>),

    /// An error specific to the underlying implementation that doesn't fit other categories.
    #[error("Provider-specific error: {0}")]
    Provider(#[source] Box<dyn StdError + Send + Sync>),
}
