use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::EmbeddingError;

/// A fixed-length embedding vector.
///
/// The values are kept exactly as the embedder produced them. Nothing in Newsroom normalizes
/// vectors after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding(pub Vec<f32>);

impl Embedding {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Returns `None` if the vectors have different lengths.
    pub fn squared_distance(&self, other: &Embedding) -> Option<f32> {
        if self.len() != other.len() {
            return None;
        }
        Some(self.0.iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum())
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Embedding(values)
    }
}

/// Trait for asynchronous text embedding generation.
///
/// An implementor of this trait represents a specific, already initialized embedding model
/// (e.g., a loaded local sentence-transformer model). Construction is the initialization step;
/// afterwards the embedder is used through shared references only.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generates an embedding for a single text.
    ///
    /// Equivalent to calling [`Embedder::embed_batch`] with one element. Empty text yields some
    /// vector of the usual length rather than an error.
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut embeddings = self.embed_batch(&[text]).await?;
        match embeddings.pop() {
            Some(embedding) if embeddings.is_empty() => Ok(embedding),
            _ => Err(EmbeddingError::Provider(
                "embedder did not return exactly one embedding for a single input".into(),
            )),
        }
    }

    /// Generates embeddings for a batch of texts, preserving input order.
    ///
    /// The result must be element-wise identical to embedding each text on its own.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError>;

    /// Returns the number of dimensions of every vector produced by this embedder.
    fn dimensions(&self) -> usize;

    /// Returns an identifier for the embedding model (e.g., "all-MiniLM-L6-v2").
    fn model_name(&self) -> &str;
}
