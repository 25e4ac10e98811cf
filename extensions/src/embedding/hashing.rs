use async_trait::async_trait;
use newsroom_core::config::DEFAULT_EMBEDDING_DIMENSION;
use newsroom_core::embedding::{Embedder, Embedding, EmbeddingError};
use tracing::{debug, instrument};

const MODEL_NAME: &str = "hashing-bow-fnv1a";

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(token: &str) -> u64 {
    token.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Local bag-of-words embedder based on feature hashing.
///
/// Text is lowercased and split on non-alphanumeric characters. Every token is hashed with 64-bit
/// FNV-1a into one of `dimension` buckets, and the term-count vector is L2-normalized. Texts
/// sharing words end up close together, which is enough to pick the right article among a
/// handful. Needs no model download and is fully deterministic.
///
/// The normalization is part of this model's output, the same way sentence-transformer models
/// emit unit vectors. The retriever and the similarity index index whatever they receive and
/// never normalize on their own.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self, EmbeddingError> {
        if dimension == 0 {
            return Err(EmbeddingError::Configuration("Embedding dimension must be greater than zero".to_string()));
        }
        debug!(dimension, "HashingEmbedder created.");
        Ok(Self { dimension })
    }

    fn embed_one(&self, text: &str) -> Embedding {
        let mut values = vec![0.0f32; self.dimension];
        for token in text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let bucket = (fnv1a(&token.to_lowercase()) % self.dimension as u64) as usize;
            values[bucket] += 1.0;
        }

        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            values.iter_mut().for_each(|v| *v /= norm);
        }
        Embedding::from(values)
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self { dimension: DEFAULT_EMBEDDING_DIMENSION }
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    #[instrument(skip(self, texts), fields(num_texts = texts.len()))]
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }
}
