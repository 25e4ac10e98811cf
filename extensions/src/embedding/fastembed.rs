use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use newsroom_core::embedding::{Embedder, Embedding, EmbeddingError};
use tracing::{debug, instrument};

const MODEL_NAME: &str = "all-MiniLM-L6-v2";
const DIMENSIONS: usize = 384;

/// Local sentence-transformer embeddings (`all-MiniLM-L6-v2`) through the `fastembed` crate.
///
/// The model is downloaded and loaded in the constructor; embedding runs on the blocking thread
/// pool.
#[derive(Clone)]
pub struct FastEmbedEmbedder {
    model: Arc<TextEmbedding>,
}

impl FastEmbedEmbedder {
    pub fn new() -> Result<Self, EmbeddingError> {
        Self::with_options(InitOptions::new(EmbeddingModel::AllMiniLML6V2))
    }

    /// Loads the model, caching downloaded files in `cache_dir`.
    pub fn with_cache_dir(cache_dir: impl Into<PathBuf>) -> Result<Self, EmbeddingError> {
        Self::with_options(InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_cache_dir(cache_dir.into()))
    }

    fn with_options(options: InitOptions) -> Result<Self, EmbeddingError> {
        let model = TextEmbedding::try_new(options.with_show_download_progress(false))
            .map_err(|e| EmbeddingError::ModelLoad(e.into()))?;
        debug!(model = MODEL_NAME, "FastEmbed model loaded.");
        Ok(Self { model: Arc::new(model) })
    }
}

#[async_trait]
impl Embedder for FastEmbedEmbedder {
    #[instrument(skip(self, texts), fields(num_texts = texts.len()))]
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let owned = texts.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        let vectors = tokio::task::spawn_blocking(move || model.embed(owned, None))
            .await
            .map_err(|e| EmbeddingError::Provider(Box::new(e)))?
            .map_err(|e| EmbeddingError::Provider(e.into()))?;

        Ok(vectors.into_iter().map(Embedding::from).collect())
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }
}
