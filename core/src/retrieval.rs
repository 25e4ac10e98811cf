use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::document::Document;
use crate::embedding::{Embedder, EmbeddingError, IndexError, SimilarityIndex};

#[derive(Error, Debug)]
pub enum RetrievalError {
    /// No documents were supplied, so there is nothing to retrieve from.
    #[error("No retrievable context: the document set is empty")]
    EmptyDocumentSet,

    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Similarity index error: {0}")]
    Index(#[from] IndexError),

    /// A document's own position does not match its place in the batch.
    #[error("Document at index {index} claims position {position}")]
    Misnumbered { index: usize, position: usize },

    /// The embedder returned a different number of vectors than it was given texts.
    #[error("Embedder returned {actual} embeddings for {expected} documents")]
    EmbeddingCount { expected: usize, actual: usize },
}

/// How a [`RetrievalResult`] was obtained.
#[derive(Debug)]
pub enum RetrievalStatus {
    /// The document is the true nearest neighbor of the query.
    Exact,
    /// The nearest document could not be determined; the first document was substituted.
    Fallback(RetrievalError),
}

/// The document selected as context for a query.
#[derive(Debug)]
pub struct RetrievalResult<'a> {
    pub document: &'a Document,
    /// Position of `document` within the batch passed to the retriever.
    pub position: usize,
    /// Squared Euclidean distance between query and document. `None` for fallback results.
    pub distance: Option<f32>,
    pub status: RetrievalStatus,
}

impl RetrievalResult<'_> {
    /// Whether this result was substituted because retrieval failed.
    pub fn is_degraded(&self) -> bool {
        matches!(self.status, RetrievalStatus::Fallback(_))
    }

    /// The failure that caused a fallback, if any.
    pub fn fallback_cause(&self) -> Option<&RetrievalError> {
        match &self.status {
            RetrievalStatus::Exact => None,
            RetrievalStatus::Fallback(cause) => Some(cause),
        }
    }
}

/// Selects the single document closest to a query.
///
/// Each call embeds the documents, builds a fresh [`SimilarityIndex`], queries it, and drops it
/// again. The retriever itself holds no per-request state and can be shared.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    dimension: usize,
}

impl Retriever {
    /// Creates a retriever whose index dimension is the embedder's own dimension.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        let dimension = embedder.dimensions();
        Self { embedder, dimension }
    }

    /// Overrides the dimension every embedding must have.
    #[must_use]
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn embedder(&self) -> &dyn Embedder {
        &*self.embedder
    }

    /// Returns the document closest to `query`, or `None` if `documents` is empty.
    ///
    /// If embedding or indexing fails, the first document is returned instead, marked with
    /// [`RetrievalStatus::Fallback`] so callers can tell a degraded result from a real match.
    #[instrument(skip(self, documents, query), fields(documents = documents.len(), model = %self.embedder.model_name()))]
    pub async fn retrieve<'a>(&self, documents: &'a [Document], query: &str) -> Option<RetrievalResult<'a>> {
        match self.try_retrieve(documents, query).await {
            Ok(result) => Some(result),
            Err(RetrievalError::EmptyDocumentSet) => {
                debug!("No documents to retrieve from.");
                None
            }
            Err(cause) => {
                let document = documents.first()?;
                warn!(error = %cause, source = %document.source(), "Retrieval failed, falling back to the first document.");
                Some(RetrievalResult {
                    document,
                    position: 0,
                    distance: None,
                    status: RetrievalStatus::Fallback(cause),
                })
            }
        }
    }

    /// Like [`Retriever::retrieve`], but reports every failure instead of falling back.
    ///
    /// `documents[i].position()` must be `i` (as produced by `acquire` or `batch`), so that the
    /// returned position and the document's own position always agree.
    pub async fn try_retrieve<'a>(&self, documents: &'a [Document], query: &str) -> Result<RetrievalResult<'a>, RetrievalError> {
        if documents.is_empty() {
            return Err(RetrievalError::EmptyDocumentSet);
        }
        if let Some((index, document)) = documents.iter()
            .enumerate()
            .find(|(i, d)| d.position() != *i)
        {
            return Err(RetrievalError::Misnumbered { index, position: document.position() });
        }

        let texts = documents.iter().map(Document::text).collect::<Vec<_>>();
        let vectors = self.embedder.embed_batch(&texts).await?;
        if vectors.len() != documents.len() {
            return Err(RetrievalError::EmbeddingCount {
                expected: documents.len(),
                actual: vectors.len(),
            });
        }
        let query_vector = self.embedder.embed(query).await?;

        let index = SimilarityIndex::build_with_dimension(self.dimension, vectors)?;
        let nearest = index.nearest(&query_vector, 1)?
            .into_iter()
            .next()
            .ok_or(IndexError::EmptyIndex)?;

        debug!(position = nearest.position, distance = nearest.distance, "Found nearest document.");
        Ok(RetrievalResult {
            document: &documents[nearest.position],
            position: nearest.position,
            distance: Some(nearest.distance),
            status: RetrievalStatus::Exact,
        })
    }
}
