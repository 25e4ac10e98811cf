use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::acquisition::{acquire, Fetcher};
use crate::answer::Answerer;
use crate::chat::ChatError;
use crate::retrieval::Retriever;

#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("At least one URL is required")]
    MissingUrls,

    #[error("A research question is required")]
    MissingQuery,

    /// None of the URLs produced any text.
    #[error("Could not extract content from the provided URLs")]
    NoContent,

    #[error("No relevant context found")]
    NoContext,

    #[error("Failed to generate an answer: {0}")]
    Answer(#[from] ChatError),
}

/// Outcome of one research request.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchReport {
    pub request_id: Uuid,
    pub query: String,
    pub answer: String,
    /// URL of the document used as context.
    pub source: String,
    /// Position of the source among the documents that were fetched successfully.
    pub position: usize,
    pub distance: Option<f32>,
    /// Set when retrieval failed and the first document was used instead of the nearest one.
    pub degraded: bool,
    /// Why retrieval fell back, if it did.
    pub fallback_reason: Option<String>,
    /// Number of documents that took part in retrieval.
    pub documents: usize,
}

/// Runs the whole pipeline for one question: fetch, retrieve, answer.
///
/// Every request is handled in sequence and builds its own documents and index; nothing is
/// carried over between requests.
pub struct Researcher {
    fetcher: Arc<dyn Fetcher>,
    retriever: Retriever,
    answerer: Answerer,
}

impl Researcher {
    pub fn new(fetcher: Arc<dyn Fetcher>, retriever: Retriever, answerer: Answerer) -> Self {
        Self { fetcher, retriever, answerer }
    }

    #[instrument(skip(self, urls, query), fields(request_id = tracing::field::Empty))]
    pub async fn research<S: AsRef<str>>(&self, urls: &[S], query: &str) -> Result<ResearchReport, ResearchError> {
        let request_id = Uuid::new_v4();
        tracing::Span::current().record("request_id", tracing::field::display(request_id));

        if urls.iter().all(|url| url.as_ref().trim().is_empty()) {
            return Err(ResearchError::MissingUrls);
        }
        let query = query.trim();
        if query.is_empty() {
            return Err(ResearchError::MissingQuery);
        }

        let documents = acquire(&*self.fetcher, urls).await;
        if documents.is_empty() {
            return Err(ResearchError::NoContent);
        }
        info!(documents = documents.len(), "Acquired documents.");

        let retrieved = self.retriever.retrieve(&documents, query).await
            .ok_or(ResearchError::NoContext)?;
        let fallback_reason = retrieved.fallback_cause().map(ToString::to_string);
        if let Some(reason) = &fallback_reason {
            warn!(%reason, "Answering from fallback context.");
        }

        let answer = self.answerer.answer(retrieved.document.text(), query).await?;

        Ok(ResearchReport {
            request_id,
            query: query.to_string(),
            answer,
            source: retrieved.document.source().to_string(),
            position: retrieved.position,
            distance: retrieved.distance,
            degraded: retrieved.is_degraded(),
            fallback_reason,
            documents: documents.len(),
        })
    }
}
