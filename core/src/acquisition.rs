use std::error::Error as StdError;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::document::Document;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Network error: {0}")]
    Network(#[source] Box<dyn StdError + Send + Sync>),

    #[error("Server responded with status {0}")]
    Status(u16),

    #[error("Failed to parse page: {0}")]
    Parse(String),
}

/// Turns a URL into plain text.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches every URL in order and returns the documents that produced text.
///
/// Blank URLs are skipped, failed fetches are logged and dropped, and so are pages whose text is
/// empty. Positions are assigned after filtering, so they are always `0..n`. Every document keeps
/// the URL it came from.
#[instrument(skip_all, fields(urls = urls.len()))]
pub async fn acquire<S: AsRef<str>>(fetcher: &dyn Fetcher, urls: &[S]) -> Vec<Document> {
    let mut documents = Vec::with_capacity(urls.len());

    for url in urls.iter().map(AsRef::as_ref).map(str::trim) {
        if url.is_empty() {
            continue;
        }
        match fetcher.fetch(url).await {
            Ok(text) if text.trim().is_empty() => {
                warn!(%url, "No text extracted, skipping.");
            }
            Ok(text) => {
                debug!(%url, chars = text.len(), "Fetched document.");
                documents.push(Document::new(text, url, documents.len()));
            }
            Err(e) => {
                warn!(%url, error = %e, "Failed to fetch URL, skipping.");
            }
        }
    }

    documents
}
