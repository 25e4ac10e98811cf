//! Fetching news pages over HTTP and reducing them to paragraph text.

use std::time::Duration;

use async_trait::async_trait;
use newsroom_core::acquisition::{FetchError, Fetcher};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, error, instrument};
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("newsroom/", env!("CARGO_PKG_VERSION"));

/// Extracts the text of every `<p>` element, in document order, joined with single spaces.
///
/// Markup outside paragraphs (navigation, scripts, headings) is ignored. A page without
/// paragraphs yields an empty string.
pub fn extract_paragraph_text(html: &str) -> Result<String, FetchError> {
    let selector = Selector::parse("p").map_err(|e| FetchError::Parse(e.to_string()))?;
    let document = Html::parse_document(html);

    let paragraphs = document
        .select(&selector)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>();
    Ok(paragraphs.join(" "))
}

/// `Fetcher` that downloads pages with `reqwest` and keeps their paragraph text.
#[derive(Debug, Clone)]
pub struct WebFetcher {
    client: Client,
}

impl WebFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Network(Box::new(e)))?;
        Ok(Self { client })
    }

    /// Uses a preconfigured client (proxy, custom TLS, ...).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for WebFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
                message: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let response = self.client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::Network(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "Page request returned error status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| FetchError::Network(Box::new(e)))?;
        debug!(bytes = body.len(), "Downloaded page");
        extract_paragraph_text(&body)
    }
}
