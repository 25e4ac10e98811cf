use reqwest::Client;
use secrecy::SecretString;
use tracing::{debug, instrument, trace};
use url::Url;

use super::error::GroqError;

const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com";

/// Path prefix of Groq's OpenAI-compatible endpoints.
const API_PREFIX: &str = "openai/v1";

/// Configuration for Groq clients.
#[derive(Clone, Debug)]
pub struct GroqConfig {
    /// Groq API key, sent as a bearer token.
    pub(crate) api_key: SecretString,
    /// Base URL of the Groq API.
    pub(crate) base_url: Url,
    /// Timeout for HTTP requests. Defaults to 60 seconds.
    pub(crate) timeout: std::time::Duration,
}

impl GroqConfig {
    /// Creates a new Groq configuration.
    ///
    /// # Errors
    /// Returns `GroqError::InvalidConfiguration` if the API key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self, GroqError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GroqError::InvalidConfiguration("API key cannot be empty".to_string()));
        }

        let base_url = Url::parse(DEFAULT_GROQ_BASE_URL)
            .map_err(|e| GroqError::InvalidConfiguration(
                format!("Failed to parse default base URL: {}", e)
            ))?;

        Ok(Self {
            api_key: api_key.into(),
            base_url,
            timeout: std::time::Duration::from_secs(60),
        })
    }

    /// Allows setting a custom base URL (e.g., a proxy or a local test server).
    pub fn base_url(mut self, url: &str) -> Result<Self, GroqError> {
        self.base_url = Url::parse(url)
            .map_err(|e| GroqError::InvalidConfiguration(
                format!("Invalid base URL '{}': {}", url, e)
            ))?;
        Ok(self)
    }

    /// Allows setting a custom request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client and configuration shared by everything talking to the Groq API.
#[derive(Clone, Debug)]
pub(crate) struct SharedGroqClient {
    config: GroqConfig,
    http_client: Client,
}

impl SharedGroqClient {
    /// Builds a default reqwest client if one is not provided.
    #[instrument(name = "shared_groq_client_new", skip(config, client_override))]
    pub(crate) fn new(config: GroqConfig, client_override: Option<Client>) -> Result<Self, GroqError> {
        let client = match client_override {
            Some(client) => {
                debug!("Using provided HTTP client.");
                client
            },
            None => {
                debug!(timeout=?config.timeout, "Building default HTTP client.");
                Client::builder()
                    .timeout(config.timeout)
                    .build()
                    .map_err(|e| GroqError::InvalidConfiguration(
                        format!("Failed to build default HTTP client: {}", e)
                    ))?
            }
        };

        debug!(base_url = %config.base_url, "Shared Groq client initialized.");

        Ok(Self { config, http_client: client })
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.http_client
    }

    pub(crate) fn config(&self) -> &GroqConfig {
        &self.config
    }

    /// Builds the URL of an endpoint below the OpenAI-compatible prefix, e.g. `"chat/completions"`.
    pub(crate) fn build_url(&self, relative_path: &str) -> Result<Url, GroqError> {
        let path = format!("{}/{}", API_PREFIX, relative_path);
        let mut url = self.config.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| GroqError::InvalidConfiguration("Base URL cannot be a 'cannot-be-a-base' URL.".to_string()))?
            .pop_if_empty()
            .extend(path.split('/'));

        trace!(built_url = %url, "Built Groq API URL");
        Ok(url)
    }
}
