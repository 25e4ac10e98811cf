use std::sync::Arc;

use anyhow::{bail, Context, Result};
use newsroom_core::answer::Answerer;
use newsroom_core::config::ResearchConfig;
use newsroom_core::embedding::Embedder;
use newsroom_core::research::Researcher;
use newsroom_core::retrieval::Retriever;
use newsroom_extensions::embedding::HashingEmbedder;
use newsroom_extensions::groq::{GroqChatClient, GroqConfig};
use newsroom_extensions::web::WebFetcher;
use tracing::debug;

use crate::cli::{Cli, EmbedderKind};

mod prompt;
pub use prompt::{prompt_api_key, prompt_query, prompt_urls};

/// Settings shared by all commands, resolved from global flags and the environment.
#[derive(Clone)]
pub struct Newsroom {
    pub api_key: Option<String>,
    pub embedder: EmbedderKind,
    pub config: ResearchConfig,
}

impl Newsroom {
    pub fn from_cli(cli: &Cli) -> Self {
        let config = ResearchConfig {
            embedding_dimension: cli.dimension,
            ..Default::default()
        };
        Self {
            api_key: cli.api_key.clone().filter(|key| !key.trim().is_empty()),
            embedder: cli.embedder,
            config,
        }
    }

    /// The API key from flags or environment, or asked for interactively.
    pub async fn api_key(&self) -> Result<String> {
        match &self.api_key {
            Some(key) => Ok(key.clone()),
            None if console::user_attended() => prompt_api_key().await,
            None => bail!("No Groq API key given. Set GROQ_API_KEY or pass --api-key."),
        }
    }

    /// Connects to Groq, verifying the key.
    pub async fn chat_client(&self) -> Result<GroqChatClient> {
        let config = GroqConfig::new(self.api_key().await?)?;
        let client = GroqChatClient::connect(config, Some(self.config.chat_model.clone()), None)
            .await
            .context("Failed to connect to Groq")?;
        Ok(client)
    }

    pub fn embedder(&self) -> Result<Arc<dyn Embedder>> {
        let embedder: Arc<dyn Embedder> = match self.embedder {
            EmbedderKind::Hashing => Arc::new(HashingEmbedder::new(self.config.embedding_dimension)?),
            EmbedderKind::Fastembed => fastembed_embedder(self.config.embedding_dimension)?,
        };
        debug!(model = embedder.model_name(), dimension = embedder.dimensions(), "Embedder ready.");
        Ok(embedder)
    }

    /// Wires fetcher, retriever and answerer together for one `research` run.
    pub async fn researcher(&self) -> Result<Researcher> {
        let embedder = self.embedder()?;
        let chat = self.chat_client().await?;
        let fetcher = WebFetcher::new()?;

        Ok(Researcher::new(
            Arc::new(fetcher),
            Retriever::new(embedder),
            Answerer::new(Arc::new(chat), self.config.chat_options()),
        ))
    }
}

#[cfg(feature = "fastembed")]
fn fastembed_embedder(dimension: usize) -> Result<Arc<dyn Embedder>> {
    use newsroom_extensions::embedding::FastEmbedEmbedder;

    let embedder = FastEmbedEmbedder::new().context("Failed to load the embedding model")?;
    if embedder.dimensions() != dimension {
        bail!(
            "The {} model produces {}-dimensional vectors, but --dimension is {}.",
            embedder.model_name(),
            embedder.dimensions(),
            dimension
        );
    }
    Ok(Arc::new(embedder))
}

#[cfg(not(feature = "fastembed"))]
fn fastembed_embedder(_dimension: usize) -> Result<Arc<dyn Embedder>> {
    bail!("This build does not include fastembed. Rebuild with `--features fastembed`.")
}
