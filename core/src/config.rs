use serde::{Deserialize, Serialize};

use crate::chat::ChatOptions;

/// Embedding dimension of `all-MiniLM-L6-v2`, and the default for every embedder in Newsroom.
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 384;

pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

pub const DEFAULT_CHAT_MODEL: &str = "llama3-70b-8192";

/// Fixed configuration for a research session.
///
/// None of these values are negotiated at runtime. The embedding dimension in particular is
/// treated as a constant: every vector entering the similarity index must have exactly this
/// length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Identifier of the embedding model (e.g., "all-MiniLM-L6-v2").
    pub embedding_model: String,
    /// Length of every embedding vector.
    pub embedding_dimension: usize,
    /// Chat model used to generate answers.
    pub chat_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dimension: DEFAULT_EMBEDDING_DIMENSION,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 500,
            top_p: 0.9,
        }
    }
}

impl ResearchConfig {
    /// Generation options derived from this configuration.
    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions {
            model_id: Some(self.chat_model.clone()),
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            top_p: Some(self.top_p),
            stop_sequences: None,
        }
    }
}
