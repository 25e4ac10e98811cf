// Model adapters implement `ChatApi` for a concrete provider. Conversation state (if any) is kept
// by the caller; the trait itself is stateless request/response.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod error;

pub use error::ChatError;


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    System(String),
    User(String),
    Assistant(String),
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Message::System(text.into())
    }

    pub fn user(text: impl Into<String>) -> Self {
        Message::User(text.into())
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Message::Assistant(text.into())
    }

    pub fn text(&self) -> &str {
        match self {
            Message::System(text) | Message::User(text) | Message::Assistant(text) => text,
        }
    }
}

// ============== Configuration ==============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatOptions {
    pub model_id: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub stop_sequences: Option<Vec<String>>,
}

// ============== Response Structures ==============

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageInfo {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The text generated by the assistant.
    pub content: String,
    pub usage: Option<UsageInfo>,
    pub finish_reason: Option<FinishReason>,
    pub model_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub owned_by: Option<String>,
    pub context_window: Option<u32>,
}

// ============== The Trait ==============

/// A configured connection to a chat completion provider.
///
/// Obtaining a value of this trait is the initialization step (e.g., validating an API key);
/// once constructed, implementations are used through shared references only.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Returns a list of models available through this provider.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ChatError>;

    /// Generates a single assistant reply for the conversation in `messages`.
    ///
    /// # Arguments
    /// * `messages` - Conversation so far, typically a system message followed by a user prompt.
    /// * `options` - Model ID and sampling parameters. Unset fields use the provider's defaults.
    async fn generate(&self, messages: &[Message], options: &ChatOptions) -> Result<ChatResponse, ChatError>;
}
