use async_trait::async_trait;
use newsroom_core::chat::{
    ChatApi, ChatError, ChatOptions, ChatResponse, FinishReason, Message, ModelInfo, UsageInfo,
};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace};

use super::error::{map_response_error, GroqError};
use super::shared::{GroqConfig, SharedGroqClient};

/// Model used when neither the client nor the request options name one.
pub const DEFAULT_GROQ_MODEL: &str = "llama3-70b-8192";


// ============== Groq Specific Request/Response Structs ==============
// These mirror the OpenAI-compatible chat completions API.

#[derive(Serialize, Debug)]
struct GroqChatRequest<'a> {
    model: &'a str,
    messages: Vec<GroqMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

#[derive(Serialize, Debug)]
struct GroqMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a Message> for GroqMessage<'a> {
    fn from(message: &'a Message) -> Self {
        let role = match message {
            Message::System(_) => "system",
            Message::User(_) => "user",
            Message::Assistant(_) => "assistant",
        };
        GroqMessage { role, content: message.text() }
    }
}

#[derive(Deserialize, Debug)]
struct GroqChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<GroqChoice>,
    #[serde(default)]
    usage: Option<GroqUsage>,
}

#[derive(Deserialize, Debug)]
struct GroqChoice {
    message: GroqResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GroqResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GroqUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

impl From<GroqUsage> for UsageInfo {
    fn from(usage: GroqUsage) -> Self {
        UsageInfo {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}

fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::Length,
        "content_filter" => FinishReason::ContentFilter,
        other => FinishReason::Other(other.to_string()),
    }
}

#[derive(Deserialize, Debug)]
struct GroqModelList {
    data: Vec<GroqModel>,
}

#[derive(Deserialize, Debug)]
struct GroqModel {
    id: String,
    #[serde(default)]
    owned_by: Option<String>,
    #[serde(default)]
    context_window: Option<u32>,
}


// ============== Client ==============

/// Chat client for Groq's OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct GroqChatClient {
    shared_client: SharedGroqClient,
    default_model: String,
}

impl GroqChatClient {
    /// Creates a client with default settings. No request is made.
    pub fn new(api_key: impl Into<String>) -> Result<Self, GroqError> {
        Self::new_with_options(api_key, None, None, None)
    }

    /// Creates a client with custom options.
    ///
    /// # Arguments
    /// * `api_key`: Groq API key.
    /// * `default_model`: Model used when request options don't name one.
    /// * `api_base_url`: Optional custom base URL override.
    /// * `client_override`: Optional custom `reqwest::Client` to use.
    pub fn new_with_options(
        api_key: impl Into<String>,
        default_model: Option<String>,
        api_base_url: Option<String>,
        client_override: Option<Client>,
    ) -> Result<Self, GroqError> {
        let mut config = GroqConfig::new(api_key)?;
        if let Some(base_url_str) = api_base_url {
            config = config.base_url(&base_url_str)?;
        }
        Self::from_config(config, default_model, client_override)
    }

    pub fn from_config(
        config: GroqConfig,
        default_model: Option<String>,
        client_override: Option<Client>,
    ) -> Result<Self, GroqError> {
        let default_model = default_model.unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string());
        if default_model.trim().is_empty() {
            return Err(GroqError::InvalidConfiguration("Model name cannot be empty".to_string()));
        }
        let shared_client = SharedGroqClient::new(config, client_override)?;
        Ok(Self { shared_client, default_model })
    }

    /// Creates a client and verifies the API key by listing the available models.
    ///
    /// This is the explicit initialization step: a client returned from here is known to be
    /// able to talk to Groq.
    #[instrument(name = "groq_connect", skip(config, client_override))]
    pub async fn connect(
        config: GroqConfig,
        default_model: Option<String>,
        client_override: Option<Client>,
    ) -> Result<Self, GroqError> {
        let client = Self::from_config(config, default_model, client_override)?;
        let models = client.fetch_models().await?;
        info!(
            models = ?models.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
            "Connected to Groq."
        );
        Ok(client)
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn fetch_models(&self) -> Result<Vec<ModelInfo>, GroqError> {
        let url = self.shared_client.build_url("models")?;
        debug!(%url, "Listing Groq models");

        let response = self.shared_client.http_client()
            .get(url)
            .bearer_auth(self.shared_client.config().api_key.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            error!(status = %response.status(), "Groq models endpoint returned error status");
            return Err(map_response_error(response).await);
        }

        let raw_body = response.text().await?;
        trace!(body = %raw_body, "Received Groq models response body");
        let list: GroqModelList = serde_json::from_str(&raw_body)
            .map_err(|source| GroqError::ResponseParsing {
                context: "Parsing model list".to_string(),
                source,
            })?;

        Ok(list.data.into_iter()
            .map(|m| ModelInfo {
                id: m.id,
                owned_by: m.owned_by,
                context_window: m.context_window,
            })
            .collect())
    }

    async fn complete(&self, messages: &[Message], options: &ChatOptions) -> Result<ChatResponse, GroqError> {
        // 1. Validate input
        if messages.is_empty() {
            return Err(GroqError::InvalidInput("Conversation must contain at least one message".to_string()));
        }

        // 2. Build request
        let model = options.model_id.as_deref().unwrap_or(&self.default_model);
        let request = GroqChatRequest {
            model,
            messages: messages.iter().map(GroqMessage::from).collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stop: options.stop_sequences.as_deref(),
        };
        let request_json = serde_json::to_string(&request)
            .map_err(GroqError::RequestSerialization)?;
        trace!(body = %request_json, "Constructed Groq chat request body JSON");

        // 3. Send
        let url = self.shared_client.build_url("chat/completions")?;
        debug!(%url, %model, "Sending chat completion request to Groq");
        let response = self.shared_client.http_client()
            .post(url)
            .bearer_auth(self.shared_client.config().api_key.expose_secret())
            .header("Content-Type", "application/json")
            .body(request_json)
            .send()
            .await?;

        if !response.status().is_success() {
            error!(status = %response.status(), "Groq chat API returned error status");
            return Err(map_response_error(response).await);
        }

        // 4. Parse
        let raw_body = response.text().await?;
        trace!(body = %raw_body, "Received Groq chat response body");
        let parsed: GroqChatResponse = serde_json::from_str(&raw_body)
            .map_err(|source| {
                error!(parse_error = %source, "Failed to parse Groq chat response JSON");
                GroqError::ResponseParsing {
                    context: "Parsing chat completion".to_string(),
                    source,
                }
            })?;

        let choice = parsed.choices.into_iter()
            .next()
            .ok_or_else(|| GroqError::UnexpectedResponse("Response contained no choices".to_string()))?;

        Ok(ChatResponse {
            content: choice.message.content.unwrap_or_default(),
            usage: parsed.usage.map(UsageInfo::from),
            finish_reason: choice.finish_reason.as_deref().map(map_finish_reason),
            model_id: parsed.model,
        })
    }
}

#[async_trait]
impl ChatApi for GroqChatClient {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ChatError> {
        Ok(self.fetch_models().await?)
    }

    #[instrument(skip(self, messages, options), fields(messages = messages.len()))]
    async fn generate(&self, messages: &[Message], options: &ChatOptions) -> Result<ChatResponse, ChatError> {
        Ok(self.complete(messages, options).await?)
    }
}
