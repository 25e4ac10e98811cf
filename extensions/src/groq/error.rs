use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use newsroom_core::chat::ChatError;

// ============== Groq API Error Structures ==============

/// The error envelope returned by Groq's OpenAI-compatible endpoints.
#[derive(Deserialize, Debug, Clone)]
pub struct GroqErrorResponse {
    pub error: GroqErrorDetail,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GroqErrorDetail {
    /// Developer-facing error message.
    pub message: String,
    /// Error category (e.g., "invalid_request_error").
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Machine-readable code (e.g., "invalid_api_key", "model_not_found").
    #[serde(default)]
    pub code: Option<String>,
}

// ============== Internal Groq Client Error Enum ==============

/// Internal error type for the Groq client.
///
/// Converted into the public `ChatError` at the `ChatApi` boundary.
#[derive(Error, Debug)]
pub enum GroqError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to serialize request body: {0}")]
    RequestSerialization(#[source] serde_json::Error),

    /// Error parsing a *successful* response body.
    #[error("Failed to parse successful response body ({context}): {source}")]
    ResponseParsing {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The API answered with a non-success status code.
    #[error("Groq API error: status={status}, message='{body_text}'")]
    ApiError {
        status: StatusCode,
        /// Parsed error details, if the body had the usual shape.
        detail: Option<GroqErrorDetail>,
        body_text: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Input rejected before sending (e.g., an empty conversation).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The API returned a successful response without the expected data.
    #[error("Unexpected response format or data: {0}")]
    UnexpectedResponse(String),
}

/// Converts a non-success `reqwest::Response` into `GroqError::ApiError`.
///
/// If the body cannot be parsed as a Groq error envelope, the raw text is kept and `detail` is
/// `None`. If the body cannot be read at all, a `GroqError::Network` is returned.
pub(crate) async fn map_response_error(response: reqwest::Response) -> GroqError {
    let status = response.status();
    debug_assert!(!status.is_success(), "map_response_error called with success status");

    match response.text().await {
        Ok(body_text) => match serde_json::from_str::<GroqErrorResponse>(&body_text) {
            Ok(parsed) => GroqError::ApiError {
                status,
                detail: Some(parsed.error),
                body_text,
            },
            Err(parse_err) => {
                warn!(
                    status = %status,
                    error = %parse_err,
                    body = %body_text,
                    "Failed to parse Groq error response JSON, returning raw body."
                );
                GroqError::ApiError { status, detail: None, body_text }
            }
        },
        Err(e) => {
            warn!(status = %status, error = %e, "Failed to read Groq error response body text.");
            GroqError::Network(e)
        }
    }
}

// ============== From<GroqError> for ChatError ==============

impl From<GroqError> for ChatError {
    fn from(err: GroqError) -> Self {
        match err {
            GroqError::Network(source) => ChatError::Network(Box::new(source)),
            GroqError::RequestSerialization(source) => {
                ChatError::InvalidRequest(format!("Failed to serialize request: {}", source))
            }
            GroqError::ResponseParsing { source, .. } => ChatError::Parsing(Box::new(source)),
            GroqError::ApiError { status, detail, body_text } => {
                let model_missing = detail.as_ref()
                    .and_then(|d| d.code.as_deref())
                    .is_some_and(|code| code == "model_not_found");
                let message = detail
                    .map(|d| match d.code {
                        Some(code) => format!("{} (code: {})", d.message, code),
                        None => d.message,
                    })
                    .unwrap_or(body_text);

                match status {
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ChatError::Authentication(message),
                    StatusCode::NOT_FOUND => ChatError::ModelNotFound(message),
                    StatusCode::BAD_REQUEST if model_missing => ChatError::ModelNotFound(message),
                    StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ChatError::InvalidRequest(message),
                    StatusCode::TOO_MANY_REQUESTS => ChatError::RateLimited,
                    _ => ChatError::Api {
                        status: Some(status.as_u16()),
                        message,
                        source: None,
                    },
                }
            }
            GroqError::InvalidConfiguration(msg) => ChatError::Configuration(msg),
            GroqError::InvalidInput(msg) => ChatError::InvalidRequest(msg),
            GroqError::UnexpectedResponse(msg) => ChatError::Provider(msg.into()),
        }
    }
}
