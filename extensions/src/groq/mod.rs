//! Chat completions through Groq's OpenAI-compatible REST API.

mod chat;
mod error;
mod shared;

pub use chat::{GroqChatClient, DEFAULT_GROQ_MODEL};
pub use error::{GroqError, GroqErrorDetail};
pub use shared::GroqConfig;
