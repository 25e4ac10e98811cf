use std::sync::Arc;

use tracing::{debug, instrument};

use crate::chat::{ChatApi, ChatError, ChatOptions, Message};

const SYSTEM_PROMPT: &str =
    "You are a helpful research assistant that provides detailed answers based on given context.";

/// Builds the conversation sent to the chat model for one question.
pub fn build_messages(context: &str, query: &str) -> Vec<Message> {
    let prompt = format!(
        "Context: {context}\n\n\
        Question: {query}\n\n\
        Using the provided context, generate a comprehensive and detailed answer to the question.\n\
        Ensure your response is:\n\
        - Directly based on the given context\n\
        - Thorough and informative\n\
        - Clearly structured\n\n\
        Answer:"
    );
    vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)]
}

/// Answers a question from a single context document using a chat model.
#[derive(Clone)]
pub struct Answerer {
    chat: Arc<dyn ChatApi>,
    options: ChatOptions,
}

impl Answerer {
    pub fn new(chat: Arc<dyn ChatApi>, options: ChatOptions) -> Self {
        Self { chat, options }
    }

    pub fn options(&self) -> &ChatOptions {
        &self.options
    }

    /// Generates an answer to `query` grounded in `context`.
    ///
    /// The returned text is trimmed. A reply consisting only of whitespace is reported as
    /// [`ChatError::EmptyResponse`].
    #[instrument(skip(self, context, query), fields(model = ?self.options.model_id, context_len = context.len()))]
    pub async fn answer(&self, context: &str, query: &str) -> Result<String, ChatError> {
        let messages = build_messages(context, query);
        let response = self.chat.generate(&messages, &self.options).await?;
        debug!(usage = ?response.usage, finish_reason = ?response.finish_reason, "Received answer.");

        let answer = response.content.trim();
        if answer.is_empty() {
            return Err(ChatError::EmptyResponse);
        }
        Ok(answer.to_string())
    }
}
