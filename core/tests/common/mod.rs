#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use newsroom_core::{
    acquisition::{FetchError, Fetcher},
    chat::{ChatApi, ChatError, ChatOptions, ChatResponse, Message, ModelInfo},
    embedding::{Embedder, Embedding, EmbeddingError},
};

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Counts occurrences of a fixed vocabulary; one dimension per word.
pub struct KeywordEmbedder {
    vocabulary: Vec<&'static str>,
}

impl KeywordEmbedder {
    pub fn new(vocabulary: &[&'static str]) -> Self {
        Self { vocabulary: vocabulary.to_vec() }
    }

    fn embed_one(&self, text: &str) -> Embedding {
        let mut values = vec![0.0; self.vocabulary.len()];
        for token in tokens(text) {
            if let Some(i) = self.vocabulary.iter().position(|w| *w == token) {
                values[i] += 1.0;
            }
        }
        Embedding::from(values)
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    fn model_name(&self) -> &str {
        "keyword-test"
    }
}

/// Produces one component per word, so vector lengths depend on the input.
pub struct MisconfiguredEmbedder;

#[async_trait]
impl Embedder for MisconfiguredEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        Ok(texts.iter()
            .map(|t| Embedding::from(vec![1.0; tokens(t).count()]))
            .collect())
    }

    fn dimensions(&self) -> usize {
        4
    }

    fn model_name(&self) -> &str {
        "misconfigured-test"
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        Err(EmbeddingError::Provider("model unavailable".into()))
    }

    fn dimensions(&self) -> usize {
        4
    }

    fn model_name(&self) -> &str {
        "failing-test"
    }
}

/// Returns NaN components for every text containing `poisoned_word`, like a model fed input
/// it cannot handle.
pub struct NanEmbedder {
    pub poisoned_word: &'static str,
}

#[async_trait]
impl Embedder for NanEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        Ok(texts.iter()
            .map(|t| {
                if tokens(t).any(|w| w == self.poisoned_word) {
                    Embedding::from(vec![-f32::NAN, 0.0])
                } else {
                    Embedding::from(vec![1.0, 0.0])
                }
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn model_name(&self) -> &str {
        "nan-test"
    }
}

/// Drops the last vector of every batch larger than one.
pub struct ShortBatchEmbedder;

#[async_trait]
impl Embedder for ShortBatchEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        let keep = if texts.len() > 1 { texts.len() - 1 } else { texts.len() };
        Ok(texts[..keep].iter().map(|_| Embedding::from(vec![0.0, 1.0])).collect())
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn model_name(&self) -> &str {
        "short-batch-test"
    }
}

/// Serves canned page text per URL; unknown URLs fail with a 404.
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages.iter().map(|(u, t)| (u.to_string(), t.to_string())).collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().ok_or(FetchError::Status(404))
    }
}

/// Echoes the prompt it was given, so tests can see which context reached the model.
pub struct EchoChatModel {
    pub reply_prefix: String,
    pub last_messages: Mutex<Vec<Message>>,
    pub last_options: Mutex<Option<ChatOptions>>,
}

impl EchoChatModel {
    pub fn new(reply_prefix: &str) -> Self {
        Self {
            reply_prefix: reply_prefix.to_string(),
            last_messages: Mutex::new(Vec::new()),
            last_options: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ChatApi for EchoChatModel {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ChatError> {
        Ok(vec![ModelInfo { id: "echo".into(), owned_by: None, context_window: None }])
    }

    async fn generate(&self, messages: &[Message], options: &ChatOptions) -> Result<ChatResponse, ChatError> {
        *self.last_messages.lock().unwrap() = messages.to_vec();
        *self.last_options.lock().unwrap() = Some(options.clone());
        let prompt = messages.last().map(Message::text).unwrap_or_default();
        Ok(ChatResponse {
            content: format!("  {}{}\n", self.reply_prefix, prompt),
            usage: None,
            finish_reason: None,
            model_id: options.model_id.clone(),
        })
    }
}
