//! Chat-completion backend capability and the OpenAI implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Settings;

/// One message in a chat-completion exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for the chat-completions endpoint; reused verbatim as the
/// per-line body of the batch request log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

impl ChatResponse {
    /// Completion content of the first choice, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|choice| choice.message.content.as_str())
    }
}

/// Capability for obtaining a completion. Production and test backends both
/// implement this, so the pipeline never couples to a vendor call shape.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Return the raw completion content for the given messages.
    async fn complete(&self, messages: Vec<ChatMessage>, temperature: f32) -> Result<String>;
}

/// Backend talking to an OpenAI-compatible chat-completions API.
pub struct OpenAiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    /// Build from settings; fails fast when the credential is missing.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_api_key()?.to_string();
        Ok(Self {
            client: http_client()?,
            base_url: settings.openai_base_url.clone(),
            api_key,
            model: settings.openai_model.clone(),
        })
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn complete(&self, messages: Vec<ChatMessage>, temperature: f32) -> Result<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature,
        };
        let url = format!("{}/chat/completions", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("chat completion request")?;
        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            anyhow::bail!("chat completion failed with {status}: {detail}");
        }
        let payload: ChatResponse = resp.json().await.context("decode chat completion")?;
        payload
            .content()
            .map(str::to_string)
            .context("chat completion carried no choices")
    }
}

pub(crate) fn http_client() -> Result<Client> {
    Ok(Client::builder()
        .user_agent("mot-insight/0.1")
        .gzip(true)
        .brotli(true)
        .build()?)
}
