//! Moonshot API client implementation
//!
//! Implements the LlmClient trait for the Moonshot (Kimi) OpenAI-compatible
//! Chat Completions API, with blocking and streaming responses.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use super::sse::SseDecoder;
use super::{ChatMessage, LlmClient, LlmError};
use crate::config::LlmConfig;

/// Moonshot API client
pub struct MoonshotClient {
    model: String,
    api_key: String,
    base_url: String,
    temperature: f64,
    http: Client,
}

impl MoonshotClient {
    /// Create a new client from configuration
    ///
    /// Fails before any request is made when the credential is missing or
    /// still the placeholder from a config template, or when the endpoint
    /// does not parse as a URL.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");

        let api_key = config
            .api_key()
            .map_err(|_| LlmError::MissingApiKey(config.api_key_env.clone()))?;
        if api_key.trim().is_empty() || api_key.contains("your-api-key") {
            return Err(LlmError::MissingApiKey(config.api_key_env.clone()));
        }

        if reqwest::Url::parse(&config.base_url).is_err() {
            return Err(LlmError::InvalidEndpoint(config.base_url.clone()));
        }

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            http,
        })
    }

    /// Build the request body for the chat completions endpoint
    fn build_request_body(&self, messages: &[ChatMessage], stream: bool) -> serde_json::Value {
        debug!(%self.model, message_count = messages.len(), stream, "build_request_body: called");
        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "stream": stream,
        })
    }

    /// POST a request body, turning any non-2xx status into an ApiError
    async fn post(&self, body: &serde_json::Value) -> Result<reqwest::Response, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(LlmError::Network)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            debug!(%status, "post: API error");
            return Err(LlmError::ApiError { status, message });
        }

        Ok(response)
    }
}

#[async_trait]
impl LlmClient for MoonshotClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        debug!(%self.model, message_count = messages.len(), "complete: called");
        let body = self.build_request_body(&messages, false);
        let response = self.post(&body).await?;

        let api_response: CompletionResponse = response.json().await?;
        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Response carried no content".to_string()))
    }

    async fn chat_stream(
        &self,
        messages: Vec<ChatMessage>,
        frag_tx: mpsc::Sender<String>,
    ) -> Result<String, LlmError> {
        debug!(%self.model, message_count = messages.len(), "chat_stream: called");
        let body = self.build_request_body(&messages, true);
        let response = self.post(&body).await?;

        let mut stream = response.bytes_stream();
        let mut decoder = SseDecoder::new();
        let mut full_content = String::new();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(LlmError::Stream)?;
            for fragment in decoder.feed(&chunk) {
                full_content.push_str(&fragment);
                let _ = frag_tx.send(fragment).await;
            }
            if decoder.is_done() {
                break;
            }
        }

        // EOF without the sentinel still counts as a clean completion
        if !decoder.is_done() {
            debug!("chat_stream: connection closed before [DONE]");
        }

        debug!(chars = full_content.len(), "chat_stream: complete");
        Ok(full_content)
    }
}

// Blocking response wire types

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}
