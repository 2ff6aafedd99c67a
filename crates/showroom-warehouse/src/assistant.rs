//! Chat/completion client for the catalog assistant endpoint.
//!
//! The serving endpoint's response schema depends on how it was deployed,
//! so extraction tolerates every shape seen in the wild: agent output
//! arrays, OpenAI-style choices, bare predictions, and a plain result
//! field. Prompt construction and reply formatting live with the caller;
//! this module only moves messages.

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

use showroom_core::{Error, Result};

use crate::config::WarehouseConfig;
use crate::token::AccessToken;

/// One chat message in the conversation sent to the endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    input: &'a [ChatMessage],
}

/// Pull the reply text out of whichever response shape the endpoint used.
fn extract_reply(value: serde_json::Value) -> String {
    // Agent format: output[0].content[0].text
    if let Some(text) = value
        .pointer("/output/0/content/0/text")
        .and_then(|t| t.as_str())
    {
        return text.to_string();
    }
    // OpenAI format: choices[0].message.content
    if let Some(text) = value
        .pointer("/choices/0/message/content")
        .and_then(|t| t.as_str())
    {
        return text.to_string();
    }
    // Serving endpoint format: predictions[0], dict with content or bare string
    if let Some(prediction) = value.pointer("/predictions/0") {
        if let Some(text) = prediction.pointer("/content").and_then(|t| t.as_str()) {
            return text.to_string();
        }
        if let Some(text) = prediction.as_str() {
            return text.to_string();
        }
        return prediction.to_string();
    }
    // Plain result field
    if let Some(result) = value.get("result") {
        if let Some(text) = result.as_str() {
            return text.to_string();
        }
        return result.to_string();
    }
    debug!("Unknown completion response shape, returning raw body");
    value.to_string()
}

/// Client for one chat/completion serving endpoint.
pub struct AssistantClient {
    client: Client,
    endpoint: String,
}

impl AssistantClient {
    /// Build from configuration. `None` when no assistant endpoint is
    /// deployed, which simply disables the feature.
    pub fn from_config(config: &WarehouseConfig) -> Option<Self> {
        let endpoint = config.assistant_endpoint.clone()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Some(Self { client, endpoint })
    }

    /// Send the conversation and return the assistant's reply text.
    #[instrument(skip(self, token, messages), fields(subsystem = "warehouse", component = "assistant", op = "complete", message_count = messages.len()))]
    pub async fn complete(&self, token: &AccessToken, messages: &[ChatMessage]) -> Result<String> {
        let request = CompletionRequest { input: messages };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", token.secret()))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Backend(format!(
                "Assistant endpoint returned {}: {}",
                status, body
            )));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse response: {}", e)))?;

        let reply = extract_reply(value);
        debug!(response_len = reply.len(), "Completion received");
        Ok(reply)
    }
}
