//! HTTP access to the remote chat/triage service.

use chrono::Utc;
use serde_json::Value;

use crate::error::{ChatError, Result};
use crate::types::{ChatReply, NewChatResponse, SendMessageRequest};

/// The remote service surface the sync operations depend on. Kept as a
/// trait so tests can swap in a scripted implementation.
pub trait ChatApi {
    /// Fetch the raw list payload (`{ "data": [...] }` or a bare array).
    fn list(&self) -> impl Future<Output = Result<Value>> + Send;

    /// Create a conversation, returning the server-assigned id.
    fn create(&self) -> impl Future<Output = Result<String>> + Send;

    /// Send a message to a conversation, returning the assistant's reply.
    fn send(&self, chat_id: &str, message: &str) -> impl Future<Output = Result<String>> + Send;
}

/// reqwest-backed implementation of the service contract.
///
/// No request timeout is configured: the contract has no retry or
/// cancellation story, and a hung call simply keeps the in-flight slot
/// claimed until it resolves.
#[derive(Clone)]
pub struct HttpChatApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(ChatError::Status(response.status()));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl ChatApi for HttpChatApi {
    async fn list(&self) -> Result<Value> {
        let response = self.client.get(format!("{}/", self.base_url)).send().await?;
        Self::decode(response).await
    }

    async fn create(&self) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/chat/new", self.base_url))
            .header("Content-Type", "application/json")
            .send()
            .await?;
        let data: NewChatResponse = Self::decode(response).await?;
        Ok(data.id)
    }

    async fn send(&self, chat_id: &str, message: &str) -> Result<String> {
        let body = SendMessageRequest {
            chat_id: chat_id.to_string(),
            message: message.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        };
        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .json(&body)
            .send()
            .await?;
        let data: ChatReply = Self::decode(response).await?;
        Ok(data.reply)
    }
}
