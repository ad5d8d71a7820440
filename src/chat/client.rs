//! Chat endpoint client.
//!
//! Builds the completion request for a conversation and opens the response
//! stream. Everything after the status check belongs to [`StreamSession`].
//!
//! [`StreamSession`]: crate::chat::StreamSession

use std::sync::Arc;
use tracing::debug;

use crate::error::TransportError;
use crate::models::ChatRequest;
use crate::traits::{Headers, HttpClient, HttpError};
use crate::transport::TransportReader;

/// Client for the streaming chat completion endpoint.
#[derive(Clone)]
pub struct ChatClient {
    http: Arc<dyn HttpClient>,
    endpoint: String,
    api_key: Option<String>,
}

impl ChatClient {
    /// Create a client posting to `endpoint`.
    pub fn new(http: Arc<dyn HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    /// Bearer credential for the `Authorization` header.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Headers sent with every completion request.
    pub fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        if let Some(key) = &self.api_key {
            headers.insert("Authorization".to_string(), format!("Bearer {}", key));
        }
        headers
    }

    /// Send `request` and open its response for reading.
    ///
    /// Fails with a [`TransportError`] when the request cannot be sent, the
    /// endpoint answers with a non-2xx status, or the response has no body.
    pub async fn open(&self, request: &ChatRequest) -> Result<TransportReader, TransportError> {
        let body = serde_json::to_string(request)
            .map_err(|e| TransportError::Network(HttpError::Other(e.to_string())))?;

        debug!(
            endpoint = %self.endpoint,
            messages = request.messages.len(),
            provider = %request.ai_provider,
            "Sending chat request"
        );

        let response = self
            .http
            .post_stream(&self.endpoint, &body, &self.headers())
            .await?;

        debug!(status = response.status, "Chat endpoint responded");
        TransportReader::open(response).await
    }
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("endpoint", &self.endpoint)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}
