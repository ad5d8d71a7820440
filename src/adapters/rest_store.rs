//! REST-backed chatbot store adapter.
//!
//! Looks chatbots up in a hosted `chatbots` table through its PostgREST
//! interface: `GET {base}/rest/v1/chatbots?id=eq.{id}&select=*`, which
//! answers with a JSON array of matching rows.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::models::ChatbotConfig;
use crate::traits::config_source::validate_chatbot_id;
use crate::traits::{ChatbotConfigSource, ConfigSourceError, Headers, HttpClient};

/// Chatbot store reading from a PostgREST endpoint.
pub struct RestChatbotStore {
    http: Arc<dyn HttpClient>,
    base_url: String,
    api_key: Option<String>,
}

impl RestChatbotStore {
    /// Create a store for the project at `base_url` (no trailing path).
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Key sent both as `apikey` and as the bearer credential.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Lookup URL for a single chatbot.
    pub fn lookup_url(&self, chatbot_id: &str) -> String {
        format!(
            "{}/rest/v1/chatbots?id=eq.{}&select=*",
            self.base_url,
            urlencoding::encode(chatbot_id)
        )
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        if let Some(key) = &self.api_key {
            headers.insert("apikey".to_string(), key.clone());
            headers.insert("Authorization".to_string(), format!("Bearer {}", key));
        }
        headers
    }
}

impl std::fmt::Debug for RestChatbotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestChatbotStore")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

#[async_trait]
impl ChatbotConfigSource for RestChatbotStore {
    async fn fetch(&self, chatbot_id: &str) -> Result<ChatbotConfig, ConfigSourceError> {
        validate_chatbot_id(chatbot_id)?;

        let url = self.lookup_url(chatbot_id);
        debug!(url = %url, "Fetching chatbot record");

        let response = self
            .http
            .get(&url, &self.headers())
            .await
            .map_err(|e| ConfigSourceError::Unavailable(e.to_string()))?;

        if !response.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ConfigSourceError::Unavailable(format!(
                "HTTP {}: {}",
                response.status,
                body.trim()
            )));
        }

        let rows: Vec<ChatbotConfig> = response
            .json()
            .map_err(|e| ConfigSourceError::Serialization(e.to_string()))?;

        rows.into_iter()
            .next()
            .ok_or_else(|| ConfigSourceError::NotFound(chatbot_id.to_string()))
    }
}
