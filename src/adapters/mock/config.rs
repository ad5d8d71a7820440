//! In-memory chatbot store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::ChatbotConfig;
use crate::traits::{ChatbotConfigSource, ConfigSourceError};

/// Chatbot store that keeps records in memory.
///
/// # Example
///
/// ```ignore
/// use botchat::adapters::mock::InMemoryChatbotStore;
///
/// let store = InMemoryChatbotStore::new();
/// store.insert("support", ChatbotConfig::default().with_name("Support"));
///
/// let config = store.fetch("support").await?;
/// assert_eq!(config.name, "Support");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatbotStore {
    chatbots: Arc<Mutex<HashMap<String, ChatbotConfig>>>,
    /// When set, every fetch fails with this error
    failure: Arc<Mutex<Option<ConfigSourceError>>>,
    fetch_count: Arc<Mutex<usize>>,
}

impl InMemoryChatbotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a chatbot record under `id`.
    pub fn insert(&self, id: &str, config: ChatbotConfig) {
        self.chatbots.lock().unwrap().insert(id.to_string(), config);
    }

    /// Make every subsequent fetch fail.
    pub fn fail_with(&self, error: ConfigSourceError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// Number of fetch calls made so far.
    pub fn fetch_count(&self) -> usize {
        *self.fetch_count.lock().unwrap()
    }
}

#[async_trait]
impl ChatbotConfigSource for InMemoryChatbotStore {
    async fn fetch(&self, chatbot_id: &str) -> Result<ChatbotConfig, ConfigSourceError> {
        *self.fetch_count.lock().unwrap() += 1;

        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }

        self.chatbots
            .lock()
            .unwrap()
            .get(chatbot_id)
            .cloned()
            .ok_or_else(|| ConfigSourceError::NotFound(chatbot_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let store = InMemoryChatbotStore::new();
        store.insert("support", ChatbotConfig::default().with_name("Support"));

        let config = store.fetch("support").await.unwrap();
        assert_eq!(config.name, "Support");
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_id() {
        let store = InMemoryChatbotStore::new();
        assert_eq!(
            store.fetch("nope").await.unwrap_err(),
            ConfigSourceError::NotFound("nope".to_string())
        );
    }

    #[tokio::test]
    async fn test_forced_failure() {
        let store = InMemoryChatbotStore::new();
        store.insert("support", ChatbotConfig::default());
        store.fail_with(ConfigSourceError::Unavailable("offline".to_string()));

        assert!(matches!(
            store.fetch("support").await,
            Err(ConfigSourceError::Unavailable(_))
        ));
    }
}
