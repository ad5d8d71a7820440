//! File-based chatbot store adapter.
//!
//! Each chatbot is a JSON record at `<dir>/<id>.json`, shaped like a row of
//! the hosted `chatbots` table:
//!
//! ```json
//! { "name": "Support", "ai_provider": "openai/gpt-4o-mini",
//!   "system_prompt": "Be brief.", "theme_config": { "primaryColor": "#0EA5E9", ... } }
//! ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::ChatbotConfig;
use crate::traits::config_source::validate_chatbot_id;
use crate::traits::{ChatbotConfigSource, ConfigSourceError};

/// Directory of chatbot records.
///
/// Chatbots live in `~/.botchat/chatbots` unless another directory is given.
///
/// # Example
///
/// ```ignore
/// use botchat::adapters::FileChatbotStore;
/// use botchat::traits::ChatbotConfigSource;
///
/// let store = FileChatbotStore::new()?;
/// let config = store.fetch("support").await?;
/// println!("Talking to {}", config.display_name());
/// ```
#[derive(Debug, Clone)]
pub struct FileChatbotStore {
    dir: PathBuf,
}

impl FileChatbotStore {
    /// Store rooted at the default directory.
    ///
    /// # Returns
    /// The store, or an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, ConfigSourceError> {
        dirs::home_dir()
            .map(|home| Self::with_dir(home.join(".botchat").join("chatbots")))
            .ok_or_else(|| {
                ConfigSourceError::Unavailable("Failed to determine home directory".to_string())
            })
    }

    /// Store rooted at `dir`.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for `chatbot_id`.
    pub fn record_path(&self, chatbot_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", chatbot_id))
    }

    /// Write a record, creating the directory if needed.
    pub async fn save(
        &self,
        chatbot_id: &str,
        config: &ChatbotConfig,
    ) -> Result<(), ConfigSourceError> {
        validate_chatbot_id(chatbot_id)?;

        let json = serde_json::to_string_pretty(config)
            .map_err(|e| ConfigSourceError::Serialization(e.to_string()))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ConfigSourceError::Unavailable(e.to_string()))?;
        tokio::fs::write(self.record_path(chatbot_id), json)
            .await
            .map_err(|e| ConfigSourceError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl ChatbotConfigSource for FileChatbotStore {
    async fn fetch(&self, chatbot_id: &str) -> Result<ChatbotConfig, ConfigSourceError> {
        validate_chatbot_id(chatbot_id)?;

        let path = self.record_path(chatbot_id);
        debug!(path = %path.display(), "Loading chatbot record");

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigSourceError::NotFound(chatbot_id.to_string()));
            }
            Err(e) => return Err(ConfigSourceError::Unavailable(e.to_string())),
        };

        serde_json::from_str(&contents)
            .map_err(|e| ConfigSourceError::Serialization(format!("{}: {}", path.display(), e)))
    }
}
