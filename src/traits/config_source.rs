//! Chatbot configuration lookup trait.
//!
//! Resolving a chatbot id into its configuration belongs to the hosting
//! backend. The streaming core only ever sees the resolved record, so the
//! lookup sits behind this seam.

use async_trait::async_trait;

use crate::models::ChatbotConfig;

/// Configuration lookup errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSourceError {
    /// No chatbot with this id
    NotFound(String),
    /// The id cannot be used as a lookup key
    InvalidId(String),
    /// The backing store could not be reached or read
    Unavailable(String),
    /// The stored record could not be decoded
    Serialization(String),
}

impl std::fmt::Display for ConfigSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSourceError::NotFound(id) => write!(f, "Chatbot not found: {}", id),
            ConfigSourceError::InvalidId(id) => write!(f, "Invalid chatbot id: {}", id),
            ConfigSourceError::Unavailable(msg) => {
                write!(f, "Chatbot store unavailable: {}", msg)
            }
            ConfigSourceError::Serialization(msg) => {
                write!(f, "Invalid chatbot record: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigSourceError {}

/// Trait for resolving chatbot configurations by id.
#[async_trait]
pub trait ChatbotConfigSource: Send + Sync {
    /// Fetch the configuration of a single chatbot.
    async fn fetch(&self, chatbot_id: &str) -> Result<ChatbotConfig, ConfigSourceError>;
}

/// Reject ids that are empty or could escape a directory or query string.
pub(crate) fn validate_chatbot_id(chatbot_id: &str) -> Result<(), ConfigSourceError> {
    let valid = !chatbot_id.is_empty()
        && chatbot_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ConfigSourceError::InvalidId(chatbot_id.to_string()))
    }
}
