//! Unified error type for the crate.

use thiserror::Error;

use super::category::ErrorCategory;
use super::transport::TransportError;
use crate::traits::ConfigSourceError;

/// Unified error type covering every fallible operation outside the
/// streaming read loop.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Streaming request failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Chatbot configuration could not be resolved
    #[error("{0}")]
    Config(#[from] ConfigSourceError),

    /// Invalid runtime settings or arguments
    #[error("invalid settings: {message}")]
    Settings { message: String },

    /// Local I/O (stdin, stdout, store files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    pub fn settings(message: impl Into<String>) -> Self {
        ChatError::Settings {
            message: message.into(),
        }
    }

    /// Get the high-level category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::Transport(err) if err.is_server_side() => ErrorCategory::Server,
            ChatError::Transport(_) => ErrorCategory::Network,
            ChatError::Config(ConfigSourceError::NotFound(_))
            | ChatError::Config(ConfigSourceError::InvalidId(_)) => ErrorCategory::User,
            ChatError::Config(ConfigSourceError::Unavailable(_)) => ErrorCategory::Network,
            ChatError::Config(ConfigSourceError::Serialization(_)) => ErrorCategory::Server,
            ChatError::Settings { .. } => ErrorCategory::Configuration,
            ChatError::Io(_) => ErrorCategory::System,
        }
    }

    /// Check if retrying the same operation might succeed.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Message suitable for showing outside of a conversation transcript.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Config(ConfigSourceError::NotFound(id)) => {
                format!("No chatbot with id '{}' exists.", id)
            }
            _ => format!("{}. {}.", self, self.category().recovery_hint()),
        }
    }
}
