//! Runtime configuration.
//!
//! Where the chat endpoint lives, which credential to send, and where
//! chatbot records are looked up. Values come from `BOTCHAT_*` environment
//! variables with local-development defaults.

use std::path::PathBuf;

/// Default chat completion endpoint (local development stack).
pub const DEFAULT_CHAT_ENDPOINT: &str = "http://localhost:54321/functions/v1/chat-with-bot";

pub const ENV_ENDPOINT: &str = "BOTCHAT_ENDPOINT";
pub const ENV_API_KEY: &str = "BOTCHAT_API_KEY";
pub const ENV_REST_URL: &str = "BOTCHAT_REST_URL";
pub const ENV_STORE_DIR: &str = "BOTCHAT_STORE_DIR";
pub const ENV_LOG: &str = "BOTCHAT_LOG";

/// Application configuration.
///
/// Use the builder pattern to customize it.
///
/// # Example
///
/// ```ignore
/// use botchat::config::AppConfig;
///
/// let config = AppConfig::default()
///     .with_chat_endpoint("https://project.example.co/functions/v1/chat-with-bot")
///     .with_api_key("public-anon-key");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Streaming chat completion endpoint
    pub chat_endpoint: String,
    /// Bearer credential; no Authorization header when unset
    pub api_key: Option<String>,
    /// Base URL of the hosted chatbot table; file store when unset
    pub rest_url: Option<String>,
    /// Directory of chatbot records for the file store
    pub store_dir: Option<PathBuf>,
    /// Tracing filter directive
    pub log_filter: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chat_endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            api_key: None,
            rest_url: None,
            store_dir: default_store_dir(),
            log_filter: None,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.chat_endpoint = endpoint.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_rest_url(mut self, url: impl Into<String>) -> Self {
        self.rest_url = Some(url.into());
        self
    }

    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = Some(dir.into());
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Create config from the `BOTCHAT_*` environment variables.
    ///
    /// Unset or blank variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = Self::default();
        if let Some(endpoint) = get(ENV_ENDPOINT) {
            config.chat_endpoint = endpoint;
        }
        config.api_key = get(ENV_API_KEY);
        config.rest_url = get(ENV_REST_URL);
        if let Some(dir) = get(ENV_STORE_DIR) {
            config.store_dir = Some(PathBuf::from(dir));
        }
        config.log_filter = get(ENV_LOG);
        config
    }
}

fn default_store_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".botchat").join("chatbots"))
}
