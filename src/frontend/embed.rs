//! Embed front-end: chat with a stored chatbot, looked up by id.

use std::sync::Arc;
use tracing::info;

use crate::adapters::{FileChatbotStore, RestChatbotStore};
use crate::chat::{ChatClient, ChatWidget};
use crate::config::AppConfig;
use crate::error::{ChatError, ChatResult};
use crate::traits::{ChatbotConfigSource, HttpClient};

/// Pick the chatbot store the configuration points at.
///
/// The hosted table when a REST URL is configured, otherwise the file store.
pub fn config_source(
    config: &AppConfig,
    http: Arc<dyn HttpClient>,
) -> ChatResult<Box<dyn ChatbotConfigSource>> {
    if let Some(rest_url) = &config.rest_url {
        let store = RestChatbotStore::new(http, rest_url.clone()).with_api_key(config.api_key.clone());
        return Ok(Box::new(store));
    }

    match &config.store_dir {
        Some(dir) => Ok(Box::new(FileChatbotStore::with_dir(dir.clone()))),
        None => Err(ChatError::settings(
            "no chatbot store: set BOTCHAT_REST_URL or BOTCHAT_STORE_DIR",
        )),
    }
}

/// Embedded chatbot: a widget plus the store its configuration comes from.
pub struct EmbedFrontend {
    widget: ChatWidget,
    source: Box<dyn ChatbotConfigSource>,
}

impl EmbedFrontend {
    /// Front-end for `chatbot_id`. Nothing can be sent until [`EmbedFrontend::load`]
    /// succeeds.
    pub fn new(
        client: ChatClient,
        source: Box<dyn ChatbotConfigSource>,
        chatbot_id: impl Into<String>,
    ) -> Self {
        Self {
            widget: ChatWidget::unresolved(client, chatbot_id),
            source,
        }
    }

    /// Look the chatbot up and make the widget ready.
    pub async fn load(&mut self) -> ChatResult<()> {
        let chatbot_id = self.widget.chatbot_id().unwrap_or_default().to_string();
        let config = self.source.fetch(&chatbot_id).await?;
        info!(chatbot_id = %chatbot_id, name = %config.display_name(), "Loaded chatbot");
        self.widget.resolve(config);
        Ok(())
    }

    pub fn widget(&self) -> &ChatWidget {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut ChatWidget {
        &mut self.widget
    }

    pub fn into_widget(self) -> ChatWidget {
        self.widget
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryChatbotStore, MockHttpClient};
    use crate::chat::SendOutcome;
    use crate::models::ChatbotConfig;
    use crate::traits::ConfigSourceError;

    fn client() -> ChatClient {
        ChatClient::new(Arc::new(MockHttpClient::new()), "http://chat.test/fn")
    }

    #[tokio::test]
    async fn test_load_resolves_widget() {
        let store = InMemoryChatbotStore::new();
        store.insert("bot-1", ChatbotConfig::default().with_name("Support"));
        let mut embed = EmbedFrontend::new(client(), Box::new(store), "bot-1");

        assert!(!embed.widget().is_ready());
        embed.load().await.unwrap();
        assert_eq!(embed.widget().config().unwrap().name, "Support");
        assert!(embed.widget().input_enabled());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_input_disabled() {
        let store = InMemoryChatbotStore::new();
        let mut embed = EmbedFrontend::new(client(), Box::new(store), "ghost");

        let err = embed.load().await.unwrap_err();
        assert!(matches!(err, ChatError::Config(ConfigSourceError::NotFound(_))));
        assert_eq!(embed.widget_mut().send("Hi").await, SendOutcome::Rejected);
    }

    #[test]
    fn test_config_source_selection() {
        let http: Arc<dyn HttpClient> = Arc::new(MockHttpClient::new());

        let file = AppConfig::default().with_store_dir("/tmp/bots");
        assert!(config_source(&file, http.clone()).is_ok());

        let rest = AppConfig::default().with_rest_url("http://db.test");
        assert!(config_source(&rest, http.clone()).is_ok());

        let mut none = AppConfig::default();
        none.store_dir = None;
        assert!(config_source(&none, http).is_err());
    }
}
