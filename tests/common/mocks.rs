//! Mock wiring for integration tests.
//!
//! Re-exports the mock implementations from `botchat::adapters::mock` and
//! builds widgets on top of them.

pub use botchat::adapters::mock::{InMemoryChatbotStore, MockHttpClient, MockStream};

use botchat::chat::{ChatClient, ChatWidget};
use botchat::models::ChatbotConfig;
use std::sync::Arc;

use super::TEST_ENDPOINT;

/// Chat client posting to [`TEST_ENDPOINT`] through `mock`.
pub fn mock_client(mock: &MockHttpClient) -> ChatClient {
    ChatClient::new(Arc::new(mock.clone()), TEST_ENDPOINT)
        .with_api_key(Some("test-anon-key".to_string()))
}

/// Preview-style widget with the default configuration.
pub fn test_widget() -> (MockHttpClient, ChatWidget) {
    let mock = MockHttpClient::new();
    let widget = ChatWidget::new(mock_client(&mock), ChatbotConfig::default());
    (mock, widget)
}
