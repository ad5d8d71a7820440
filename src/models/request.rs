use serde::{Deserialize, Serialize};

use super::chatbot::ChatbotConfig;
use super::message::Message;

/// Body of a streaming chat completion request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Full conversation log including the newly submitted user message
    pub messages: Vec<Message>,
    /// Chatbot the request is made on behalf of (embedded widgets only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chatbot_id: Option<String>,
    pub system_prompt: String,
    pub ai_provider: String,
}

impl ChatRequest {
    /// Build a request from the conversation log and a resolved chatbot config.
    ///
    /// Empty prompt or provider values fall back to the defaults.
    pub fn new(messages: Vec<Message>, config: &ChatbotConfig) -> Self {
        Self {
            messages,
            chatbot_id: None,
            system_prompt: config.effective_system_prompt().to_string(),
            ai_provider: config.effective_provider().to_string(),
        }
    }

    /// Attach the chatbot id sent by embedded widgets
    pub fn with_chatbot_id(mut self, chatbot_id: Option<String>) -> Self {
        self.chatbot_id = chatbot_id;
        self
    }
}
