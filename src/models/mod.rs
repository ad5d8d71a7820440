mod chatbot;
mod message;
mod request;

pub use chatbot::{
    ChatbotConfig, ThemeConfig, DEFAULT_AI_PROVIDER, DEFAULT_CHATBOT_NAME, DEFAULT_SYSTEM_PROMPT,
};
pub use message::{Message, MessageRole};
pub use request::ChatRequest;
