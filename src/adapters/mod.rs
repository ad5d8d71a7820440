//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FileChatbotStore`] - Chatbot records as JSON files
//! - [`RestChatbotStore`] - Chatbot records from a hosted PostgREST table
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Scripted streaming responses
//! - [`mock::InMemoryChatbotStore`] - In-memory chatbot records

pub mod file_store;
pub mod mock;
pub mod reqwest_http;
pub mod rest_store;

pub use file_store::FileChatbotStore;
pub use mock::{InMemoryChatbotStore, MockHttpClient};
pub use reqwest_http::ReqwestHttpClient;
pub use rest_store::RestChatbotStore;
