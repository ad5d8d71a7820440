//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with scripted streaming responses
//! - [`InMemoryChatbotStore`] - In-memory chatbot configuration store

pub mod config;
pub mod http;

pub use config::InMemoryChatbotStore;
pub use http::{MockHttpClient, MockResponse, MockStream, RecordedRequest};
