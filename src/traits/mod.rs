//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, streaming POST)
//! - [`ChatbotConfigSource`] - Chatbot configuration lookup

pub mod config_source;
pub mod http;

pub use config_source::{ChatbotConfigSource, ConfigSourceError};
pub use http::{ByteStream, Headers, HttpClient, HttpError, Response, StreamResponse};
