//! botchat - streaming chat client core for embeddable chatbot widgets
//!
//! Decodes Server-Sent-Events chat completion streams incrementally and
//! drives a conversation log from them. This library exposes modules for
//! use in integration tests.

pub mod adapters;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod frontend;
pub mod logging;
pub mod models;
pub mod sse;
pub mod state;
pub mod traits;
pub mod transport;
