//! Common test utilities for integration tests.
//!
//! Fixtures for building SSE streams and wiring widgets to mock transports.
//!
//! # Example
//!
//! ```ignore
//! use common::{sse_line, DONE_LINE, test_widget};
//!
//! let (mock, mut widget) = test_widget();
//! mock.push_stream(TEST_ENDPOINT, MockStream::ok([sse_line("Hi"), DONE_LINE.to_string()]));
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use bytes::Bytes;
use serde_json::json;

/// Endpoint the mock chat client posts to.
pub const TEST_ENDPOINT: &str = "http://chat.test/functions/v1/chat-with-bot";

/// Terminator line, newline included.
pub const DONE_LINE: &str = "data: [DONE]\n";

/// One `data:` line carrying `content` as a delta, newline included.
pub fn sse_line(content: &str) -> String {
    format!(
        "data: {}\n",
        json!({"id": "gen-1", "object": "chat.completion.chunk",
               "choices": [{"index": 0, "delta": {"content": content}, "finish_reason": null}]})
    )
}

/// A complete well-formed stream for `fragments`, ending with the terminator.
pub fn sse_stream(fragments: &[&str]) -> String {
    let mut stream: String = fragments.iter().map(|f| sse_line(f)).collect();
    stream.push_str(DONE_LINE);
    stream
}

/// Split `bytes` at the given offsets (sorted, deduplicated, clamped).
pub fn split_at(bytes: &[u8], offsets: &[usize]) -> Vec<Bytes> {
    let mut cuts: Vec<usize> = offsets
        .iter()
        .map(|&o| o.min(bytes.len()))
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for cut in cuts {
        if cut > start {
            chunks.push(Bytes::copy_from_slice(&bytes[start..cut]));
            start = cut;
        }
    }
    if start < bytes.len() {
        chunks.push(Bytes::copy_from_slice(&bytes[start..]));
    }
    chunks
}

/// Split `bytes` into chunks of `size` bytes.
pub fn chunks_of(bytes: &[u8], size: usize) -> Vec<Bytes> {
    bytes
        .chunks(size.max(1))
        .map(Bytes::copy_from_slice)
        .collect()
}
