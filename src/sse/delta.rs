//! Delta extraction and accumulation for OpenAI-style completion chunks.
//!
//! Chunks look like `{ "choices": [ { "delta": { "content": "..." } } ] }`.
//! Only `choices[0].delta.content` is consumed; every other field is
//! ignored.

use serde_json::Value;

const DELTA_CONTENT_POINTER: &str = "/choices/0/delta/content";

/// Extract the text fragment carried by a chunk.
///
/// Returns `None` for any shape mismatch (missing `choices`, empty array,
/// `delta` not an object, non-string or empty `content`).
pub fn extract_delta(payload: &Value) -> Option<&str> {
    payload
        .pointer(DELTA_CONTENT_POINTER)
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty())
}

/// Running text of one assistant response.
///
/// Text only grows: fragments are appended, never replaced.
#[derive(Debug, Default, Clone)]
pub struct DeltaAccumulator {
    text: String,
    fragments: usize,
}

impl DeltaAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the fragment carried by `payload`, if any.
    ///
    /// Returns the fragment that was applied.
    pub fn apply<'a>(&mut self, payload: &'a Value) -> Option<&'a str> {
        let fragment = extract_delta(payload)?;
        self.push(fragment);
        Some(fragment)
    }

    /// Append a fragment directly.
    pub fn push(&mut self, fragment: &str) {
        self.text.push_str(fragment);
        self.fragments += 1;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of fragments applied so far.
    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
