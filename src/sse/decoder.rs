//! Event decoding for chat completion streams
//!
//! Each framed line is classified on its own; there is no multi-line event
//! accumulation. Only lines of the exact form `data: <payload>` carry
//! events.

use crate::error::StreamError;
use crate::sse::events::{DecodedEvent, Ignored, SseLine};

/// Prefix of event-carrying lines, including the single space
pub const DATA_PREFIX: &str = "data: ";

/// Payload that signals normal end of stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// Classify a single line without looking at its payload
pub fn classify_line(line: &str) -> SseLine<'_> {
    if line.trim().is_empty() {
        return SseLine::Blank;
    }

    if let Some(comment) = line.strip_prefix(':') {
        return SseLine::Comment(comment);
    }

    if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
        return SseLine::Data(payload);
    }

    SseLine::Other(line)
}

/// Decode a single line into an event.
///
/// Never fails: payloads that are not valid JSON come back as
/// `Ignorable(Ignored::Malformed(..))` so the caller can log and move on.
pub fn decode_line(line: &str) -> DecodedEvent {
    match classify_line(line) {
        SseLine::Blank => DecodedEvent::Ignorable(Ignored::Blank),
        SseLine::Comment(_) => DecodedEvent::Ignorable(Ignored::Comment),
        SseLine::Other(_) => DecodedEvent::Ignorable(Ignored::Unrecognized),
        SseLine::Data(payload) => decode_payload(payload.trim()),
    }
}

fn decode_payload(payload: &str) -> DecodedEvent {
    if payload == DONE_SENTINEL {
        return DecodedEvent::Terminator;
    }

    match serde_json::from_str(payload) {
        Ok(value) => DecodedEvent::Data(value),
        Err(e) => DecodedEvent::Ignorable(Ignored::Malformed(StreamError::MalformedEvent {
            payload: payload.to_string(),
            message: e.to_string(),
        })),
    }
}
