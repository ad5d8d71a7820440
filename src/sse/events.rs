//! SSE line and event types

use serde_json::Value;

use crate::error::StreamError;

/// Raw classification of a single framed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// Empty or whitespace-only line
    Blank,
    /// `:`-prefixed comment / keep-alive, without the colon
    Comment(&'a str),
    /// `data: ` line, payload after the prefix (untrimmed)
    Data(&'a str),
    /// Any other line (`event:`, `id:`, `data:` without the space, garbage)
    Other(&'a str),
}

/// Why a line produced no event
#[derive(Debug, Clone, PartialEq)]
pub enum Ignored {
    Blank,
    Comment,
    /// Line is not a `data: ` line
    Unrecognized,
    /// `data: ` line whose payload failed to parse
    Malformed(StreamError),
}

/// Decoded meaning of a single line
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedEvent {
    /// Parsed JSON payload of a `data: ` line
    Data(Value),
    /// `data: [DONE]`
    Terminator,
    /// Nothing to act on
    Ignorable(Ignored),
}

impl DecodedEvent {
    pub fn is_terminator(&self) -> bool {
        matches!(self, DecodedEvent::Terminator)
    }

    /// The JSON payload, if this is a data event
    pub fn payload(&self) -> Option<&Value> {
        match self {
            DecodedEvent::Data(value) => Some(value),
            _ => None,
        }
    }
}
