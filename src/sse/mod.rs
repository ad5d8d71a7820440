//! SSE (Server-Sent Events) stream decoding
//!
//! Turns the raw bytes of a chat completion stream into text fragments:
//! - `data: <json>` - event payload line
//! - `data: [DONE]` - end of stream
//! - Lines starting with `:` and blank lines - comments / keep-alives (ignored)
//! - Anything else - ignored
//!
//! # Module structure
//! - `framer` - Resumable UTF-8 decoding and line splitting (LineFramer)
//! - `events` - Line and event type definitions (SseLine, DecodedEvent)
//! - `decoder` - Per-line classification and payload parsing
//! - `delta` - Fragment extraction and accumulation

mod decoder;
mod delta;
mod events;
mod framer;

#[cfg(test)]
mod proptests;

pub use decoder::{classify_line, decode_line, DATA_PREFIX, DONE_SENTINEL};
pub use delta::{extract_delta, DeltaAccumulator};
pub use events::{DecodedEvent, Ignored, SseLine};
pub use framer::{LineFramer, Utf8Decoder};
