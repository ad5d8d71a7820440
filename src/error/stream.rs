//! Recoverable stream anomalies.
//!
//! These never end a session. They are built so they can be logged with a
//! consistent shape and counted by the session, then dropped.

use thiserror::Error;

/// Stream-level anomaly that was recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A `data:` line whose payload is not valid JSON.
    #[error("malformed event payload ({message}): {payload}")]
    MalformedEvent { payload: String, message: String },

    /// Bytes that are not valid UTF-8 were replaced with U+FFFD.
    #[error("replaced {invalid_bytes} invalid UTF-8 byte(s)")]
    Decoding { invalid_bytes: usize },

    /// Text left without a line terminator when the stream ended.
    #[error("discarded {len} byte(s) of unterminated trailing line")]
    TrailingPartialLine { len: usize },
}

impl StreamError {
    /// Short stable code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::MalformedEvent { .. } => "STREAM_MALFORMED_EVENT",
            StreamError::Decoding { .. } => "STREAM_DECODING",
            StreamError::TrailingPartialLine { .. } => "STREAM_TRAILING_PARTIAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let err = StreamError::MalformedEvent {
            payload: "{not valid json".to_string(),
            message: "key must be a string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed event payload (key must be a string): {not valid json"
        );
        assert_eq!(
            StreamError::Decoding { invalid_bytes: 2 }.to_string(),
            "replaced 2 invalid UTF-8 byte(s)"
        );
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let codes = [
            StreamError::MalformedEvent {
                payload: String::new(),
                message: String::new(),
            }
            .error_code(),
            StreamError::Decoding { invalid_bytes: 1 }.error_code(),
            StreamError::TrailingPartialLine { len: 1 }.error_code(),
        ];
        assert_ne!(codes[0], codes[1]);
        assert_ne!(codes[1], codes[2]);
    }
}
