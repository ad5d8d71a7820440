//! Stream session: the read loop of one chat request.
//!
//! A session owns the transport reader, the line framer and the delta
//! accumulator of a single response, and drives the conversation through
//! `Streaming` back to `Idle`. It is consumed by [`StreamSession::run`], so
//! the transport is released on every exit path (end of stream, early
//! terminator, error, abort).

use futures::stream::AbortHandle;
use tracing::{debug, info, info_span, trace, warn, Instrument};
use uuid::Uuid;

use crate::error::{StreamError, TransportError};
use crate::sse::{decode_line, DecodedEvent, DeltaAccumulator, Ignored, LineFramer, DONE_SENTINEL};
use crate::state::Conversation;
use crate::transport::TransportReader;

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEnd {
    /// Terminator received or body exhausted
    Completed,
    /// Transport failed (status, missing body, dropped connection, abort)
    Failed(TransportError),
}

/// What happened during a session, for logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub end: SessionEnd,
    /// Full assistant text accumulated from fragments
    pub text: String,
    pub fragments: usize,
    pub chunks: usize,
    /// True when a `data: [DONE]` line ended the stream
    pub terminator_seen: bool,
    /// `data:` lines with unparsable payloads
    pub malformed_events: usize,
    /// Blank, comment and non-`data:` lines
    pub ignored_lines: usize,
    /// Invalid UTF-8 bytes replaced with U+FFFD
    pub replaced_bytes: usize,
    /// Bytes of unterminated text discarded at end of stream
    pub discarded_bytes: usize,
}

impl SessionSummary {
    /// Summary of a request that failed before any body was read.
    pub fn not_started(err: TransportError) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            end: SessionEnd::Failed(err),
            text: String::new(),
            fragments: 0,
            chunks: 0,
            terminator_seen: false,
            malformed_events: 0,
            ignored_lines: 0,
            replaced_bytes: 0,
            discarded_bytes: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.end == SessionEnd::Completed
    }
}

/// One outstanding chat request.
#[derive(Debug)]
pub struct StreamSession {
    id: Uuid,
    reader: TransportReader,
    framer: LineFramer,
    accumulator: DeltaAccumulator,
    done: bool,
    chunks: usize,
    malformed_events: usize,
    ignored_lines: usize,
    discarded_bytes: usize,
}

impl StreamSession {
    pub fn new(reader: TransportReader) -> Self {
        Self {
            id: Uuid::new_v4(),
            reader,
            framer: LineFramer::new(),
            accumulator: DeltaAccumulator::new(),
            done: false,
            chunks: 0,
            malformed_events: 0,
            ignored_lines: 0,
            discarded_bytes: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Abort the transport from another task.
    ///
    /// The read loop then fails with [`TransportError::Aborted`].
    pub fn abort_handle(&self) -> AbortHandle {
        self.reader.abort_handle()
    }

    /// Read the response to completion, updating `conversation` as
    /// fragments arrive.
    ///
    /// Always leaves the conversation `Idle`.
    pub async fn run(self, conversation: &mut Conversation) -> SessionSummary {
        let span = info_span!("stream_session", session_id = %self.id);
        self.drive(conversation).instrument(span).await
    }

    async fn drive(mut self, conversation: &mut Conversation) -> SessionSummary {
        info!("Stream session started");

        let end = loop {
            let read = match self.reader.read().await {
                Ok(read) => read,
                Err(err) => {
                    warn!(code = err.error_code(), error = %err, "Stream session failed");
                    conversation.fail();
                    break SessionEnd::Failed(err);
                }
            };

            if read.done {
                self.discard_partial_line();
                conversation.finish();
                break SessionEnd::Completed;
            }

            self.chunks += 1;
            if read.chunk.is_empty() {
                continue;
            }
            conversation.open_placeholder();

            self.consume(&read.chunk, conversation);
            if self.done {
                conversation.finish();
                break SessionEnd::Completed;
            }
        };

        info!(
            fragments = self.accumulator.fragment_count(),
            chunks = self.chunks,
            malformed = self.malformed_events,
            "Stream session finished"
        );
        self.into_summary(end)
    }

    /// Frame, decode and apply every complete line in `chunk`.
    fn consume(&mut self, chunk: &[u8], conversation: &mut Conversation) {
        let replaced = self.framer.push(chunk);
        if replaced > 0 {
            let err = StreamError::Decoding {
                invalid_bytes: replaced,
            };
            warn!(code = err.error_code(), "{}", err);
        }

        while let Some(line) = self.framer.next_line() {
            match decode_line(&line) {
                DecodedEvent::Terminator => {
                    debug!("Received terminator");
                    self.done = true;
                    return;
                }
                DecodedEvent::Data(payload) => {
                    if let Some(fragment) = self.accumulator.apply(&payload) {
                        trace!(len = fragment.len(), "Applied fragment");
                        conversation.update_open_message(self.accumulator.text());
                    }
                }
                DecodedEvent::Ignorable(Ignored::Malformed(err)) => {
                    self.malformed_events += 1;
                    debug!(code = err.error_code(), error = %err, "Dropped malformed event");
                }
                DecodedEvent::Ignorable(_) => {
                    self.ignored_lines += 1;
                }
            }
        }
    }

    fn discard_partial_line(&mut self) {
        let Some(rest) = self.framer.finish() else {
            return;
        };
        self.discarded_bytes = rest.len();

        if rest.strip_prefix("data:").map(str::trim) == Some(DONE_SENTINEL) {
            debug!("Stream ended on an unterminated terminator line");
        } else {
            let err = StreamError::TrailingPartialLine { len: rest.len() };
            warn!(code = err.error_code(), "{}", err);
        }
    }

    fn into_summary(self, end: SessionEnd) -> SessionSummary {
        SessionSummary {
            session_id: self.id,
            end,
            fragments: self.accumulator.fragment_count(),
            chunks: self.chunks,
            terminator_seen: self.done,
            malformed_events: self.malformed_events,
            ignored_lines: self.ignored_lines,
            replaced_bytes: self.framer.replaced_bytes(),
            discarded_bytes: self.discarded_bytes,
            text: self.accumulator.into_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ConversationState, APOLOGY};
    use crate::traits::{ByteStream, HttpError, StreamResponse};
    use bytes::Bytes;

    fn delta(content: &str) -> String {
        format!(
            "data: {}\n",
            serde_json::json!({"choices": [{"delta": {"content": content}}]})
        )
    }

    async fn session_over(items: Vec<Result<Bytes, HttpError>>) -> StreamSession {
        let body: ByteStream = Box::pin(futures::stream::iter(items));
        let reader = TransportReader::open(StreamResponse::new(200, body))
            .await
            .unwrap();
        StreamSession::new(reader)
    }

    fn submitted() -> Conversation {
        let mut conversation = Conversation::new();
        conversation.submit("Hi").unwrap();
        conversation
    }

    #[tokio::test]
    async fn test_hello_scenario() {
        let mut conversation = submitted();
        let session = session_over(vec![
            Ok(Bytes::from(delta("Hel"))),
            Ok(Bytes::from(delta("lo"))),
            Ok(Bytes::from("data: [DONE]\n")),
        ])
        .await;

        let summary = session.run(&mut conversation).await;

        assert!(summary.is_success());
        assert!(summary.terminator_seen);
        assert_eq!(summary.text, "Hello");
        assert_eq!(summary.fragments, 2);

        let log = conversation.snapshot();
        assert_eq!(log.state, ConversationState::Idle);
        assert_eq!(log.last_message().unwrap().content, "Hello");
        assert_eq!(log.messages.len(), 3);
    }

    #[tokio::test]
    async fn test_stops_reading_after_terminator() {
        let mut conversation = submitted();
        let session = session_over(vec![
            Ok(Bytes::from(format!("{}data: [DONE]\n{}", delta("A"), delta("B")))),
            Err(HttpError::Io("never read".to_string())),
        ])
        .await;

        let summary = session.run(&mut conversation).await;
        assert!(summary.is_success());
        assert_eq!(summary.text, "A");
        assert_eq!(summary.chunks, 1);
    }

    #[tokio::test]
    async fn test_terminator_without_newline() {
        let mut conversation = submitted();
        let session = session_over(vec![
            Ok(Bytes::from(delta("ok"))),
            Ok(Bytes::from("data: [DONE]")),
        ])
        .await;

        let summary = session.run(&mut conversation).await;
        assert!(summary.is_success());
        assert!(!summary.terminator_seen);
        assert_eq!(summary.discarded_bytes, "data: [DONE]".len());
        assert_eq!(conversation.snapshot().last_message().unwrap().content, "ok");
        assert!(conversation.input_enabled());
    }

    #[tokio::test]
    async fn test_skips_malformed_comments_and_blanks() {
        let mut conversation = submitted();
        let session = session_over(vec![Ok(Bytes::from(format!(
            ": OPENROUTER PROCESSING\n\ndata: {{not valid json\n{}event: ping\n{}",
            delta("x"),
            delta("y")
        )))])
        .await;

        let summary = session.run(&mut conversation).await;
        assert_eq!(summary.text, "xy");
        assert_eq!(summary.malformed_events, 1);
        assert_eq!(summary.ignored_lines, 3);
    }

    #[tokio::test]
    async fn test_mid_stream_drop_keeps_partial_and_apologizes() {
        let mut conversation = submitted();
        let session = session_over(vec![
            Ok(Bytes::from(delta("Partial"))),
            Err(HttpError::Io("connection reset".to_string())),
        ])
        .await;

        let summary = session.run(&mut conversation).await;
        assert_eq!(
            summary.end,
            SessionEnd::Failed(TransportError::Network(HttpError::Io(
                "connection reset".to_string()
            )))
        );

        let log = conversation.snapshot();
        assert!(log.input_enabled());
        assert_eq!(log.messages[2].content, "Partial");
        assert_eq!(log.messages[3].content, APOLOGY);
    }

    #[tokio::test]
    async fn test_drop_before_any_text_replaces_placeholder() {
        let mut conversation = submitted();
        let session = session_over(vec![
            Ok(Bytes::from(": keepalive\n")),
            Err(HttpError::Io("connection reset".to_string())),
        ])
        .await;

        session.run(&mut conversation).await;

        let log = conversation.snapshot();
        assert_eq!(log.messages.len(), 3);
        assert_eq!(log.messages[2].content, APOLOGY);
    }

    #[tokio::test]
    async fn test_empty_body_leaves_no_placeholder() {
        let mut conversation = submitted();
        let session = session_over(vec![]).await;

        let summary = session.run(&mut conversation).await;
        assert!(summary.is_success());
        assert_eq!(conversation.snapshot().messages.len(), 2);
        assert!(conversation.input_enabled());
    }

    #[tokio::test]
    async fn test_abort_fails_session() {
        let mut conversation = submitted();
        let body: ByteStream = Box::pin(futures::stream::pending::<Result<Bytes, HttpError>>());
        let reader = TransportReader::open(StreamResponse::new(200, body))
            .await
            .unwrap();
        let session = StreamSession::new(reader);

        session.abort_handle().abort();
        let summary = session.run(&mut conversation).await;

        assert_eq!(summary.end, SessionEnd::Failed(TransportError::Aborted));
        assert!(conversation.input_enabled());
        assert_eq!(conversation.snapshot().last_message().unwrap().content, APOLOGY);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let mut conversation = submitted();
        let mut bytes = b"data: {\"choices\":[{\"delta\":{\"content\":\"a".to_vec();
        bytes.push(0xFF);
        bytes.extend_from_slice(b"b\"}}]}\n");
        let session = session_over(vec![Ok(Bytes::from(bytes))]).await;

        let summary = session.run(&mut conversation).await;
        assert_eq!(summary.text, "a\u{FFFD}b");
        assert_eq!(summary.replaced_bytes, 1);
    }
}
