//! Transport reader for streaming chat responses.
//!
//! Wraps a response body and hands out raw chunks one read at a time. The
//! response status is judged exactly once, in [`TransportReader::open`];
//! after that only connection failures and aborts can end a read with an
//! error.

use bytes::Bytes;
use futures::stream::{AbortHandle, Abortable};
use futures_util::StreamExt;
use std::time::Duration;
use tokio::time::Instant;

use crate::error::TransportError;
use crate::traits::{ByteStream, StreamResponse};

/// Longest error body kept in a `TransportError::Status` message.
const MAX_ERROR_BODY: usize = 512;

/// How long an error body may take to arrive before the status is reported
/// with whatever text came in.
const ERROR_BODY_WAIT: Duration = Duration::from_millis(200);

/// Outcome of a single read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResult {
    /// Bytes delivered by this read; empty on the final read
    pub chunk: Bytes,
    /// True once the body is exhausted
    pub done: bool,
}

impl ReadResult {
    fn chunk(chunk: Bytes) -> Self {
        Self { chunk, done: false }
    }

    fn done() -> Self {
        Self {
            chunk: Bytes::new(),
            done: true,
        }
    }
}

/// Sequential reader over one response body.
///
/// Dropping the reader drops the body stream, which releases the underlying
/// connection on every exit path.
pub struct TransportReader {
    body: Abortable<ByteStream>,
    abort_handle: AbortHandle,
    finished: bool,
}

impl TransportReader {
    /// Validate a response and prepare it for reading.
    ///
    /// Non-2xx responses fail with [`TransportError::Status`] (the error body
    /// that arrives within a short wait, if any, becomes the message).
    /// Successful responses without a body fail with
    /// [`TransportError::MissingBody`].
    pub async fn open(response: StreamResponse) -> Result<Self, TransportError> {
        if !response.is_success() {
            let status = response.status;
            let message = match response.body {
                Some(body) => collect_error_body(body).await,
                None => String::new(),
            };
            return Err(TransportError::Status { status, message });
        }

        let body = response.body.ok_or(TransportError::MissingBody)?;
        let (abort_handle, registration) = AbortHandle::new_pair();

        Ok(Self {
            body: Abortable::new(body, registration),
            abort_handle,
            finished: false,
        })
    }

    /// Handle that aborts pending and future reads from another task.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort_handle.clone()
    }

    /// Pull the next chunk.
    ///
    /// Suspends until bytes arrive. Once the body is exhausted every further
    /// call returns a `done` result with an empty chunk.
    pub async fn read(&mut self) -> Result<ReadResult, TransportError> {
        if self.finished {
            return Ok(ReadResult::done());
        }

        match self.body.next().await {
            Some(Ok(chunk)) => Ok(ReadResult::chunk(chunk)),
            Some(Err(err)) => {
                self.finished = true;
                Err(TransportError::Network(err))
            }
            None => {
                self.finished = true;
                if self.body.is_aborted() {
                    Err(TransportError::Aborted)
                } else {
                    Ok(ReadResult::done())
                }
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl std::fmt::Debug for TransportReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportReader")
            .field("finished", &self.finished)
            .finish()
    }
}

async fn collect_error_body(mut body: ByteStream) -> String {
    let deadline = Instant::now() + ERROR_BODY_WAIT;
    let mut collected = Vec::new();
    while let Ok(Some(Ok(chunk))) = tokio::time::timeout_at(deadline, body.next()).await {
        collected.extend_from_slice(&chunk);
        if collected.len() >= MAX_ERROR_BODY {
            break;
        }
    }
    let text = String::from_utf8_lossy(&collected);
    text.chars().take(MAX_ERROR_BODY).collect::<String>().trim().to_string()
}
