//! Line framing for SSE byte streams.
//!
//! Bytes arrive in arbitrary chunks: a chunk may end in the middle of a line
//! or in the middle of a multi-byte UTF-8 sequence. [`Utf8Decoder`] keeps the
//! incomplete tail of a sequence until the next chunk completes it, and
//! [`LineFramer`] keeps the incomplete tail of a line until its `\n` arrives.

use bytes::{Buf, BytesMut};

const REPLACEMENT: char = '\u{FFFD}';

/// Resumable UTF-8 decoder.
///
/// Invalid sequences are replaced with U+FFFD (one per maximal invalid
/// subpart) instead of failing the stream.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: BytesMut,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk` and append the text to `out`.
    ///
    /// Returns the number of invalid bytes that were replaced. A trailing
    /// incomplete sequence is held back rather than replaced.
    pub fn decode_into(&mut self, chunk: &[u8], out: &mut String) -> usize {
        self.pending.extend_from_slice(chunk);

        let mut replaced = 0;
        let mut input: &[u8] = &self.pending;
        loop {
            match std::str::from_utf8(input) {
                Ok(text) => {
                    out.push_str(text);
                    input = &[];
                    break;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&input[..valid]));
                    match err.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT);
                            replaced += len;
                            input = &input[valid + len..];
                        }
                        None => {
                            input = &input[valid..];
                            break;
                        }
                    }
                }
            }
        }

        let consumed = self.pending.len() - input.len();
        self.pending.advance(consumed);
        replaced
    }

    /// Flush a dangling incomplete sequence at end of input.
    ///
    /// Returns the number of bytes replaced (0 when nothing was pending).
    pub fn finish_into(&mut self, out: &mut String) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        let replaced = self.pending.len();
        self.pending.clear();
        out.push(REPLACEMENT);
        replaced
    }

    /// Bytes held back waiting for the rest of a sequence.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Splits decoded text into complete lines.
///
/// Lines are terminated by `\n`; a single `\r` directly before it is
/// stripped. Text after the last `\n` stays buffered until more input
/// arrives.
#[derive(Debug, Default)]
pub struct LineFramer {
    decoder: Utf8Decoder,
    buffer: String,
    /// Start of the unconsumed part of `buffer`
    start: usize,
    /// `buffer[start..scanned]` is known to hold no `\n`
    scanned: usize,
    /// Invalid bytes replaced so far
    replaced_bytes: usize,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a raw chunk.
    ///
    /// Returns the number of invalid UTF-8 bytes replaced while decoding it.
    pub fn push(&mut self, chunk: &[u8]) -> usize {
        if self.start > 0 {
            self.buffer.drain(..self.start);
            self.scanned -= self.start;
            self.start = 0;
        }
        let replaced = self.decoder.decode_into(chunk, &mut self.buffer);
        self.replaced_bytes += replaced;
        replaced
    }

    /// Take the next complete line, if one is buffered.
    ///
    /// Only text pushed since the last search is scanned for a terminator.
    pub fn next_line(&mut self) -> Option<String> {
        let from = self.scanned.max(self.start);
        let Some(offset) = self.buffer[from..].find('\n') else {
            self.scanned = self.buffer.len();
            return None;
        };
        let newline = from + offset;
        let line = &self.buffer[self.start..newline];
        let line = line.strip_suffix('\r').unwrap_or(line).to_string();
        self.start = newline + 1;
        self.scanned = self.start;
        Some(line)
    }

    /// Feed a chunk and take every line it completes.
    pub fn push_lines(&mut self, chunk: &[u8]) -> Vec<String> {
        self.push(chunk);
        std::iter::from_fn(|| self.next_line()).collect()
    }

    /// End of input: return the unterminated remainder, if any.
    ///
    /// The remainder is not a line. Callers discard it; it is returned so
    /// they can report what was dropped.
    pub fn finish(&mut self) -> Option<String> {
        let replaced = self.decoder.finish_into(&mut self.buffer);
        self.replaced_bytes += replaced;

        let rest = self.buffer.split_off(self.start);
        self.buffer.clear();
        self.start = 0;
        self.scanned = 0;
        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }

    /// Length in bytes of the buffered partial line.
    pub fn partial_len(&self) -> usize {
        self.buffer.len() - self.start + self.decoder.pending_len()
    }

    /// Total invalid UTF-8 bytes replaced since creation.
    pub fn replaced_bytes(&self) -> usize {
        self.replaced_bytes
    }
}
