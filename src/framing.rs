//! Newline-delimited JSON framing.
//!
//! Each input line is one complete JSON document. There is no length
//! prefix and no multi-line message. Output goes the same way: one
//! document per line, flushed as soon as it is written so the client sees
//! every message the moment it is produced.

use crate::error::{ResponderError, ResponderResult};
use crate::protocol::IncomingMessage;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// One decoded input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Empty or whitespace-only line.
    Blank,
    /// Not UTF-8, not JSON, or not a JSON-RPC envelope. Carries the reason
    /// for diagnostics only; nothing is ever written back for it.
    Malformed(String),
    /// A classified JSON-RPC message.
    Message(IncomingMessage),
}

/// Decodes a single line (without or with its trailing newline).
#[must_use]
pub fn decode_line(line: &[u8]) -> Frame {
    let text = match std::str::from_utf8(line) {
        Ok(text) => text.trim(),
        Err(e) => return Frame::Malformed(format!("invalid UTF-8: {e}")),
    };

    if text.is_empty() {
        return Frame::Blank;
    }

    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => return Frame::Malformed(format!("invalid JSON: {e}")),
    };

    match IncomingMessage::from_value(value) {
        Some(message) => Frame::Message(message),
        None => Frame::Malformed("not a JSON-RPC message".to_string()),
    }
}

/// Reads newline-terminated lines from the client.
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(1024),
        }
    }

    /// Reads and decodes the next line. Returns `None` at end of input.
    ///
    /// A final line without a trailing newline is still delivered.
    pub async fn next_frame(&mut self) -> ResponderResult<Option<Frame>> {
        self.buf.clear();
        let n = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .await
            .map_err(|e| ResponderError::io("read", e))?;

        if n == 0 {
            return Ok(None);
        }

        Ok(Some(decode_line(&self.buf)))
    }
}

/// Writes one JSON document per line and flushes after each.
pub struct LineWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Serializes `message`, writes it followed by `\n`, and flushes.
    ///
    /// `kind` only labels a serialization failure.
    pub async fn send<T: Serialize>(
        &mut self,
        kind: &'static str,
        message: &T,
    ) -> ResponderResult<()> {
        let mut line =
            serde_json::to_vec(message).map_err(|e| ResponderError::serialize(kind, e))?;
        line.push(b'\n');

        self.writer
            .write_all(&line)
            .await
            .map_err(|e| ResponderError::io("write", e))?;
        self.writer
            .flush()
            .await
            .map_err(|e| ResponderError::io("flush", e))
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
