//! Incremental decoding of the pitch response body.
//!
//! The body arrives as arbitrary byte chunks. A chunk boundary may fall in
//! the middle of a multi-byte character or in the middle of a line, so both
//! are buffered until they are complete.

use std::char::REPLACEMENT_CHARACTER;

use super::StreamFragment;

/// Prefix that marks a payload-bearing line.
pub const DATA_PREFIX: &str = "data:";

/// Optional explicit end-of-stream payload.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Stream-safe UTF-8 decoder.
///
/// Bytes of an incomplete trailing sequence are held back until the next
/// call. Invalid sequences are replaced with U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `bytes` (plus any held-back bytes) as possible.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    return out;
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid_up_to]));
                    match err.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid_up_to + len);
                        }
                        None => {
                            // Incomplete sequence at the end; wait for more bytes
                            self.pending.drain(..valid_up_to);
                            return out;
                        }
                    }
                }
            }
        }
    }

    /// Flush held-back bytes once the stream has ended.
    pub fn finish(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        rest
    }

    /// Number of bytes waiting for the rest of their character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Splits decoded text into complete lines.
#[derive(Debug, Default)]
pub struct LineSplitter {
    buffer: String,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text and return every line it completed, without terminators.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.buffer.push_str(text);

        let mut lines = Vec::new();
        while let Some(newline_pos) = self.buffer.find('\n') {
            let line = self.buffer[..newline_pos].trim_end_matches('\r').to_string();
            self.buffer.drain(..=newline_pos);
            lines.push(line);
        }
        lines
    }

    /// Return the unterminated last line, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }
}

/// What a single line of the body means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Not a `data:` line (comments, blank lines, other SSE fields).
    Ignored,
    /// A well-formed fragment.
    Fragment(String),
    /// The server signalled the end of the stream.
    Done,
    /// A `data:` line whose payload is not a valid fragment.
    Malformed { payload: String, reason: String },
}

/// Interpret one line of the body.
pub fn parse_line(line: &str) -> LineOutcome {
    let Some(payload) = line.trim().strip_prefix(DATA_PREFIX) else {
        return LineOutcome::Ignored;
    };
    let payload = payload.trim_start();

    if payload == DONE_SENTINEL {
        return LineOutcome::Done;
    }

    match serde_json::from_str::<StreamFragment>(payload) {
        Ok(fragment) => LineOutcome::Fragment(fragment.content),
        Err(e) => LineOutcome::Malformed {
            payload: payload.to_string(),
            reason: e.to_string(),
        },
    }
}

/// Bytes in, line outcomes out.
#[derive(Debug, Default)]
pub struct FragmentDecoder {
    utf8: Utf8StreamDecoder,
    lines: LineSplitter,
}

impl FragmentDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of the body.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<LineOutcome> {
        let text = self.utf8.decode(bytes);
        self.lines.push(&text).iter().map(|l| parse_line(l)).collect()
    }

    /// Flush everything left once the transport has closed.
    pub fn finish(&mut self) -> Vec<LineOutcome> {
        let tail = self.utf8.finish();
        let mut outcomes: Vec<LineOutcome> =
            self.lines.push(&tail).iter().map(|l| parse_line(l)).collect();
        if let Some(last) = self.lines.finish() {
            outcomes.push(parse_line(&last));
        }
        outcomes
    }
}
