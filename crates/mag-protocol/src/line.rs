//! Newline-framed record codec
//!
//! The device streams its table as ASCII text, one row per line:
//!
//! ```text
//! 12,340,17,OK\r\n
//! 13,338,17,OK\r\n
//! DataEND\r\n
//! ```
//!
//! # Framing rules
//! - Terminator: `\n` (0x0A); a trailing `\r` is dropped
//! - The terminator is not part of the record
//! - A line longer than the maximum record length is cut at that length and
//!   the partial record is emitted; the rest of the line becomes the next record
//! - Bytes are decoded as UTF-8, replacing invalid sequences

use std::fmt;

use tracing::trace;

use crate::error::ProtocolError;
use crate::FrameCodec;

/// Default maximum record length in bytes
pub const DEFAULT_MAX_RECORD_LEN: usize = 100;

/// Largest record length a session may configure
pub const MAX_RECORD_LEN_LIMIT: usize = 64 * 1024;

/// Default end-of-table marker
pub const DEFAULT_SENTINEL: &str = "DataEND";

const TERMINATOR: u8 = b'\n';

/// A single framed line of device output, without its terminator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    text: String,
}

impl Record {
    /// Create a record from already-framed text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The record's text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length of the record in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the record is an empty line
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Consume the record, returning its text
    pub fn into_string(self) -> String {
        self.text
    }
}

impl AsRef<str> for Record {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Record {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Record {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// End-of-table marker
///
/// A record is the sentinel when it contains the marker anywhere in its text,
/// so `"DataEND"`, `"DataEND "` and `"--DataEND--"` all end the capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinel {
    marker: String,
}

impl Sentinel {
    /// Create a sentinel for the given marker
    pub fn new(marker: impl Into<String>) -> Result<Self, ProtocolError> {
        let marker = marker.into();
        if marker.is_empty() {
            return Err(ProtocolError::EmptySentinel);
        }
        Ok(Self { marker })
    }

    /// The marker text
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Check whether a record signals end of data
    pub fn matches(&self, record: &Record) -> bool {
        record.as_str().contains(&self.marker)
    }
}

impl Default for Sentinel {
    fn default() -> Self {
        Self {
            marker: DEFAULT_SENTINEL.to_string(),
        }
    }
}

/// Streaming newline codec with a bounded record length
#[derive(Debug)]
pub struct LineCodec {
    buffer: Vec<u8>,
    max_record_len: usize,
}

impl LineCodec {
    /// Create a codec that emits records of at most `max_record_len` bytes
    ///
    /// A limit of zero is raised to one byte.
    pub fn new(max_record_len: usize) -> Self {
        let max_record_len = max_record_len.max(1);
        Self {
            buffer: Vec::new(),
            max_record_len,
        }
    }

    /// Maximum record length in bytes
    pub fn max_record_len(&self) -> usize {
        self.max_record_len
    }

    /// Number of bytes buffered but not yet framed
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Extract the next complete record, see [`FrameCodec::next_frame`]
    pub fn next_record(&mut self) -> Option<Record> {
        self.next_frame()
    }

    fn take(&mut self, len: usize, consumed: usize) -> Record {
        let mut bytes: Vec<u8> = self.buffer.drain(..consumed).collect();
        bytes.truncate(len);
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        Record::new(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECORD_LEN)
    }
}

impl FrameCodec for LineCodec {
    type Frame = Record;

    fn push_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    fn next_frame(&mut self) -> Option<Record> {
        let max = self.max_record_len;
        let len = self.buffer.len();
        let window = len.min(max.saturating_add(2));

        if let Some(pos) = self.buffer[..window].iter().position(|&b| b == TERMINATOR) {
            let content = if pos > 0 && self.buffer[pos - 1] == b'\r' {
                pos - 1
            } else {
                pos
            };
            if content <= max {
                return Some(self.take(pos, pos + 1));
            }
        }

        // A full-length line may still be waiting for its "\r\n"
        let awaiting_crlf = len > max && len - max == 1 && self.buffer[max] == b'\r';
        if len > max && !awaiting_crlf {
            trace!("Record exceeded {} bytes without terminator, emitting partial", max);
            return Some(self.take(max, max));
        }

        None
    }

    fn flush(&mut self) -> Option<Record> {
        if let Some(record) = self.next_frame() {
            return Some(record);
        }
        if self.buffer.is_empty() {
            return None;
        }
        let len = self.buffer.len();
        Some(self.take(len, len))
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }
}
