//! Magnetar Line Protocol Library
//!
//! This crate provides the pure (I/O free) half of the acquisition pipeline:
//!
//! - **Framing**: a streaming codec that turns raw serial bytes into
//!   newline-delimited [`Record`]s with a bounded length
//! - **Sentinel matching**: recognising the end-of-table marker record
//! - **Row decoding**: splitting a record on a fixed delimiter and coercing
//!   each field into an integer or text [`Cell`]
//!
//! # Example
//!
//! ```rust
//! use mag_protocol::{Cell, FrameCodec, LineCodec, RowDecoder};
//!
//! let mut codec = LineCodec::new(100);
//! codec.push_bytes(b"1,abc,3\n");
//!
//! let record = codec.next_record().unwrap();
//! let row = RowDecoder::default().decode(&record);
//! assert_eq!(
//!     row.cells(),
//!     &[Cell::Integer(1), Cell::Text("abc".into()), Cell::Integer(3)]
//! );
//! ```

pub mod error;
pub mod line;
pub mod row;

pub use error::ProtocolError;
pub use line::{
    LineCodec, Record, Sentinel, DEFAULT_MAX_RECORD_LEN, DEFAULT_SENTINEL, MAX_RECORD_LEN_LIMIT,
};
pub use row::{decode_field, Cell, Row, RowDecoder, DEFAULT_DELIMITER};

/// Literal string the host sends to ask the device to start streaming its table
pub const DEFAULT_TRIGGER: &str = "SendData";

/// Trait for streaming codecs that frame an incoming byte stream
pub trait FrameCodec {
    /// The frame type produced by this codec
    type Frame;

    /// Push raw bytes into the codec's buffer
    fn push_bytes(&mut self, data: &[u8]);

    /// Try to extract the next complete frame from the buffer
    fn next_frame(&mut self) -> Option<Self::Frame>;

    /// Extract whatever is buffered as a final frame, even without a terminator
    ///
    /// Used when the stream ends and partial data should not be lost.
    fn flush(&mut self) -> Option<Self::Frame>;

    /// Clear the internal buffer
    fn clear(&mut self);
}
