//! Error types for record framing and row decoding

use thiserror::Error;

/// Errors raised while configuring protocol components
///
/// Decoding itself never fails: a field that is not an integer is text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Field delimiter was empty
    #[error("field delimiter must not be empty")]
    EmptyDelimiter,

    /// Sentinel marker was empty (it would match every record)
    #[error("sentinel marker must not be empty")]
    EmptySentinel,

    /// Maximum record length was zero
    #[error("maximum record length must be at least 1 byte")]
    ZeroRecordLength,

    /// Maximum record length above the supported limit
    #[error("maximum record length {len} exceeds the {limit} byte limit")]
    RecordLengthTooLarge { len: usize, limit: usize },
}
