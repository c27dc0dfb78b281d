//! Error types for table capture

use mag_protocol::Record;
use thiserror::Error;

/// Errors that end a capture before the sentinel
///
/// Every variant raised by the capture loop carries the records framed
/// before the fault, so the caller can decide whether to keep them.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Writing the trigger string failed
    #[error("failed to send trigger: {0}")]
    Trigger(#[source] std::io::Error),

    /// Reading from the device failed (e.g. device unplugged)
    #[error("read failed after {} record(s): {source}", .captured.len())]
    Stream {
        source: std::io::Error,
        captured: Vec<Record>,
    },

    /// The stream ended without a sentinel
    #[error("stream ended after {} record(s) without end-of-data marker", .captured.len())]
    EndOfStream { captured: Vec<Record> },

    /// The stop signal was raised
    #[error("capture cancelled after {} record(s)", .captured.len())]
    Cancelled { captured: Vec<Record> },

    /// More records arrived than the configured capacity allows
    #[error("capture exceeded capacity of {limit} record(s)")]
    CapacityExceeded { limit: usize, captured: Vec<Record> },
}

impl CaptureError {
    /// Records framed before the error
    pub fn captured(&self) -> &[Record] {
        match self {
            CaptureError::Trigger(_) => &[],
            CaptureError::Stream { captured, .. }
            | CaptureError::EndOfStream { captured }
            | CaptureError::Cancelled { captured }
            | CaptureError::CapacityExceeded { captured, .. } => captured,
        }
    }

    /// Consume the error, returning the records framed before it
    pub fn into_captured(self) -> Vec<Record> {
        match self {
            CaptureError::Trigger(_) => Vec::new(),
            CaptureError::Stream { captured, .. }
            | CaptureError::EndOfStream { captured }
            | CaptureError::Cancelled { captured }
            | CaptureError::CapacityExceeded { captured, .. } => captured,
        }
    }
}
