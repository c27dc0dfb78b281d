//! Magnetar Capture Library
//!
//! This crate drives one table capture over an open device handle:
//!
//! 1. [`send_trigger`] writes the literal start string (`SendData`)
//! 2. [`capture`] frames the reply into records, echoes each one to a
//!    [`RecordObserver`], and stops at the sentinel record (`DataEND`), which
//!    is not part of the result
//!
//! Any `Read` works as a handle: a `serialport` port, a simulated device, or
//! an in-memory buffer.
//!
//! # Example
//!
//! ```rust
//! use mag_capture::{capture, CaptureConfig, StopSignal};
//! use mag_protocol::Record;
//!
//! let mut stream: &[u8] = b"1,2\n3,4\nDataEND\n5,6\n";
//! let mut echoed = Vec::new();
//! let result = capture(
//!     &mut stream,
//!     &CaptureConfig::default(),
//!     &mut |r: &Record| echoed.push(r.to_string()),
//!     &StopSignal::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(result.records, vec![Record::new("1,2"), Record::new("3,4")]);
//! assert_eq!(echoed, vec!["1,2", "3,4", "DataEND"]);
//! ```

pub mod error;
pub mod reader;

pub use error::CaptureError;
pub use reader::{
    capture, send_trigger, Capture, CaptureConfig, LineReader, ReadHalt, RecordObserver,
    StopSignal,
};
