//! Framed line reading and the capture loop

use std::io::{self, ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mag_protocol::{FrameCodec, LineCodec, Record, Sentinel, DEFAULT_MAX_RECORD_LEN};
use tracing::{debug, info, trace};

use crate::error::CaptureError;

/// Size of each block read from the handle
const READ_BLOCK_SIZE: usize = 256;

/// Capture parameters
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// End-of-table marker
    pub sentinel: Sentinel,
    /// Maximum record length in bytes; longer lines are split
    pub max_record_len: usize,
    /// Maximum number of records to keep; `None` is unbounded
    ///
    /// The device protocol guarantees a sentinel, so the default trusts it
    /// and lets the buffer grow.
    pub max_records: Option<usize>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sentinel: Sentinel::default(),
            max_record_len: DEFAULT_MAX_RECORD_LEN,
            max_records: None,
        }
    }
}

/// Receives every framed record as it arrives, sentinel included
pub trait RecordObserver {
    /// Called once per record, in arrival order
    fn on_record(&mut self, record: &Record);
}

impl<F: FnMut(&Record)> RecordObserver for F {
    fn on_record(&mut self, record: &Record) {
        self(record)
    }
}

/// Cooperative cancellation flag, checked between reads
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    /// Create a signal that is not raised
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether the signal has been raised
    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Outcome of a successful capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// Records before the sentinel, in arrival order
    pub records: Vec<Record>,
    /// The sentinel record that ended the capture
    pub sentinel: Record,
}

/// Why [`LineReader::read_record`] returned without a record
#[derive(Debug)]
pub enum ReadHalt {
    /// The stop signal was raised
    Stopped,
    /// The handle returned an error other than a timeout
    Io(io::Error),
}

/// Frames records from a blocking byte stream
///
/// Read timeouts (`TimedOut`, `WouldBlock`) and interrupts are not errors;
/// the reader keeps waiting, checking the stop signal between reads.
pub struct LineReader<R> {
    handle: R,
    codec: LineCodec,
    block: Vec<u8>,
}

impl<R: Read> LineReader<R> {
    /// Wrap a handle, emitting records of at most `max_record_len` bytes
    pub fn new(handle: R, max_record_len: usize) -> Self {
        Self {
            handle,
            codec: LineCodec::new(max_record_len),
            block: vec![0; READ_BLOCK_SIZE],
        }
    }

    /// Block until the next record is framed
    ///
    /// Returns `Ok(None)` when the stream ends with nothing left buffered. A
    /// partial line at end of stream is returned as a final record.
    pub fn read_record(&mut self, stop: &StopSignal) -> Result<Option<Record>, ReadHalt> {
        loop {
            if let Some(record) = self.codec.next_frame() {
                return Ok(Some(record));
            }
            if stop.is_stopped() {
                return Err(ReadHalt::Stopped);
            }

            match self.handle.read(&mut self.block) {
                Ok(0) => {
                    debug!("End of stream");
                    return Ok(self.codec.flush());
                }
                Ok(n) => {
                    trace!("Read {} bytes", n);
                    self.codec.push_bytes(&self.block[..n]);
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                    ) => {}
                Err(e) => return Err(ReadHalt::Io(e)),
            }
        }
    }

    /// Release the handle
    pub fn into_inner(self) -> R {
        self.handle
    }
}

/// Write the start string that puts the device into table mode
pub fn send_trigger<W: Write + ?Sized>(handle: &mut W, trigger: &str) -> Result<(), CaptureError> {
    debug!("Sending trigger {:?}", trigger);
    handle
        .write_all(trigger.as_bytes())
        .and_then(|_| handle.flush())
        .map_err(CaptureError::Trigger)
}

/// Capture records until the sentinel
///
/// Every framed record is passed to `observer`, including the sentinel. The
/// sentinel is not added to the result, and nothing after it is read.
pub fn capture<R: Read + ?Sized>(
    handle: &mut R,
    config: &CaptureConfig,
    observer: &mut dyn RecordObserver,
    stop: &StopSignal,
) -> Result<Capture, CaptureError> {
    let mut reader = LineReader::new(handle, config.max_record_len);
    let mut records = Vec::new();

    loop {
        let record = match reader.read_record(stop) {
            Ok(Some(record)) => record,
            Ok(None) => return Err(CaptureError::EndOfStream { captured: records }),
            Err(ReadHalt::Stopped) => return Err(CaptureError::Cancelled { captured: records }),
            Err(ReadHalt::Io(source)) => {
                return Err(CaptureError::Stream {
                    source,
                    captured: records,
                })
            }
        };

        observer.on_record(&record);

        if config.sentinel.matches(&record) {
            info!("End of data after {} record(s)", records.len());
            return Ok(Capture {
                records,
                sentinel: record,
            });
        }

        if let Some(limit) = config.max_records {
            if records.len() >= limit {
                return Err(CaptureError::CapacityExceeded {
                    limit,
                    captured: records,
                });
            }
        }

        debug!("Record {}: {}", records.len() + 1, record);
        records.push(record);
    }
}
