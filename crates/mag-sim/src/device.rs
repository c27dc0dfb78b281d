//! Virtual data logger device
//!
//! Behaves like the serial handle of a logger in table mode: silent until
//! the host writes the trigger string, then emits each table row as a line,
//! then the sentinel line. Reads with nothing queued time out the way a real
//! serial port does.

use std::collections::VecDeque;
use std::io::{self, Read, Write};

use mag_protocol::{DEFAULT_SENTINEL, DEFAULT_TRIGGER};
use tracing::trace;

/// What the device does after its table has been read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEnd {
    /// Send a sentinel line with this marker
    Sentinel(String),
    /// Fail every further read as if the cable was pulled
    Disconnect,
    /// Keep timing out forever
    Silence,
}

impl Default for StreamEnd {
    fn default() -> Self {
        StreamEnd::Sentinel(DEFAULT_SENTINEL.to_string())
    }
}

/// A simulated logger that streams a scripted table after being triggered
#[derive(Debug, Clone)]
pub struct VirtualDevice {
    /// Rows to stream, without line endings
    table: Vec<String>,
    /// String the host must write to start streaming
    trigger: String,
    /// Line ending appended to every row
    line_ending: String,
    /// Maximum bytes returned per read
    chunk_size: usize,
    /// Behaviour after the table
    end: StreamEnd,
    /// Bytes written by the host
    received: Vec<u8>,
    /// Whether the trigger has been seen
    triggered: bool,
    /// Bytes queued for the host
    pending_output: VecDeque<u8>,
}

impl VirtualDevice {
    /// Create a device that streams `rows` after the default trigger
    pub fn new<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: rows.into_iter().map(Into::into).collect(),
            trigger: DEFAULT_TRIGGER.to_string(),
            line_ending: "\r\n".to_string(),
            chunk_size: 64,
            end: StreamEnd::default(),
            received: Vec::new(),
            triggered: false,
            pending_output: VecDeque::new(),
        }
    }

    /// Use a different trigger string
    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = trigger.into();
        self
    }

    /// Use a different line ending (e.g. `"\n"`)
    pub fn with_line_ending(mut self, line_ending: impl Into<String>) -> Self {
        self.line_ending = line_ending.into();
        self
    }

    /// Limit how many bytes each read returns, to exercise reframing
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Choose what happens after the table
    pub fn with_end(mut self, end: StreamEnd) -> Self {
        self.end = end;
        self
    }

    /// Start streaming immediately, without waiting for the trigger
    pub fn pre_triggered(mut self) -> Self {
        self.start_streaming();
        self
    }

    /// Bytes the host has written so far
    pub fn received(&self) -> &[u8] {
        &self.received
    }

    /// Whether the device has been triggered
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    fn start_streaming(&mut self) {
        self.triggered = true;
        for row in &self.table {
            self.pending_output.extend(row.as_bytes());
            self.pending_output.extend(self.line_ending.as_bytes());
        }
        if let StreamEnd::Sentinel(marker) = &self.end {
            self.pending_output.extend(marker.as_bytes());
            self.pending_output.extend(self.line_ending.as_bytes());
        }
        trace!("Virtual device queued {} bytes", self.pending_output.len());
    }

    fn contains_trigger(&self) -> bool {
        let trigger = self.trigger.as_bytes();
        !trigger.is_empty() && self.received.windows(trigger.len()).any(|w| w == trigger)
    }
}

impl Read for VirtualDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending_output.is_empty() {
            return match (&self.end, self.triggered) {
                (StreamEnd::Disconnect, true) => Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "virtual device disconnected",
                )),
                _ => Err(io::Error::new(io::ErrorKind::TimedOut, "no data")),
            };
        }

        let n = buf.len().min(self.chunk_size).min(self.pending_output.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending_output.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for VirtualDevice {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.received.extend_from_slice(buf);
        if !self.triggered && self.contains_trigger() {
            self.start_streaming();
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(device: &mut VirtualDevice) -> (String, io::ErrorKind) {
        let mut out = Vec::new();
        let mut buf = [0u8; 16];
        loop {
            match device.read(&mut buf) {
                Ok(n) => out.extend_from_slice(&buf[..n]),
                Err(e) => return (String::from_utf8(out).unwrap(), e.kind()),
            }
        }
    }

    #[test]
    fn test_silent_until_triggered() {
        let mut device = VirtualDevice::new(["1,2"]);
        let (out, kind) = read_all(&mut device);
        assert!(out.is_empty());
        assert_eq!(kind, io::ErrorKind::TimedOut);
        assert!(!device.is_triggered());
    }

    #[test]
    fn test_trigger_split_across_writes() {
        let mut device = VirtualDevice::new(["1,2"]);
        device.write_all(b"Send").unwrap();
        assert!(!device.is_triggered());
        device.write_all(b"Data").unwrap();
        assert!(device.is_triggered());
        assert_eq!(device.received(), b"SendData");
    }

    #[test]
    fn test_streams_table_then_sentinel() {
        let mut device = VirtualDevice::new(["1,2", "3,4"])
            .with_line_ending("\n")
            .with_chunk_size(3)
            .pre_triggered();
        let (out, kind) = read_all(&mut device);
        assert_eq!(out, "1,2\n3,4\nDataEND\n");
        assert_eq!(kind, io::ErrorKind::TimedOut);
    }

    #[test]
    fn test_disconnect_after_table() {
        let mut device = VirtualDevice::new(["1,2"])
            .with_end(StreamEnd::Disconnect)
            .pre_triggered();
        let (out, kind) = read_all(&mut device);
        assert_eq!(out, "1,2\r\n");
        assert_eq!(kind, io::ErrorKind::BrokenPipe);
    }
}
