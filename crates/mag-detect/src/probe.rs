//! Port probing and session connection
//!
//! Probing is a pure liveness test: a candidate is "found" when it opens at
//! the probe baud rate. Nothing is written or read, and the handle is closed
//! before the address is returned so no session data is consumed.
//!
//! The device answers opens at the probe rate but streams its table at the
//! session rate, so the two rates are deliberately different.

use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info, trace};

use crate::address::{AddressTemplate, DeviceAddress};
use crate::error::DetectError;

/// Baud rate used only to test whether a device is present
pub const DEFAULT_PROBE_BAUD: u32 = 115_200;

/// Baud rate used for the capture session
pub const DEFAULT_SESSION_BAUD: u32 = 57_600;

/// Number of numbered ports scanned by default (COM1..COM98)
pub const DEFAULT_CANDIDATE_COUNT: u32 = 98;

/// Opens serial endpoints
///
/// Implemented by [`SerialOpener`] for real hardware and by simulated port
/// sets in tests.
pub trait PortOpener {
    /// Handle to an open port; dropping it closes the port
    type Port;

    /// Open `address` at `baud_rate`
    fn open(&self, address: &DeviceAddress, baud_rate: u32) -> Result<Self::Port, DetectError>;
}

impl<T: PortOpener + ?Sized> PortOpener for &T {
    type Port = T::Port;

    fn open(&self, address: &DeviceAddress, baud_rate: u32) -> Result<Self::Port, DetectError> {
        (**self).open(address, baud_rate)
    }
}

/// Opens real serial ports through the `serialport` crate
#[derive(Debug, Clone)]
pub struct SerialOpener {
    /// Read timeout applied to opened ports
    pub timeout: Duration,
}

impl SerialOpener {
    /// Create an opener with a custom read timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SerialOpener {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(100),
        }
    }
}

impl PortOpener for SerialOpener {
    type Port = Box<dyn SerialPort>;

    fn open(&self, address: &DeviceAddress, baud_rate: u32) -> Result<Self::Port, DetectError> {
        serialport::new(address.name(), baud_rate)
            .timeout(self.timeout)
            .open()
            .map_err(|e| DetectError::from_open(address.name(), baud_rate, e))
    }
}

/// Scans numbered ports for the first one that opens
pub struct PortProber<O> {
    opener: O,
    template: AddressTemplate,
    first_index: u32,
}

impl<O: PortOpener> PortProber<O> {
    /// Create a prober scanning from port number 1
    pub fn new(opener: O, template: AddressTemplate) -> Self {
        Self {
            opener,
            template,
            first_index: 1,
        }
    }

    /// Start scanning at a different port number
    pub fn with_first_index(mut self, first_index: u32) -> Self {
        self.first_index = first_index;
        self
    }

    /// The candidate addresses, in scan order
    pub fn candidates(&self, candidate_count: u32) -> impl Iterator<Item = DeviceAddress> + '_ {
        let end = self.first_index.saturating_add(candidate_count);
        (self.first_index..end).map(|i| self.template.address(i))
    }

    /// Find the first candidate that opens at `probe_baud`
    ///
    /// Scans `candidate_count` numbered ports in ascending order and stops at
    /// the first success. The probe handle is closed before returning.
    pub fn discover(&self, candidate_count: u32, probe_baud: u32) -> Option<DeviceAddress> {
        debug!(
            "Probing {} candidate(s) from {} at {} baud",
            candidate_count,
            self.template.address(self.first_index),
            probe_baud
        );

        for address in self.candidates(candidate_count) {
            match self.opener.open(&address, probe_baud) {
                Ok(port) => {
                    drop(port);
                    info!("Device likely located on {}", address);
                    return Some(address);
                }
                Err(e) => trace!("Probe of {} failed: {}", address, e),
            }
        }

        debug!("No device responded to probing");
        None
    }
}

/// Open the session connection at the session baud rate
///
/// Not retried; a failure here ends the session.
pub fn connect<O: PortOpener>(
    opener: &O,
    address: &DeviceAddress,
    session_baud: u32,
) -> Result<O::Port, DetectError> {
    debug!("Connecting to {} at {} baud", address, session_baud);
    let port = opener.open(address, session_baud)?;
    info!("Connected to {} at {} baud", address, session_baud);
    Ok(port)
}
