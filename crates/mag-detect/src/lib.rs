//! Magnetar Device Detection Library
//!
//! This crate finds the data logger on the host's serial ports and opens the
//! session connection:
//!
//! - **Probing**: walk a bounded, numbered range of port names and report the
//!   first one that opens at the probe baud rate
//! - **Connecting**: open the selected port at the (different) session baud rate
//! - **Enumeration**: list the ports the OS reports, for diagnostics
//!
//! Opening is abstracted behind [`PortOpener`] so discovery can run against
//! simulated ports.
//!
//! # Example
//!
//! ```rust,no_run
//! use mag_detect::{connect, AddressTemplate, PortProber, SerialOpener};
//!
//! let opener = SerialOpener::default();
//! let prober = PortProber::new(&opener, AddressTemplate::default());
//!
//! if let Some(address) = prober.discover(98, 115_200) {
//!     let port = connect(&opener, &address, 57_600).unwrap();
//!     println!("Connected to {}", port.name().unwrap_or_default());
//! }
//! ```

pub mod address;
pub mod error;
pub mod probe;
pub mod scanner;

pub use address::{AddressTemplate, DeviceAddress, DEFAULT_PORT_PREFIX};
pub use error::DetectError;
pub use probe::{
    connect, PortOpener, PortProber, SerialOpener, DEFAULT_CANDIDATE_COUNT, DEFAULT_PROBE_BAUD,
    DEFAULT_SESSION_BAUD,
};
pub use scanner::{PortScanner, SerialPortInfo};
