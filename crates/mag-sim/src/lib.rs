//! Magnetar Device Simulation Library
//!
//! This crate provides stand-ins for the data logger hardware:
//!
//! - **VirtualDevice**: a serial handle (`Read + Write`) that waits for the
//!   trigger string, then streams a scripted table followed by the sentinel
//! - **VirtualPortSet**: a [`mag_detect::PortOpener`] over named virtual ports
//!   that only open at configured baud rates, recording every attempt
//!
//! # Example
//!
//! ```rust
//! use std::io::{Read, Write};
//! use mag_sim::VirtualDevice;
//!
//! let mut device = VirtualDevice::new(["1,2", "3,4"]);
//! device.write_all(b"SendData").unwrap();
//!
//! let mut out = String::new();
//! let mut buf = [0u8; 64];
//! while let Ok(n) = device.read(&mut buf) {
//!     out.push_str(std::str::from_utf8(&buf[..n]).unwrap());
//! }
//! assert_eq!(out, "1,2\r\n3,4\r\nDataEND\r\n");
//! ```

pub mod device;
pub mod ports;

pub use device::{StreamEnd, VirtualDevice};
pub use ports::VirtualPortSet;
