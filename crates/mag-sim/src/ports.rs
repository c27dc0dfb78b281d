//! Named virtual serial ports

use std::sync::Mutex;

use mag_detect::{DetectError, DeviceAddress, PortOpener};
use tracing::trace;

use crate::device::VirtualDevice;

#[derive(Debug, Clone)]
struct VirtualPort {
    name: String,
    baud_rates: Vec<u32>,
    device: VirtualDevice,
}

/// A set of virtual ports implementing [`PortOpener`]
///
/// Each port opens only at its listed baud rates and hands out a fresh copy
/// of its device on every successful open. Every attempt is recorded, in
/// order, so tests can check how far a scan went.
#[derive(Debug, Default)]
pub struct VirtualPortSet {
    ports: Vec<VirtualPort>,
    attempts: Mutex<Vec<(DeviceAddress, u32)>>,
}

impl VirtualPortSet {
    /// Create an empty port set; every open fails
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a port that opens at the given baud rates
    pub fn with_port(
        mut self,
        name: impl Into<String>,
        baud_rates: &[u32],
        device: VirtualDevice,
    ) -> Self {
        self.ports.push(VirtualPort {
            name: name.into(),
            baud_rates: baud_rates.to_vec(),
            device,
        });
        self
    }

    /// Every open attempt so far, in order
    pub fn attempts(&self) -> Vec<(DeviceAddress, u32)> {
        self.attempts.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

impl PortOpener for VirtualPortSet {
    type Port = VirtualDevice;

    fn open(&self, address: &DeviceAddress, baud_rate: u32) -> Result<VirtualDevice, DetectError> {
        if let Ok(mut attempts) = self.attempts.lock() {
            attempts.push((address.clone(), baud_rate));
        }

        let port = self
            .ports
            .iter()
            .find(|p| p.name == address.name())
            .ok_or_else(|| DetectError::OpenFailed {
                port: address.name().to_string(),
                baud_rate,
                reason: "no such port".into(),
            })?;

        if !port.baud_rates.contains(&baud_rate) {
            return Err(DetectError::OpenFailed {
                port: address.name().to_string(),
                baud_rate,
                reason: "device does not answer at this rate".into(),
            });
        }

        trace!("Opened virtual port {} at {} baud", address, baud_rate);
        Ok(port.device.clone())
    }
}
