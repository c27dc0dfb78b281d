//! Error types for device detection

use thiserror::Error;

/// Errors that can occur during detection and connection
#[derive(Debug, Error)]
pub enum DetectError {
    /// Failed to enumerate serial ports
    #[error("failed to enumerate ports: {0}")]
    EnumerationFailed(String),

    /// Failed to open serial port
    #[error("failed to open port {port} at {baud_rate} baud: {reason}")]
    OpenFailed {
        port: String,
        baud_rate: u32,
        reason: String,
    },

    /// Port busy or in use
    #[error("port {0} is busy or in use")]
    PortBusy(String),
}

impl DetectError {
    /// Build an open error from a `serialport` failure
    pub(crate) fn from_open(port: &str, baud_rate: u32, err: serialport::Error) -> Self {
        match err.kind() {
            serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
                DetectError::PortBusy(port.to_string())
            }
            _ => DetectError::OpenFailed {
                port: port.to_string(),
                baud_rate,
                reason: err.to_string(),
            },
        }
    }
}
