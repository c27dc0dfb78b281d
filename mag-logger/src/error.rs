//! Session error taxonomy

use mag_capture::CaptureError;
use mag_detect::DetectError;
use mag_grid::{GridError, SinkError};
use mag_protocol::ProtocolError;
use thiserror::Error;

/// Fatal conditions that end a logging session
#[derive(Debug, Error)]
pub enum SessionError {
    /// Settings could not be turned into component configuration
    #[error("invalid settings: {0}")]
    Settings(String),

    /// No candidate port opened at the probe rate
    #[error("no device responded on {first} through {last}")]
    DiscoveryExhausted { first: String, last: String },

    /// The selected port did not open at the session rate
    #[error("connection failed: {0}")]
    Connect(#[source] DetectError),

    /// Trigger or capture failed
    #[error("capture failed: {0}")]
    StreamRead(#[from] CaptureError),

    /// Rows did not fit on a sheet
    #[error("grid assembly failed: {0}")]
    Grid(#[from] GridError),

    /// Document could not be opened or saved
    #[error("document error: {0}")]
    SinkPersist(#[from] SinkError),

    /// Console input or output failed
    #[error("console error: {0}")]
    Console(#[from] std::io::Error),
}

impl From<ProtocolError> for SessionError {
    fn from(err: ProtocolError) -> Self {
        SessionError::Settings(err.to_string())
    }
}

impl SessionError {
    /// What to tell the user at the prompt
    pub fn user_message(&self) -> String {
        match self {
            SessionError::DiscoveryExhausted { .. } => format!(
                "No device found ({}). Check the cable and that the logger is powered.",
                self
            ),
            SessionError::Connect(_) => format!(
                "Error connecting to the logger ({}). Close all other serial port apps!",
                self
            ),
            _ => format!("Error: {}", self),
        }
    }
}
