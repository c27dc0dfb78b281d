//! Logger settings
//!
//! Every field has a default, so the logger runs with no settings file at
//! all. A file only needs the fields that differ.

use std::path::PathBuf;
use std::time::Duration;

use mag_capture::CaptureConfig;
use mag_detect::{
    AddressTemplate, DeviceAddress, DEFAULT_CANDIDATE_COUNT, DEFAULT_PORT_PREFIX,
    DEFAULT_PROBE_BAUD, DEFAULT_SESSION_BAUD,
};
use mag_grid::{column_index, GridLayout, DEFAULT_SHEET};
use mag_protocol::{
    ProtocolError, RowDecoder, Sentinel, DEFAULT_DELIMITER, DEFAULT_MAX_RECORD_LEN,
    DEFAULT_SENTINEL, DEFAULT_TRIGGER, MAX_RECORD_LEN_LIMIT,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SessionError;

/// Logger settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Port name prefix for numbered probing (e.g. `\\.\COM`, `/dev/ttyUSB`)
    pub port_prefix: String,
    /// First port number probed
    pub first_port: u32,
    /// Number of port numbers probed
    pub candidate_count: u32,
    /// Baud rate for presence probing
    pub probe_baud: u32,
    /// Baud rate for the capture session
    pub session_baud: u32,
    /// Use this port and skip probing
    pub port: Option<String>,
    /// Serial read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// String sent to start the table
    pub trigger: String,
    /// Pause before sending the trigger, in milliseconds
    pub settle_ms: u64,
    /// End-of-table marker
    pub sentinel: String,
    /// Field delimiter
    pub delimiter: String,
    /// Maximum record length in bytes
    pub max_record_len: usize,
    /// Maximum records per capture (unbounded when absent)
    pub max_records: Option<usize>,
    /// Worksheet name
    pub sheet: String,
    /// Column letters for the "Last Run:" label
    pub stamp_column: String,
    /// Save records captured before a read failure
    pub save_partial_on_error: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port_prefix: DEFAULT_PORT_PREFIX.to_string(),
            first_port: 1,
            candidate_count: DEFAULT_CANDIDATE_COUNT,
            probe_baud: DEFAULT_PROBE_BAUD,
            session_baud: DEFAULT_SESSION_BAUD,
            port: None,
            read_timeout_ms: 100,
            trigger: DEFAULT_TRIGGER.to_string(),
            settle_ms: 1500,
            sentinel: DEFAULT_SENTINEL.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            max_record_len: DEFAULT_MAX_RECORD_LEN,
            max_records: None,
            sheet: DEFAULT_SHEET.to_string(),
            stamp_column: "G".to_string(),
            save_partial_on_error: false,
        }
    }
}

impl Settings {
    /// Get the XDG config directory for the logger
    /// Uses $XDG_CONFIG_HOME/magnetar-logger, falls back to ~/.config/magnetar-logger
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("magnetar-logger"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("magnetar-logger"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };
        let Ok(json) = std::fs::read_to_string(&path) else {
            debug!("No settings at {}, using defaults", path.display());
            return Self::default();
        };
        Self::from_json(&json).unwrap_or_else(|e| {
            warn!("Ignoring malformed settings {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Template for numbered port names
    pub fn address_template(&self) -> AddressTemplate {
        AddressTemplate::new(self.port_prefix.as_str())
    }

    /// Port to use without probing, if configured
    pub fn forced_address(&self) -> Option<DeviceAddress> {
        self.port.as_deref().map(DeviceAddress::new)
    }

    /// Serial read timeout
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Pause before the trigger
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Capture parameters
    pub fn capture_config(&self) -> Result<CaptureConfig, SessionError> {
        if self.max_record_len == 0 {
            return Err(ProtocolError::ZeroRecordLength.into());
        }
        if self.max_record_len > MAX_RECORD_LEN_LIMIT {
            return Err(ProtocolError::RecordLengthTooLarge {
                len: self.max_record_len,
                limit: MAX_RECORD_LEN_LIMIT,
            }
            .into());
        }
        Ok(CaptureConfig {
            sentinel: Sentinel::new(self.sentinel.as_str())?,
            max_record_len: self.max_record_len,
            max_records: self.max_records,
        })
    }

    /// Field decoder
    pub fn row_decoder(&self) -> Result<RowDecoder, SessionError> {
        Ok(RowDecoder::new(self.delimiter.as_str())?)
    }

    /// Stamp placement
    pub fn grid_layout(&self) -> Result<GridLayout, SessionError> {
        let stamp_column = column_index(&self.stamp_column).ok_or_else(|| {
            SessionError::Settings(format!("invalid stamp column {:?}", self.stamp_column))
        })?;
        Ok(GridLayout {
            stamp_column,
            ..GridLayout::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_device() {
        let settings = Settings::default();
        assert_eq!(settings.probe_baud, 115_200);
        assert_eq!(settings.session_baud, 57_600);
        assert_eq!(settings.candidate_count, 98);
        assert_eq!(settings.trigger, "SendData");
        assert_eq!(settings.sentinel, "DataEND");
        assert_eq!(settings.grid_layout().unwrap().stamp_column, 7);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "port": "COM9", "delimiter": ";" }"#).unwrap();
        assert_eq!(settings.forced_address(), Some(DeviceAddress::new("COM9")));
        assert_eq!(settings.row_decoder().unwrap().delimiter(), ";");
        assert_eq!(settings.session_baud, DEFAULT_SESSION_BAUD);
    }

    #[test]
    fn test_oversized_record_length_rejected() {
        let json = r#"{ "max_record_len": 18446744073709551615 }"#;
        let settings = Settings::from_json(json).unwrap();
        assert!(matches!(settings.capture_config(), Err(SessionError::Settings(_))));

        let at_limit = Settings {
            max_record_len: MAX_RECORD_LEN_LIMIT,
            ..Default::default()
        };
        assert!(at_limit.capture_config().is_ok());
    }

    #[test]
    fn test_round_trip() {
        let settings = Settings {
            max_records: Some(500),
            save_partial_on_error: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_component_settings() {
        let settings = Settings {
            delimiter: String::new(),
            sentinel: String::new(),
            stamp_column: "7".into(),
            max_record_len: 0,
            ..Default::default()
        };
        assert!(matches!(settings.row_decoder(), Err(SessionError::Settings(_))));
        assert!(matches!(settings.capture_config(), Err(SessionError::Settings(_))));
        assert!(matches!(settings.grid_layout(), Err(SessionError::Settings(_))));
    }
}
