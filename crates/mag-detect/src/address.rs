//! Device addresses and numbered port name templates

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default port name prefix for numbered serial ports on this platform
#[cfg(windows)]
pub const DEFAULT_PORT_PREFIX: &str = r"\\.\COM";

/// Default port name prefix for numbered serial ports on this platform
#[cfg(not(windows))]
pub const DEFAULT_PORT_PREFIX: &str = "/dev/ttyUSB";

/// Identifier of a serial endpoint (e.g. `\\.\COM7`, `/dev/ttyUSB0`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceAddress {
    name: String,
}

impl DeviceAddress {
    /// Create an address from a platform port name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The platform port name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Builds numbered addresses as `prefix + index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressTemplate {
    prefix: String,
}

impl AddressTemplate {
    /// Create a template with the given prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The port name prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Address for the given port number
    pub fn address(&self, index: u32) -> DeviceAddress {
        DeviceAddress::new(format!("{}{}", self.prefix, index))
    }
}

impl Default for AddressTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_PORT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_appends_index() {
        let template = AddressTemplate::new(r"\\.\COM");
        assert_eq!(template.address(7).name(), r"\\.\COM7");
        assert_eq!(template.address(42).name(), r"\\.\COM42");
    }

    #[test]
    fn test_address_display() {
        let address = DeviceAddress::new("/dev/ttyUSB3");
        assert_eq!(address.to_string(), "/dev/ttyUSB3");
    }
}
