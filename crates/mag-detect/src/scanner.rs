//! Serial port enumeration
//!
//! Used for diagnostics before probing: the OS port list often explains why
//! probing found nothing (device unplugged, different driver prefix).

use serialport::{available_ports, SerialPortType};
use tracing::info;

use crate::error::DetectError;

/// Information about a serial port
#[derive(Debug, Clone)]
pub struct SerialPortInfo {
    /// Port name (e.g., /dev/ttyUSB0, COM3)
    pub port: String,
    /// USB Vendor ID (if USB)
    pub vid: Option<u16>,
    /// USB Product ID (if USB)
    pub pid: Option<u16>,
    /// USB product string
    pub product: Option<String>,
}

impl SerialPortInfo {
    fn from_serialport(name: String, port_type: &SerialPortType) -> Self {
        match port_type {
            SerialPortType::UsbPort(usb) => Self {
                port: name,
                vid: Some(usb.vid),
                pid: Some(usb.pid),
                product: usb.product.clone(),
            },
            _ => Self {
                port: name,
                vid: None,
                pid: None,
                product: None,
            },
        }
    }

    /// Label for diagnostics: `COM3 (Uno, 2341:0043)` or just the name
    pub fn label(&self) -> String {
        let mut detail = Vec::new();
        if let Some(product) = &self.product {
            detail.push(product.clone());
        }
        if let (Some(vid), Some(pid)) = (self.vid, self.pid) {
            detail.push(format!("{:04x}:{:04x}", vid, pid));
        }
        if detail.is_empty() {
            self.port.clone()
        } else {
            format!("{} ({})", self.port, detail.join(", "))
        }
    }
}

/// Serial port scanner
#[derive(Debug, Clone)]
pub struct PortScanner {
    skip_patterns: Vec<String>,
}

impl PortScanner {
    /// Create a scanner that hides Bluetooth and debug ports
    pub fn new() -> Self {
        Self {
            skip_patterns: vec!["Bluetooth".to_string(), "debug".to_string()],
        }
    }

    /// Enumerate the serial ports the OS reports
    pub fn enumerate_ports(&self) -> Result<Vec<SerialPortInfo>, DetectError> {
        let ports = available_ports().map_err(|e| DetectError::EnumerationFailed(e.to_string()))?;

        let result: Vec<_> = ports
            .into_iter()
            .map(|p| SerialPortInfo::from_serialport(p.port_name, &p.port_type))
            .filter(|p| !self.should_skip_port(p))
            .collect();

        if result.is_empty() {
            info!("No serial ports found");
        } else {
            info!("Found {} serial port(s)", result.len());
            for port in &result {
                info!("  {}", port.label());
            }
        }

        Ok(result)
    }

    fn should_skip_port(&self, port: &SerialPortInfo) -> bool {
        self.skip_patterns
            .iter()
            .any(|pattern| port.port.contains(pattern.as_str()))
    }
}

impl Default for PortScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serialport::UsbPortInfo;

    #[test]
    fn test_usb_port_label_includes_product_and_ids() {
        let usb_info = SerialPortType::UsbPort(UsbPortInfo {
            vid: 0x2341,
            pid: 0x0043,
            serial_number: None,
            manufacturer: Some("Arduino".to_string()),
            product: Some("Uno".to_string()),
        });

        let info = SerialPortInfo::from_serialport("COM5".to_string(), &usb_info);

        assert_eq!(info.label(), "COM5 (Uno, 2341:0043)");
    }

    #[test]
    fn test_label_without_usb_details() {
        let info = SerialPortInfo::from_serialport("/dev/ttyS0".to_string(), &SerialPortType::Unknown);
        assert_eq!(info.label(), "/dev/ttyS0");
    }

    #[test]
    fn test_skips_bluetooth_ports() {
        let scanner = PortScanner::new();
        let info = SerialPortInfo::from_serialport(
            "/dev/cu.Bluetooth-Incoming-Port".to_string(),
            &SerialPortType::Unknown,
        );
        assert!(scanner.should_skip_port(&info));
    }
}
