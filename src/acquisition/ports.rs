//! Serial port enumeration.

use serde::Serialize;
use tokio_serial::{SerialPortInfo, SerialPortType};
use tracing::debug;

use crate::error::PipelineError;

/// A port the board may be attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortInfo {
    pub name: String,
    pub description: String,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let description = match info.port_type {
            SerialPortType::UsbPort(usb) => {
                let product = usb
                    .product
                    .or(usb.manufacturer)
                    .unwrap_or_else(|| "USB serial".to_string());
                format!("{product} ({:04x}:{:04x})", usb.vid, usb.pid)
            }
            SerialPortType::PciPort => "PCI serial".to_string(),
            SerialPortType::BluetoothPort => "Bluetooth serial".to_string(),
            SerialPortType::Unknown => "unknown".to_string(),
        };
        Self {
            name: info.port_name,
            description,
        }
    }
}

/// List serial ports visible to the host.
///
/// Enumeration failures are returned, not swallowed.
pub fn list_ports() -> Result<Vec<PortInfo>, PipelineError> {
    let ports = tokio_serial::available_ports()
        .map_err(|e| PipelineError::PortListing(e.to_string()))?;
    debug!(count = ports.len(), "Enumerated serial ports");
    Ok(ports.into_iter().map(PortInfo::from).collect())
}
