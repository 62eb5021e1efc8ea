// src/io/serial/reader.rs
//
// Serial port byte source and port enumeration.
// Opens the device with the configured line settings and hands bytes to the
// stream consumer one at a time.

use serde::Serialize;
use std::io::Read;
use std::time::Duration;

use super::utils::{to_serialport_data_bits, to_serialport_parity, to_serialport_stop_bits, Parity};
use crate::error::TransportError;
use crate::io::ByteSource;

/// Default line rate of the ECU link this tool was built for.
pub const DEFAULT_BAUD_RATE: u32 = 16064;
pub const DEFAULT_DATA_BITS: u8 = 8;

/// Read timeout. Short enough that pause/stop requests are seen promptly on an idle line.
const READ_TIMEOUT: Duration = Duration::from_millis(50);

// ============================================================================
// Types and Configuration
// ============================================================================

/// Serial port configuration
#[derive(Clone, Debug, PartialEq)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    pub data_bits: u8,
    pub stop_bits: u8,
    pub parity: Parity,
}

impl SerialConfig {
    /// Line description in `16064 baud (8-N-1)` form
    pub fn describe_line(&self) -> String {
        format!(
            "{} baud ({}-{}-{})",
            self.baud_rate,
            self.data_bits,
            self.parity.letter(),
            self.stop_bits
        )
    }
}

/// Information about an available serial port
#[derive(Clone, Debug, Serialize)]
pub struct SerialPortInfo {
    pub port_name: String,
    pub port_type: String,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
}

// ============================================================================
// Serial Byte Source
// ============================================================================

/// Blocking single-byte reader over an open serial port
pub struct SerialByteSource {
    port_name: String,
    port: Option<Box<dyn serialport::SerialPort>>,
}

impl SerialByteSource {
    pub fn open(config: &SerialConfig) -> Result<Self, TransportError> {
        let port = serialport::new(&config.port, config.baud_rate)
            .data_bits(to_serialport_data_bits(config.data_bits))
            .stop_bits(to_serialport_stop_bits(config.stop_bits))
            .parity(to_serialport_parity(config.parity))
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| TransportError::Open {
                port: config.port.clone(),
                reason: e.to_string(),
            })?;

        tlog!("[serial] Opened {} at {}", config.port, config.describe_line());

        Ok(Self {
            port_name: config.port.clone(),
            port: Some(port),
        })
    }
}

impl ByteSource for SerialByteSource {
    fn read_one_byte(&mut self) -> Result<Option<u8>, TransportError> {
        let port = self.port.as_mut().ok_or(TransportError::Closed)?;
        let mut buf = [0u8; 1];
        match port.read(&mut buf) {
            Ok(1) => Ok(Some(buf[0])),
            Ok(_) => Ok(None),
            // Timeout is expected for serial reads
            Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(TransportError::Read(e)),
        }
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            tlog!("[serial] Closed {}", self.port_name);
        }
    }

    fn name(&self) -> &str {
        &self.port_name
    }
}

// ============================================================================
// Port Enumeration
// ============================================================================

/// List available serial ports
///
/// On macOS, filters out /dev/tty.* devices and only shows /dev/cu.* devices.
/// The cu (calling unit) devices are non-blocking and preferred for outgoing connections.
/// The tty (terminal) devices block on open waiting for carrier detect.
pub fn list_serial_ports() -> Result<Vec<SerialPortInfo>, String> {
    let ports = serialport::available_ports().map_err(|e| format!("Failed to enumerate ports: {}", e))?;

    Ok(ports
        .into_iter()
        .filter(|_p| {
            #[cfg(target_os = "macos")]
            {
                !_p.port_name.starts_with("/dev/tty.")
            }
            #[cfg(not(target_os = "macos"))]
            {
                true
            }
        })
        .map(|p| {
            let (port_type, manufacturer, product, serial_number, vid, pid) = match p.port_type {
                serialport::SerialPortType::UsbPort(info) => (
                    "USB".to_string(),
                    info.manufacturer,
                    info.product,
                    info.serial_number,
                    Some(info.vid),
                    Some(info.pid),
                ),
                serialport::SerialPortType::BluetoothPort => {
                    ("Bluetooth".to_string(), None, None, None, None, None)
                }
                serialport::SerialPortType::PciPort => {
                    ("PCI".to_string(), None, None, None, None, None)
                }
                serialport::SerialPortType::Unknown => {
                    ("Unknown".to_string(), None, None, None, None, None)
                }
            };
            SerialPortInfo {
                port_name: p.port_name,
                port_type,
                manufacturer,
                product,
                serial_number,
                vid,
                pid,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_line() {
        let config = SerialConfig {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DEFAULT_DATA_BITS,
            stop_bits: 1,
            parity: Parity::None,
        };
        assert_eq!(config.describe_line(), "16064 baud (8-N-1)");
    }

    #[test]
    fn test_open_missing_port_is_open_error() {
        let config = SerialConfig {
            port: "/definitely/not/a/serial/port".to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DEFAULT_DATA_BITS,
            stop_bits: 1,
            parity: Parity::None,
        };
        match SerialByteSource::open(&config) {
            Err(TransportError::Open { port, .. }) => assert_eq!(port, config.port),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("opening a missing port should fail"),
        }
    }
}
