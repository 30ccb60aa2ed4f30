//! Serial port handling
//!
//! Low-level serial access to the device under test.

use serialport::{SerialPort, SerialPortType};
use std::time::Duration;

use super::{ProtocolError, DEFAULT_BAUD_RATE};

/// An available serial port candidate
#[derive(Debug, Clone)]
pub struct PortInfo {
    /// Port name (e.g., "/dev/ttyACM0" or "COM3")
    pub name: String,

    /// Product name, if the OS reports one (USB devices usually do)
    pub product: Option<String>,
}

/// Sort key placing the usual device nodes first:
/// ttyACM* (numerically), then ttyUSB* (numerically), then the rest by name.
fn port_sort_key(name: &str) -> (u8, usize, String) {
    let basename = name.rsplit('/').next().unwrap_or(name);
    if let Some(rest) = basename.strip_prefix("ttyACM") {
        let num = rest.parse::<usize>().unwrap_or(usize::MAX);
        return (0, num, basename.to_string());
    }
    if let Some(rest) = basename.strip_prefix("ttyUSB") {
        let num = rest.parse::<usize>().unwrap_or(usize::MAX);
        return (1, num, basename.to_string());
    }
    (2, 0, basename.to_string())
}

/// serialport's enumeration misses some CDC-ACM nodes on older kernels;
/// scan /dev directly for the usual names and add any it skipped.
#[cfg(target_os = "linux")]
fn add_dev_nodes(ports: &mut Vec<PortInfo>) {
    use std::collections::HashSet;

    let known: HashSet<&str> = ports.iter().map(|p| p.name.as_str()).collect();
    let mut extra = Vec::new();
    if let Ok(entries) = std::fs::read_dir("/dev") {
        for entry in entries.flatten() {
            if let Some(fname) = entry.file_name().to_str() {
                if fname.starts_with("ttyACM") || fname.starts_with("ttyUSB") {
                    let full = format!("/dev/{}", fname);
                    if !known.contains(full.as_str()) {
                        extra.push(PortInfo {
                            name: full,
                            product: None,
                        });
                    }
                }
            }
        }
    }
    ports.extend(extra);
}

/// List serial ports likely to host the device under test, in a
/// deterministic order
pub fn list_ports() -> Vec<PortInfo> {
    let mut ports: Vec<PortInfo> = serialport::available_ports()
        .unwrap_or_default()
        .into_iter()
        .map(|info| {
            let product = match info.port_type {
                SerialPortType::UsbPort(usb) => usb.product,
                _ => None,
            };
            PortInfo {
                name: info.port_name,
                product,
            }
        })
        .collect();

    #[cfg(target_os = "linux")]
    add_dev_nodes(&mut ports);

    ports.sort_by_key(|p| port_sort_key(&p.name));
    ports
}

/// Open the device at the protocol's fixed baud rate
pub fn open_port(name: &str, timeout: Duration) -> Result<Box<dyn SerialPort>, ProtocolError> {
    serialport::new(name, DEFAULT_BAUD_RATE)
        .timeout(timeout)
        .open()
        .map_err(|e| match e.kind {
            serialport::ErrorKind::NoDevice => ProtocolError::PortNotFound(name.to_string()),
            _ => ProtocolError::SerialError(e.to_string()),
        })
}

/// Configure the port the way the device firmware expects
///
/// 8N1 with every kind of flow control off; the device side never asserts
/// RTS/CTS and does not speak XON/XOFF.
pub fn configure_port(port: &mut dyn SerialPort) -> Result<(), ProtocolError> {
    port.set_data_bits(serialport::DataBits::Eight)
        .map_err(|e| ProtocolError::SerialError(e.to_string()))?;
    port.set_parity(serialport::Parity::None)
        .map_err(|e| ProtocolError::SerialError(e.to_string()))?;
    port.set_stop_bits(serialport::StopBits::One)
        .map_err(|e| ProtocolError::SerialError(e.to_string()))?;
    port.set_flow_control(serialport::FlowControl::None)
        .map_err(|e| ProtocolError::SerialError(e.to_string()))
}

/// Clear stale bytes on both sides of the link
///
/// Opening the port resets the device, which may spray boot noise into the
/// input buffer before synchronization starts.
pub fn clear_buffers(port: &mut dyn SerialPort) -> Result<(), ProtocolError> {
    port.clear(serialport::ClearBuffer::All)
        .map_err(|e| ProtocolError::SerialError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_ports_does_not_panic() {
        let ports = list_ports();
        for port in &ports {
            println!("found port: {} {:?}", port.name, port.product);
        }
    }

    #[test]
    fn test_port_ordering() {
        let mut names = vec![
            "/dev/rfcomm0",
            "/dev/ttyUSB2",
            "/dev/ttyACM10",
            "/dev/ttyACM0",
            "/dev/ttyUSB0",
            "/dev/ttyACM2",
        ];
        names.sort_by_key(|n| port_sort_key(n));
        assert_eq!(
            names,
            vec![
                "/dev/ttyACM0",
                "/dev/ttyACM2",
                "/dev/ttyACM10",
                "/dev/ttyUSB0",
                "/dev/ttyUSB2",
                "/dev/rfcomm0",
            ]
        );
    }

    #[test]
    fn test_port_ordering_windows_names() {
        // COM names carry no tty prefix; they sort in the catch-all bucket
        assert_eq!(port_sort_key("COM3").0, 2);
        assert_eq!(port_sort_key("COM11").0, 2);
    }
}
