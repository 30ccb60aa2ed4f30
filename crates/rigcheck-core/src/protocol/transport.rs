use serialport::SerialPort;
use std::io::{self, Read, Write};

use super::ProtocolError;

/// Blocking, timeout-bounded access to the device link
///
/// Every call blocks the current thread up to the read timeout configured
/// when the underlying port was opened. A read that times out yields an empty
/// result rather than an error, so the protocol layer can keep waiting; only
/// genuine link failures surface as `Err`.
pub trait Transport {
    /// Read a single byte, or `None` if the read timed out
    fn read_byte(&mut self) -> Result<Option<u8>, ProtocolError>;

    /// Read one line terminated by `\n`
    ///
    /// Returns the accumulated text without the terminator. A timeout ends
    /// the read early, so the result may be empty or a partial line.
    fn read_line(&mut self) -> Result<String, ProtocolError>;

    /// Write the whole buffer to the link
    fn write_all(&mut self, data: &[u8]) -> Result<(), ProtocolError>;
}

/// Transport over a real serial port
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Wrap an opened serial port
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}

impl Transport for SerialTransport {
    fn read_byte(&mut self) -> Result<Option<u8>, ProtocolError> {
        let mut buf = [0u8; 1];
        match self.port.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(ref e) if is_timeout(e) => Ok(None),
            Err(e) => Err(ProtocolError::IoError(e)),
        }
    }

    fn read_line(&mut self) -> Result<String, ProtocolError> {
        let mut line = Vec::new();
        loop {
            match self.read_byte()? {
                Some(b'\n') => break,
                Some(byte) => line.push(byte),
                // Timeout: hand back whatever arrived so far
                None => break,
            }
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), ProtocolError> {
        self.port.write_all(data)?;
        Ok(())
    }
}
