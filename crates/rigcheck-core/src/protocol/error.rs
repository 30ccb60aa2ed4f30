//! Protocol errors

use thiserror::Error;

/// Errors that can occur while talking to the device under test
///
/// Timeouts are deliberately not represented here: a timed-out read surfaces
/// as an empty result at the transport level and the waiting loop retries. A
/// device-reported `ERROR:` line is a message outcome, not an error. Only
/// transport failures are fatal.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Serial port error: {0}")]
    SerialError(String),

    #[error("Port not found: {0}")]
    PortNotFound(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
