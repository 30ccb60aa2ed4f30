//! Serial protocol engine
//!
//! Implements the line-acknowledged command protocol spoken by the device
//! under test: a one-shot synchronization handshake followed by one
//! send/acknowledge exchange per scripted message.

mod classify;
mod error;
pub mod serial;
mod session;
mod transport;

pub use classify::{classify, ResponseClass};
pub use error::ProtocolError;
pub use serial::{clear_buffers, configure_port, list_ports, open_port, PortInfo};
pub use session::{MessageOutcome, Session, SessionConfig, SessionReport, SessionState};
pub use transport::{SerialTransport, Transport};

/// Baud rate the device firmware runs at (fixed by the firmware, not configurable)
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default per-read timeout in seconds when the caller does not supply one
pub const DEFAULT_TIMEOUT_SECS: u64 = 1;

/// Byte the device emits to signal it is ready to synchronize
pub const SYNC_SENTINEL: u8 = b'Q';

/// Byte the host sends back to acknowledge synchronization
pub const SYNC_ACK: u8 = b'X';
