//! Session management
//!
//! Drives one test session against the device: synchronize, then walk the
//! scripted message sequence, sending each message and classifying the
//! device's acknowledgement lines until the exchange is terminal.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::serial::{clear_buffers, configure_port, open_port};
use super::{
    classify, ProtocolError, ResponseClass, SerialTransport, Transport, DEFAULT_TIMEOUT_SECS,
    SYNC_ACK, SYNC_SENTINEL,
};
use crate::script::Script;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Transport open, handshake not yet performed
    Unsynced,
    /// Handshake complete, messages may be sent
    Synced,
    /// Message sequence exhausted
    Finished,
    /// Transport failure mid-session
    Failed,
}

/// Wait state of one message exchange
enum Exchange {
    Waiting,
    Terminal,
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Serial device path
    pub port_name: String,
    /// Per-read timeout
    pub timeout: Duration,
}

impl SessionConfig {
    /// Configuration for `port_name` with the default one-second read timeout
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the per-read timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Terminal result of one message exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageOutcome {
    /// The device finished the message with `DONE!`
    Acknowledged,
    /// The device rejected the message; the `ERROR:` line is kept verbatim
    DeviceError(String),
}

/// Per-message outcomes of a completed session, in script order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionReport {
    /// One entry per message sent
    pub outcomes: Vec<MessageOutcome>,
}

impl SessionReport {
    /// Number of messages the device acknowledged with `DONE!`
    pub fn acknowledged(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, MessageOutcome::Acknowledged))
            .count()
    }

    /// Number of messages the device rejected with `ERROR:`
    pub fn device_errors(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, MessageOutcome::DeviceError(_)))
            .count()
    }
}

/// A test session against one device
///
/// Owns the transport for its whole lifetime. Messages are sent strictly in
/// script order; the next message is never sent before the current exchange
/// reached a terminal classification.
pub struct Session {
    transport: Box<dyn Transport>,
    state: SessionState,
    identity: Option<String>,
    cursor: usize,
}

impl Session {
    /// Create a session over an already-open transport
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            state: SessionState::Unsynced,
            identity: None,
            cursor: 0,
        }
    }

    /// Open the serial device named in `config` and prepare it for a session
    pub fn open(config: &SessionConfig) -> Result<Self, ProtocolError> {
        let mut port = open_port(&config.port_name, config.timeout)?;
        configure_port(port.as_mut())?;
        clear_buffers(port.as_mut())?;
        Ok(Self::new(Box::new(SerialTransport::new(port))))
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Identity line the device sent after synchronization, if any
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Number of messages sent so far
    pub fn messages_sent(&self) -> usize {
        self.cursor
    }

    /// Scan for the sync sentinel, acknowledge it, and read the identity line
    ///
    /// Blocks until the device emits the sentinel. There is no retry ceiling:
    /// each read returns within the configured timeout, but the scan starts
    /// over indefinitely, so a device that never synchronizes hangs the
    /// session. The identity line is returned verbatim and not validated.
    pub fn synchronize(&mut self) -> Result<String, ProtocolError> {
        debug!("synchronize: scanning for sentinel");
        loop {
            match self.transport.read_byte()? {
                Some(SYNC_SENTINEL) => break,
                Some(other) => debug!("synchronize: discarding byte {:#04x}", other),
                // Timeout, keep scanning
                None => {}
            }
        }
        self.transport.write_all(&[SYNC_ACK])?;
        info!("synchronize: sentinel seen, acknowledged");

        // Device firmware ends the identity line with \r\n
        let identity = self.transport.read_line()?.trim().to_string();
        self.identity = Some(identity.clone());
        self.state = SessionState::Synced;
        Ok(identity)
    }

    /// Send one message and wait for its terminal acknowledgement
    ///
    /// The message is framed with a single trailing `\n`. `DEBUG:` lines are
    /// echoed to the transcript and waiting continues; unrecognized lines and
    /// the empty lines produced by read timeouts are ignored. An `ERROR:`
    /// line terminates the exchange without a `DONE!`. Waits forever if the
    /// device never sends a terminal line.
    pub fn send_and_await(&mut self, message: &[u8]) -> Result<MessageOutcome, ProtocolError> {
        let mut framed = Vec::with_capacity(message.len() + 1);
        framed.extend_from_slice(message);
        framed.push(b'\n');

        println!("Write: {}", String::from_utf8_lossy(message));
        self.transport.write_all(&framed)?;
        self.cursor += 1;

        let mut exchange = Exchange::Waiting;
        let mut outcome = MessageOutcome::Acknowledged;
        while let Exchange::Waiting = exchange {
            let line = self.transport.read_line()?;
            match classify(&line) {
                ResponseClass::Debug => println!("Read: {}", line),
                ResponseClass::Error => {
                    println!("Read: {}", line);
                    outcome = MessageOutcome::DeviceError(line);
                    exchange = Exchange::Terminal;
                }
                ResponseClass::Done => exchange = Exchange::Terminal,
                ResponseClass::Unrecognized => debug!("ignoring line {:?}", line),
            }
        }
        Ok(outcome)
    }

    /// Drive the whole script, collecting one outcome per message
    ///
    /// An `ERROR:` outcome is terminal for its message only; the run carries
    /// on to the next message so a single session collects every failure in
    /// the script. Only a transport error aborts the run.
    pub fn run(&mut self, script: &Script) -> Result<SessionReport, ProtocolError> {
        let mut report = SessionReport::default();
        for message in script.messages() {
            let outcome = match self.send_and_await(message.as_bytes()) {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.state = SessionState::Failed;
                    return Err(e);
                }
            };
            if let MessageOutcome::DeviceError(line) = &outcome {
                warn!("message {} rejected: {}", self.cursor, line.trim());
            }
            report.outcomes.push(outcome);
        }
        self.state = SessionState::Finished;
        Ok(report)
    }
}
