//! # RigCheck Core Library
//!
//! Core functionality for the RigCheck serial test harness.
//!
//! This library provides:
//! - A blocking transport abstraction over the serial link
//! - The protocol engine: synchronization handshake, response
//!   classification, and the scripted session loop
//! - Serial port helpers (open, configure, enumerate)
//! - Message scripts (built-in fixture and JSON script files)
//!
//! ## Example
//!
//! ```rust,ignore
//! use rigcheck_core::protocol::{Session, SessionConfig};
//! use rigcheck_core::script::Script;
//!
//! let config = SessionConfig::new("/dev/ttyACM0");
//! let mut session = Session::open(&config)?;
//!
//! let identity = session.synchronize()?;
//! println!("device: {}", identity);
//!
//! let report = session.run(&Script::default())?;
//! println!("{} acknowledged", report.acknowledged());
//! ```

#![warn(missing_docs)]

pub mod protocol;
pub mod script;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::protocol::{
        classify, MessageOutcome, ProtocolError, ResponseClass, Session, SessionConfig,
        SessionReport, SessionState, Transport,
    };
    pub use crate::script::Script;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
