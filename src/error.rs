//! # Error Types
//!
//! Error handling for the packet layer.
//!
//! Transient conditions (no data yet, send buffer full) are not errors: they are
//! reported through [`ReadStatus::MoreData`](crate::protocol::connection::ReadStatus)
//! or an incomplete send. This type covers malformed payloads, unrepresentable
//! packets, transport failures and configuration problems.
//!
//! ## Error Categories
//! - **I/O Errors**: Socket failures surfaced by a transport adapter
//! - **Payload Errors**: Reads past the end of a body, unterminated strings
//! - **Framing Errors**: Bodies too large for the 16-bit size field, unknown command ids
//! - **Configuration Errors**: Invalid or unreadable settings
//!
//! ## Example Usage
//! ```rust
//! use netstream_protocol::core::command::Command;
//! use netstream_protocol::core::packet::Packet;
//! use netstream_protocol::error::{ProtocolError, Result};
//!
//! fn read_player_name(packet: &mut Packet) -> Result<String> {
//!     packet.read_string().map(str::to_owned)
//! }
//!
//! let mut packet = Packet::new(Command::Chat);
//! packet.write(b"no terminator");
//! assert!(matches!(read_player_name(&mut packet), Err(ProtocolError::MalformedString)));
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Transport errors
    pub const ERR_SOCKET_NOT_CONNECTED: &str = "Socket is not connected";
}

// ProtocolError is the primary error type for all packet layer operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Insufficient data: requested {requested} bytes, {available} available")]
    InsufficientData { requested: usize, available: usize },

    #[error("Malformed string in packet")]
    MalformedString,

    #[error("Unknown command id: {0}")]
    UnknownCommand(u16),

    #[error("Packet too large: {0} bytes")]
    OversizedPacket(usize),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
