//! # netstream-protocol
//!
//! Streaming packet framing and connection management for a stateful,
//! length-prefixed binary protocol over an ordered byte stream.
//!
//! The crate reassembles packets from arbitrarily fragmented non-blocking
//! reads, serializes outgoing packets with a header layout compatible with
//! older peers, gates outbound traffic on authorization, and keeps a send queue
//! whose priority inserts never disturb a packet that is already half-written.
//!
//! ## Modules
//! - [`core`]: Commands, header layout, packets and the async codec
//! - [`protocol`]: The poll-driven [`Connection`](protocol::connection::Connection)
//! - [`transport`]: The socket contract and its in-memory and TCP adapters
//! - [`config`]: TOML/environment configuration
//! - [`error`]: Error type shared by every module
//! - [`utils`]: Logging setup, metrics and clocks
//!
//! ## Wire Format
//! ```text
//! [Size(2, BE)] [Command(2, BE)] [Body]
//! ```
//! The size field counts the body plus the two command bytes.

#![warn(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod utils;

pub use crate::core::command::Command;
pub use crate::core::packet::Packet;
pub use crate::error::{ProtocolError, Result};
pub use crate::protocol::connection::{AuthStatus, Connection, ReadStatus};
pub use crate::transport::{Received, SocketStatus, Transport};
