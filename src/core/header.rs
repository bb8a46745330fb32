//! # Packet Header
//!
//! Fixed 4-byte prefix of every packet:
//!
//! ```text
//! [Size(2, network order)] [Command id(2, big-endian)]
//! ```
//!
//! ## Size compatibility
//! Older peers counted the command id as part of the body, so the size field on
//! the wire is the body length plus [`COMMAND_ID_SIZE`]. The in-memory header
//! always holds the plain body length: the width is subtracted once right after
//! parsing (clamped at zero) and added back when serializing.

use crate::error::{ProtocolError, Result};

/// Width of the command id field in bytes
pub const COMMAND_ID_SIZE: usize = 2;

/// Total header size in bytes
pub const HEADER_SIZE: usize = 2 + COMMAND_ID_SIZE;

/// Largest body that still fits the wire size field once the id width is added
pub const MAX_BODY_SIZE: usize = u16::MAX as usize - COMMAND_ID_SIZE;

/// Host-order view of a packet header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacketHeader {
    /// Body length in bytes, excluding the command id
    pub size: u16,
    /// Raw command id
    pub id: u16,
}

impl PacketHeader {
    pub fn new(id: u16, size: u16) -> Self {
        Self { size, id }
    }

    /// Parse a header received from the wire, applying the size adjustment.
    ///
    /// A declared size smaller than the id width yields an empty body rather
    /// than an error.
    pub fn from_wire(bytes: [u8; HEADER_SIZE]) -> Self {
        let wire_size = u16::from_be_bytes([bytes[0], bytes[1]]);
        let id = u16::from_be_bytes([bytes[2], bytes[3]]);

        Self {
            size: wire_size.saturating_sub(COMMAND_ID_SIZE as u16),
            id,
        }
    }

    /// Serialize for a body of `body_len` bytes, adding the id width back in.
    pub fn to_wire(id: u16, body_len: usize) -> Result<[u8; HEADER_SIZE]> {
        if body_len > MAX_BODY_SIZE {
            return Err(ProtocolError::OversizedPacket(body_len));
        }

        let wire_size = (body_len + COMMAND_ID_SIZE) as u16;
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..2].copy_from_slice(&wire_size.to_be_bytes());
        bytes[2..].copy_from_slice(&id.to_be_bytes());
        Ok(bytes)
    }
}
