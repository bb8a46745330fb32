//! # Packet
//!
//! A growable byte buffer with a typed header, an append cursor and a sequential
//! read cursor. The same type is used for outbound construction and for inbound
//! reassembly, where a single instance is cleared and refilled for every message.
//!
//! Reads never panic: running past the end of the body or hitting an
//! unterminated string returns an error and leaves the read cursor where it was,
//! so the decoder can decide how to react.
//!
//! ## Example
//! ```rust
//! use netstream_protocol::core::command::Command;
//! use netstream_protocol::core::packet::Packet;
//!
//! let mut packet = Packet::new(Command::Chat);
//! packet.write_u32(7);
//! packet.write_string("hello");
//!
//! assert_eq!(packet.read_u32().unwrap(), 7);
//! assert_eq!(packet.read_string().unwrap(), "hello");
//! assert!(packet.read_u8().is_err());
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::command::Command;
use super::header::{PacketHeader, HEADER_SIZE};
use crate::error::{ProtocolError, Result};

#[derive(Debug, Clone, Default)]
pub struct Packet {
    header: PacketHeader,
    /// Raw header bytes while an inbound header is still arriving
    header_buf: [u8; HEADER_SIZE],
    data: Vec<u8>,
    /// Bytes moved across the transport so far, header included
    bytes_transferred: usize,
    /// Read cursor into `data`
    bytes_read: usize,
    /// Serialized header + body, built on the first send attempt
    wire: Option<Bytes>,
}

impl Packet {
    /// Create an empty packet for `command`
    pub fn new(command: Command) -> Self {
        Self::with_id(command.id())
    }

    /// Create an empty packet carrying a raw command id
    pub fn with_id(id: u16) -> Self {
        Self {
            header: PacketHeader::new(id, 0),
            ..Default::default()
        }
    }

    /// Create a packet whose body is a copy of `data`
    pub fn with_data(command: Command, data: &[u8]) -> Self {
        let mut packet = Self::new(command);
        packet.write(data);
        packet
    }

    pub fn header(&self) -> PacketHeader {
        self.header
    }

    pub fn command_id(&self) -> u16 {
        self.header.id
    }

    /// The command, or `None` if the id is not one this build knows about
    pub fn command(&self) -> Option<Command> {
        Command::from_id(self.header.id)
    }

    /// Declared body length (set after an inbound header parse or on finalize)
    pub fn size(&self) -> usize {
        usize::from(self.header.size)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn bytes_transferred(&self) -> usize {
        self.bytes_transferred
    }

    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    /// Bytes left between the read cursor and the end of the body
    pub fn remaining(&self) -> usize {
        self.data.len() - self.bytes_read
    }

    /// Whether this packet may only be sent on an authorized connection.
    ///
    /// Unknown command ids are treated as requiring authorization.
    pub fn requires_authorization(&self) -> bool {
        self.command()
            .map_or(true, |command| command.requires_authorization())
    }

    /// Reset transfer progress and the read cursor and empty the body.
    ///
    /// The backing allocation is kept for the next message.
    pub fn clear(&mut self) {
        self.bytes_transferred = 0;
        self.bytes_read = 0;
        self.data.clear();
        self.wire = None;
    }

    // ---------------------------------------------------------------------
    // Writing
    // ---------------------------------------------------------------------

    /// Append raw bytes to the body.
    ///
    /// A packet must not be written once sending has started; debug builds
    /// panic if it is.
    pub fn write(&mut self, bytes: &[u8]) {
        self.invalidate_wire();
        self.data.extend_from_slice(bytes);
    }

    /// Append UTF-8 text followed by a single null terminator
    pub fn write_string(&mut self, text: &str) {
        self.invalidate_wire();
        self.data.reserve(text.len() + 1);
        self.data.extend_from_slice(text.as_bytes());
        self.data.push(0);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.invalidate_wire();
        self.data.put_u8(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.invalidate_wire();
        self.data.put_u16(value);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.invalidate_wire();
        self.data.put_u32(value);
    }

    pub fn write_u64(&mut self, value: u64) {
        self.invalidate_wire();
        self.data.put_u64(value);
    }

    fn invalidate_wire(&mut self) {
        debug_assert!(
            self.wire.is_none() || self.bytes_transferred == 0,
            "packet written after {} bytes were sent",
            self.bytes_transferred
        );
        self.wire = None;
    }

    // ---------------------------------------------------------------------
    // Reading
    // ---------------------------------------------------------------------

    /// Consume the next `len` bytes of the body
    pub fn read(&mut self, len: usize) -> Result<&[u8]> {
        let available = self.remaining();
        if len > available {
            return Err(ProtocolError::InsufficientData {
                requested: len,
                available,
            });
        }

        let start = self.bytes_read;
        self.bytes_read += len;
        Ok(&self.data[start..start + len])
    }

    /// Consume a null-terminated UTF-8 string, returning it without the terminator
    pub fn read_string(&mut self) -> Result<&str> {
        let start = self.bytes_read;
        if start >= self.data.len() {
            return Err(ProtocolError::MalformedString);
        }

        let end = self.data[start..]
            .iter()
            .position(|&b| b == 0)
            .map(|offset| start + offset)
            .ok_or(ProtocolError::MalformedString)?;

        let text =
            std::str::from_utf8(&self.data[start..end]).map_err(|_| ProtocolError::MalformedString)?;

        self.bytes_read = end + 1;
        Ok(text)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let mut bytes = self.read(1)?;
        Ok(bytes.get_u8())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let mut bytes = self.read(2)?;
        Ok(bytes.get_u16())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let mut bytes = self.read(4)?;
        Ok(bytes.get_u32())
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let mut bytes = self.read(8)?;
        Ok(bytes.get_u64())
    }

    // ---------------------------------------------------------------------
    // Transfer bookkeeping used by the connection
    // ---------------------------------------------------------------------

    pub(crate) fn header_complete(&self) -> bool {
        self.bytes_transferred >= HEADER_SIZE
    }

    /// Unfilled tail of the inbound header buffer
    pub(crate) fn missing_header(&mut self) -> &mut [u8] {
        let filled = self.bytes_transferred.min(HEADER_SIZE);
        &mut self.header_buf[filled..]
    }

    /// Account for `len` header bytes written into [`Self::missing_header`].
    ///
    /// Once the header is whole it is parsed in place.
    pub(crate) fn commit_header(&mut self, len: usize) {
        self.bytes_transferred += len;
        if self.header_complete() {
            self.header = PacketHeader::from_wire(self.header_buf);
        }
    }

    /// Body bytes still expected for an inbound packet
    pub(crate) fn missing_body(&self) -> usize {
        let received = self.bytes_transferred.saturating_sub(HEADER_SIZE);
        self.size().saturating_sub(received)
    }

    pub(crate) fn append_received(&mut self, bytes: &[u8]) {
        self.bytes_transferred += bytes.len();
        self.data.extend_from_slice(bytes);
    }

    pub(crate) fn body_complete(&self) -> bool {
        self.header_complete() && self.data.len() == self.size()
    }

    /// Fix the header to the current body and serialize header + body once.
    pub(crate) fn finalize(&mut self) -> Result<Bytes> {
        if let Some(wire) = &self.wire {
            return Ok(wire.clone());
        }

        let header = PacketHeader::to_wire(self.header.id, self.data.len())?;
        self.header.size = self.data.len() as u16;

        let mut buf = BytesMut::with_capacity(HEADER_SIZE + self.data.len());
        buf.put_slice(&header);
        buf.put_slice(&self.data);

        let wire = buf.freeze();
        self.wire = Some(wire.clone());
        Ok(wire)
    }

    /// Build a fully received packet from an already parsed header and its body
    pub(crate) fn from_received(header: PacketHeader, body: &[u8]) -> Self {
        Self {
            header,
            data: body.to_vec(),
            bytes_transferred: HEADER_SIZE + body.len(),
            ..Default::default()
        }
    }

    pub(crate) fn advance_sent(&mut self, len: usize) {
        self.bytes_transferred += len;
    }

    /// Serialize without touching transfer state
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let header = PacketHeader::to_wire(self.header.id, self.data.len())?;
        let mut buf = Vec::with_capacity(HEADER_SIZE + self.data.len());
        buf.extend_from_slice(&header);
        buf.extend_from_slice(&self.data);
        Ok(buf)
    }
}
