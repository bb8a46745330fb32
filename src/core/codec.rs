//! # Packet Codec
//!
//! `tokio_util` codec for the packet wire format, for callers that drive the
//! protocol from an async runtime with [`Framed`](tokio_util::codec::Framed)
//! instead of polling a [`Connection`](crate::protocol::connection::Connection).
//!
//! Framing rules are identical to the connection's: the size field is adjusted
//! for the command id width, and a frame never consumes bytes past its own body.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use super::header::{PacketHeader, HEADER_SIZE};
use super::packet::Packet;
use crate::error::ProtocolError;

#[derive(Debug, Default, Clone, Copy)]
pub struct PacketCodec;

impl Decoder for PacketCodec {
    type Item = Packet;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < HEADER_SIZE {
            return Ok(None);
        }

        let mut raw = [0u8; HEADER_SIZE];
        raw.copy_from_slice(&src[..HEADER_SIZE]);
        let header = PacketHeader::from_wire(raw);

        let frame_len = HEADER_SIZE + usize::from(header.size);
        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        src.advance(HEADER_SIZE);
        let body = src.split_to(usize::from(header.size));
        Ok(Some(Packet::from_received(header, &body)))
    }
}

impl Encoder<Packet> for PacketCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: Packet, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let bytes = item.to_bytes()?;
        dst.extend_from_slice(&bytes);
        Ok(())
    }
}
