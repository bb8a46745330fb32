//! # Transport Layer
//!
//! The narrow socket contract a [`Connection`](crate::protocol::connection::Connection)
//! drives, plus two adapters.
//!
//! ## Contract
//! - `receive` never blocks: it returns data, [`Received::WouldBlock`] or
//!   [`Received::Disconnected`]. Partial reads are normal.
//! - `send` never blocks: it returns how many bytes were accepted, where 0 means
//!   "try again later".
//! - `status` reports whether the socket is still connected.
//!
//! ## Adapters
//! - **Memory**: scripted in-memory peer for tests and simulations
//! - **TCP**: non-blocking adapter over `tokio::net::TcpStream`

pub mod memory;
pub mod tcp;

/// Outcome of a single non-blocking receive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Received {
    /// `n` bytes were written into the buffer
    Data(usize),
    /// Nothing available right now
    WouldBlock,
    /// The peer went away
    Disconnected,
}

/// Connection state reported by a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketStatus {
    Connected,
    NotConnected,
}

/// Non-blocking byte-stream socket
pub trait Transport {
    /// Read at most `buf.len()` bytes
    fn receive(&mut self, buf: &mut [u8]) -> Received;

    /// Write as much of `buf` as the socket accepts right now
    fn send(&mut self, buf: &[u8]) -> usize;

    fn status(&self) -> SocketStatus;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn receive(&mut self, buf: &mut [u8]) -> Received {
        (**self).receive(buf)
    }

    fn send(&mut self, buf: &[u8]) -> usize {
        (**self).send(buf)
    }

    fn status(&self) -> SocketStatus {
        (**self).status()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn receive(&mut self, buf: &mut [u8]) -> Received {
        (**self).receive(buf)
    }

    fn send(&mut self, buf: &[u8]) -> usize {
        (**self).send(buf)
    }

    fn status(&self) -> SocketStatus {
        (**self).status()
    }
}
