//! In-memory transport
//!
//! A scripted peer: inbound bytes are queued as chunks, outbound bytes are
//! captured. Optional caps on how many bytes a single receive or send may move
//! simulate fragmentation and a congested socket.
//!
//! ```rust
//! use netstream_protocol::transport::memory::MemoryTransport;
//! use netstream_protocol::transport::{Received, Transport};
//!
//! let mut transport = MemoryTransport::new().with_receive_limit(2);
//! transport.push_inbound(&[1, 2, 3]);
//!
//! let mut buf = [0u8; 8];
//! assert_eq!(transport.receive(&mut buf), Received::Data(2));
//! assert_eq!(transport.receive(&mut buf), Received::Data(1));
//! assert_eq!(transport.receive(&mut buf), Received::WouldBlock);
//! ```

use std::collections::VecDeque;

use super::{Received, SocketStatus, Transport};

#[derive(Debug, Default)]
pub struct MemoryTransport {
    inbound: VecDeque<Vec<u8>>,
    outbound: Vec<u8>,
    receive_limit: Option<usize>,
    send_limit: Option<usize>,
    /// Bytes `send` will still accept before reporting a full socket
    send_budget: Option<usize>,
    closed: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap every receive at `limit` bytes
    pub fn with_receive_limit(mut self, limit: usize) -> Self {
        self.receive_limit = Some(limit.max(1));
        self
    }

    /// Cap every send at `limit` bytes
    pub fn with_send_limit(mut self, limit: usize) -> Self {
        self.send_limit = Some(limit.max(1));
        self
    }

    /// Queue bytes for the next receives. Each call is a separate chunk and a
    /// single receive never spans two chunks.
    pub fn push_inbound(&mut self, bytes: &[u8]) {
        if !bytes.is_empty() {
            self.inbound.push_back(bytes.to_vec());
        }
    }

    /// Limit the total number of bytes accepted by future sends.
    /// `None` removes the limit.
    pub fn set_send_budget(&mut self, budget: Option<usize>) {
        self.send_budget = budget;
    }

    /// Everything sent so far
    pub fn outbound(&self) -> &[u8] {
        &self.outbound
    }

    /// Take and reset the captured outbound bytes
    pub fn take_outbound(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.outbound)
    }

    pub fn pending_inbound(&self) -> usize {
        self.inbound.iter().map(Vec::len).sum()
    }

    /// Simulate the peer closing the socket
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl Transport for MemoryTransport {
    fn receive(&mut self, buf: &mut [u8]) -> Received {
        let Some(chunk) = self.inbound.front_mut() else {
            return if self.closed {
                Received::Disconnected
            } else {
                Received::WouldBlock
            };
        };

        let mut len = chunk.len().min(buf.len());
        if let Some(limit) = self.receive_limit {
            len = len.min(limit);
        }
        if len == 0 {
            return Received::WouldBlock;
        }

        buf[..len].copy_from_slice(&chunk[..len]);
        chunk.drain(..len);
        if chunk.is_empty() {
            self.inbound.pop_front();
        }
        Received::Data(len)
    }

    fn send(&mut self, buf: &[u8]) -> usize {
        if self.closed {
            return 0;
        }

        let mut len = buf.len();
        if let Some(limit) = self.send_limit {
            len = len.min(limit);
        }
        if let Some(budget) = self.send_budget.as_mut() {
            len = len.min(*budget);
            *budget -= len;
        }

        self.outbound.extend_from_slice(&buf[..len]);
        len
    }

    fn status(&self) -> SocketStatus {
        if self.closed {
            SocketStatus::NotConnected
        } else {
            SocketStatus::Connected
        }
    }
}
