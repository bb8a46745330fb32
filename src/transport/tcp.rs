//! TCP Transport Layer
//!
//! Non-blocking adapter over a `tokio::net::TcpStream`.
//!
//! The connection's poll loop is synchronous, so this adapter only uses the
//! stream's `try_read`/`try_write` calls, which never wait. An async driver can
//! await [`TcpTransport::readable`] or [`TcpTransport::writable`] between steps
//! instead of spinning.
//!
//! The stream must be created inside a Tokio runtime.

use std::io;
use std::net::SocketAddr;

use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::{debug, instrument};

use super::{Received, SocketStatus, Transport};
use crate::error::constants::ERR_SOCKET_NOT_CONNECTED;
use crate::error::{ProtocolError, Result};

#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
    connected: bool,
}

impl TcpTransport {
    /// Wrap an established stream. Nagle's algorithm is disabled so small
    /// packets go out immediately.
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        stream.set_nodelay(true)?;
        Ok(Self {
            stream,
            connected: true,
        })
    }

    /// Connect to a remote peer
    #[instrument(skip(addr))]
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        debug!(peer = ?stream.peer_addr().ok(), "TCP transport connected");
        Self::from_stream(stream)
    }

    pub fn peer_addr(&self) -> Result<SocketAddr> {
        self.stream
            .peer_addr()
            .map_err(|e| ProtocolError::TransportError(format!("{ERR_SOCKET_NOT_CONNECTED}: {e}")))
    }

    /// Wait until a receive is likely to make progress
    pub async fn readable(&self) -> Result<()> {
        self.stream.readable().await.map_err(ProtocolError::Io)
    }

    /// Wait until a send is likely to make progress
    pub async fn writable(&self) -> Result<()> {
        self.stream.writable().await.map_err(ProtocolError::Io)
    }

    pub fn into_inner(self) -> TcpStream {
        self.stream
    }

    fn mark_disconnected(&mut self, error: Option<&io::Error>) {
        if self.connected {
            debug!(error = ?error, "TCP transport disconnected");
        }
        self.connected = false;
    }
}

impl Transport for TcpTransport {
    fn receive(&mut self, buf: &mut [u8]) -> Received {
        if !self.connected {
            return Received::Disconnected;
        }

        match self.stream.try_read(buf) {
            Ok(0) if !buf.is_empty() => {
                self.mark_disconnected(None);
                Received::Disconnected
            }
            Ok(n) => Received::Data(n),
            Err(e)
                if e.kind() == io::ErrorKind::WouldBlock
                    || e.kind() == io::ErrorKind::Interrupted =>
            {
                Received::WouldBlock
            }
            Err(e) => {
                self.mark_disconnected(Some(&e));
                Received::Disconnected
            }
        }
    }

    fn send(&mut self, buf: &[u8]) -> usize {
        if !self.connected {
            return 0;
        }

        match self.stream.try_write(buf) {
            Ok(n) => n,
            Err(e)
                if e.kind() == io::ErrorKind::WouldBlock
                    || e.kind() == io::ErrorKind::Interrupted =>
            {
                0
            }
            Err(e) => {
                self.mark_disconnected(Some(&e));
                0
            }
        }
    }

    fn status(&self) -> SocketStatus {
        if self.connected {
            SocketStatus::Connected
        } else {
            SocketStatus::NotConnected
        }
    }
}
