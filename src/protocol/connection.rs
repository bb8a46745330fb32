//! # Connection
//!
//! Drives one non-blocking [`Transport`]: reassembles inbound packets from
//! arbitrarily fragmented reads, sends queued packets without ever corrupting
//! one that is half-written, and tracks authorization, liveness and traffic.
//!
//! Everything is poll-driven from a single owning loop. No call blocks; a
//! transport with nothing to offer yields [`ReadStatus::MoreData`] or an
//! incomplete send, and the loop tries again on its next iteration.
//!
//! ## Inbound
//! [`Connection::read_packet`] moves the inbound packet through
//! header → body → complete, at most one transport read per phase and call.
//! Reads are capped to what the current packet still needs, so bytes of the
//! following packet are never consumed early. A completed packet stays in place
//! until the caller clears it with [`Connection::clear_inbound`].
//!
//! ## Example
//! ```rust
//! use netstream_protocol::core::command::Command;
//! use netstream_protocol::core::packet::Packet;
//! use netstream_protocol::protocol::connection::{Connection, ReadStatus};
//! use netstream_protocol::transport::memory::MemoryTransport;
//!
//! let mut transport = MemoryTransport::new();
//! transport.push_inbound(&[0x00, 0x06, 0x00, 0x05, b'a', b'b', b'c', 0x00]);
//!
//! let mut connection = Connection::new(&mut transport);
//! assert_eq!(connection.read_packet(), ReadStatus::Success);
//!
//! let packet = connection.inbound_packet_mut();
//! assert_eq!(packet.command(), Some(Command::Map));
//! assert_eq!(packet.read_string().unwrap(), "abc");
//! connection.clear_inbound();
//!
//! connection.queue_packet(Packet::new(Command::Ping), false);
//! connection.send_queued_packets().unwrap();
//! assert_eq!(connection.outbound_len(), 0);
//! ```

use tracing::{debug, trace, warn};

use crate::config::{ConnectionConfig, RECEIVE_CHUNK_SIZE};
use crate::core::packet::Packet;
use crate::error::{ProtocolError, Result};
use crate::protocol::disconnect::{DisconnectReason, FormatArg, MessageFormatter};
use crate::protocol::queue::OutboundQueue;
use crate::protocol::stats::{Direction, NetworkStats};
use crate::transport::{Received, SocketStatus, Transport};
use crate::utils::metrics::global_metrics;
use crate::utils::time::{Clock, MonotonicClock};

/// Result of one [`Connection::read_packet`] step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// The inbound packet is complete
    Success,
    /// No complete packet yet; call again later
    MoreData,
    /// The transport reported the peer gone
    Disconnected,
}

/// Outcome of the session handshake, set by the layer above.
///
/// Only [`AuthStatus::Ok`] opens the outbound authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    None,
    Requested,
    Ok,
    BadVersion,
    BadName,
    BadPassword,
    VerificationFailure,
    Full,
    RequirePassword,
    Verified,
    UnknownKeyDisallowed,
}

#[derive(Debug)]
pub struct Connection<T: Transport, C: Clock = MonotonicClock> {
    transport: T,
    clock: C,
    config: ConnectionConfig,
    inbound: Packet,
    outbound: OutboundQueue,
    auth_status: AuthStatus,
    should_disconnect: bool,
    last_packet_time: u64,
    disconnect_reason: Option<DisconnectReason>,
    stats: NetworkStats,
    /// Scratch space for body reads, sized once from the config
    receive_buf: Box<[u8]>,
}

impl<T: Transport> Connection<T, MonotonicClock> {
    /// Create a connection with default settings
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ConnectionConfig::default())
    }

    pub fn with_config(transport: T, config: ConnectionConfig) -> Self {
        Self::with_clock(transport, config, MonotonicClock::new())
    }
}

impl<T: Transport, C: Clock> Connection<T, C> {
    /// Create a connection that reads time from `clock`
    pub fn with_clock(transport: T, config: ConnectionConfig, clock: C) -> Self {
        let chunk_size = config.receive_chunk_size.clamp(1, RECEIVE_CHUNK_SIZE);
        if chunk_size != config.receive_chunk_size {
            warn!(
                configured = config.receive_chunk_size,
                applied = chunk_size,
                "Receive chunk size out of range, clamping"
            );
        }
        let receive_buf = vec![0u8; chunk_size].into_boxed_slice();
        let last_packet_time = clock.now_ms();
        global_metrics().connection_opened();

        Self {
            transport,
            clock,
            config,
            inbound: Packet::default(),
            outbound: OutboundQueue::new(),
            auth_status: AuthStatus::None,
            should_disconnect: false,
            last_packet_time,
            disconnect_reason: None,
            stats: NetworkStats::new(),
            receive_buf,
        }
    }

    // ---------------------------------------------------------------------
    // Inbound
    // ---------------------------------------------------------------------

    /// Advance reassembly of the inbound packet by at most one header read and
    /// one body read.
    ///
    /// Calling this again after `Success` without clearing the inbound packet
    /// reports the same packet again.
    pub fn read_packet(&mut self) -> ReadStatus {
        if !self.inbound.header_complete() {
            let buf = self.inbound.missing_header();
            let wanted = buf.len();
            match self.transport.receive(buf) {
                Received::Data(n) => self.inbound.commit_header(n.min(wanted)),
                Received::WouldBlock => return ReadStatus::MoreData,
                Received::Disconnected => return ReadStatus::Disconnected,
            }

            if !self.inbound.header_complete() {
                return ReadStatus::MoreData;
            }

            trace!(
                command_id = self.inbound.command_id(),
                size = self.inbound.size(),
                "Packet header received"
            );
        }

        let missing = self.inbound.missing_body();
        if missing > 0 {
            let wanted = missing.min(self.receive_buf.len());
            match self.transport.receive(&mut self.receive_buf[..wanted]) {
                Received::Data(n) => {
                    let n = n.min(wanted);
                    self.inbound.append_received(&self.receive_buf[..n]);
                }
                Received::WouldBlock => return ReadStatus::MoreData,
                Received::Disconnected => return ReadStatus::Disconnected,
            }
        }

        if self.inbound.body_complete() {
            self.last_packet_time = self.clock.now_ms();
            self.record_received();
            return ReadStatus::Success;
        }

        ReadStatus::MoreData
    }

    /// The packet being reassembled, complete after `read_packet` returned `Success`
    pub fn inbound_packet(&self) -> &Packet {
        &self.inbound
    }

    /// Mutable access for moving the read cursor over a completed packet
    pub fn inbound_packet_mut(&mut self) -> &mut Packet {
        &mut self.inbound
    }

    /// Recycle the inbound packet for the next message
    pub fn clear_inbound(&mut self) {
        self.inbound.clear();
    }

    fn record_received(&mut self) {
        let bytes = self.inbound.bytes_transferred();
        self.stats
            .record(self.inbound.command(), bytes, Direction::Received);
        global_metrics().packet_received(bytes as u64);

        trace!(
            command_id = self.inbound.command_id(),
            bytes,
            "Packet received"
        );
    }

    // ---------------------------------------------------------------------
    // Outbound
    // ---------------------------------------------------------------------

    /// Make one send attempt for `packet`, resuming after the bytes already sent.
    ///
    /// Returns `Ok(true)` once the whole packet is on the wire.
    pub fn send_packet(&mut self, packet: &mut Packet) -> Result<bool> {
        transmit(&mut self.transport, &mut self.stats, packet)
    }

    /// Queue a packet for [`Self::send_queued_packets`].
    ///
    /// Packets that need authorization are dropped while the connection is not
    /// authorized; the return value tells whether the packet was queued.
    /// With `front` set the packet jumps the queue, landing behind the head
    /// only when the head is already partially sent.
    pub fn queue_packet(&mut self, packet: Packet, front: bool) -> bool {
        if packet.requires_authorization() && !self.is_authorized() {
            debug!(
                command_id = packet.command_id(),
                auth_status = ?self.auth_status,
                "Dropping packet queued before authorization"
            );
            global_metrics().packet_dropped_unauthorized();
            return false;
        }

        if front {
            self.outbound.push_priority(packet);
        } else {
            self.outbound.push_back(packet);
        }
        true
    }

    /// Send queued packets in order until one cannot be completed.
    ///
    /// A packet too large for the wire format is removed from the queue and
    /// reported as an error; packets behind it stay queued.
    pub fn send_queued_packets(&mut self) -> Result<()> {
        while let Some(front) = self.outbound.front_mut() {
            match transmit(&mut self.transport, &mut self.stats, front) {
                Ok(true) => {
                    self.outbound.pop_front();
                }
                Ok(false) => break,
                Err(e @ ProtocolError::OversizedPacket(_)) => {
                    warn!(
                        command_id = front.command_id(),
                        size = front.len(),
                        "Discarding packet too large to send"
                    );
                    self.outbound.pop_front();
                    return Err(e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    pub fn outbound_len(&self) -> usize {
        self.outbound.len()
    }

    /// Queued packets in send order
    pub fn queued_packets(&self) -> impl Iterator<Item = &Packet> {
        self.outbound.iter()
    }

    // ---------------------------------------------------------------------
    // Authorization
    // ---------------------------------------------------------------------

    pub fn auth_status(&self) -> AuthStatus {
        self.auth_status
    }

    pub fn set_auth_status(&mut self, status: AuthStatus) {
        debug!(from = ?self.auth_status, to = ?status, "Auth status changed");
        self.auth_status = status;
    }

    pub fn is_authorized(&self) -> bool {
        self.auth_status == AuthStatus::Ok
    }

    // ---------------------------------------------------------------------
    // Liveness and teardown
    // ---------------------------------------------------------------------

    pub fn reset_last_packet_time(&mut self) {
        self.last_packet_time = self.clock.now_ms();
    }

    /// Tick of the last complete inbound packet (or of the last reset)
    pub fn last_packet_time(&self) -> u64 {
        self.last_packet_time
    }

    /// False once the peer has been silent longer than the liveness timeout.
    /// Always true when liveness enforcement is off.
    pub fn received_packet_recently(&self) -> bool {
        if !self.config.enforce_liveness {
            return true;
        }

        let timeout = self.config.liveness_timeout.as_millis() as u64;
        self.clock.now_ms() <= self.last_packet_time.saturating_add(timeout)
    }

    /// Ask for the connection to be torn down. Sticky; in-progress work is not
    /// interrupted, the driving loop should stop once `is_valid` turns false.
    pub fn disconnect(&mut self) {
        if !self.should_disconnect {
            debug!(pending_outbound = self.outbound.len(), "Disconnect requested");
            global_metrics().disconnect_requested();
        }
        self.should_disconnect = true;
    }

    /// Usable while no disconnect was requested and the socket is connected
    pub fn is_valid(&self) -> bool {
        !self.should_disconnect && self.transport.status() == SocketStatus::Connected
    }

    pub fn last_disconnect_reason(&self) -> Option<&str> {
        self.disconnect_reason.as_ref().map(DisconnectReason::as_str)
    }

    /// Store a reason, truncated to the configured capacity. `None` clears it.
    pub fn set_last_disconnect_reason(&mut self, reason: Option<&str>) {
        self.disconnect_reason = reason
            .map(|text| DisconnectReason::new(text, self.config.disconnect_reason_capacity));
    }

    /// Store a reason rendered by `formatter`
    pub fn set_last_disconnect_reason_formatted<F>(
        &mut self,
        formatter: &F,
        message_id: u16,
        args: &[FormatArg<'_>],
    ) where
        F: MessageFormatter + ?Sized,
    {
        let text = formatter.format(message_id, args);
        self.set_last_disconnect_reason(Some(&text));
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn stats(&self) -> &NetworkStats {
        &self.stats
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Largest body read issued to the transport, after clamping the configured value
    pub fn receive_chunk_size(&self) -> usize {
        self.receive_buf.len()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

impl<T: Transport, C: Clock> Drop for Connection<T, C> {
    fn drop(&mut self) {
        global_metrics().connection_closed();
    }
}

/// One send attempt for `packet`; records stats when this attempt completes it.
fn transmit<T: Transport>(
    transport: &mut T,
    stats: &mut NetworkStats,
    packet: &mut Packet,
) -> Result<bool> {
    let wire = packet.finalize()?;
    let offset = packet.bytes_transferred();
    if offset >= wire.len() {
        return Ok(true);
    }

    let pending = &wire[offset..];
    let sent = transport.send(pending).min(pending.len());
    packet.advance_sent(sent);

    let complete = packet.bytes_transferred() == wire.len();
    if complete {
        stats.record(packet.command(), wire.len(), Direction::Sent);
        global_metrics().packet_sent(wire.len() as u64);
        trace!(
            command_id = packet.command_id(),
            bytes = wire.len(),
            "Packet sent"
        );
    }
    Ok(complete)
}
