#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Edge-case tests through the public API
//! Covers the compatibility size adjustment, the authorization gate, queue
//! ordering under back-pressure and malformed payload handling

use netstream_protocol::core::command::Command;
use netstream_protocol::core::header::{PacketHeader, HEADER_SIZE, MAX_BODY_SIZE};
use netstream_protocol::core::packet::Packet;
use netstream_protocol::error::ProtocolError;
use netstream_protocol::protocol::connection::{AuthStatus, Connection, ReadStatus};
use netstream_protocol::protocol::stats::StatisticsGroup;
use netstream_protocol::transport::memory::MemoryTransport;
use netstream_protocol::utils::metrics::global_metrics;

// ============================================================================
// WIRE FORMAT EDGE CASES
// ============================================================================

#[test]
fn test_map_scenario_wire_bytes() {
    let mut packet = Packet::new(Command::Map);
    packet.write_string("abc");
    assert_eq!(packet.len(), 4);

    let bytes = packet.to_bytes().unwrap();
    assert_eq!(bytes, [0x00, 0x06, 0x00, 0x05, 0x61, 0x62, 0x63, 0x00]);

    let mut transport = MemoryTransport::new();
    transport.push_inbound(&bytes);
    let mut connection = Connection::new(transport);
    assert_eq!(connection.read_packet(), ReadStatus::Success);
    assert_eq!(connection.inbound_packet().command_id(), 5);
    assert_eq!(connection.inbound_packet().size(), 4);
    assert_eq!(connection.inbound_packet().data(), b"abc\0");
}

#[test]
fn test_largest_body_roundtrip() {
    let body = vec![0xAB; MAX_BODY_SIZE];
    let wire = Packet::with_data(Command::Map, &body).to_bytes().unwrap();
    assert_eq!(&wire[..2], &[0xFF, 0xFF]);

    let mut transport = MemoryTransport::new();
    transport.push_inbound(&wire);
    let mut connection = Connection::new(transport);

    let mut polls = 0;
    while connection.read_packet() != ReadStatus::Success {
        polls += 1;
        assert!(polls < 16, "reassembly stalled");
    }
    assert_eq!(connection.inbound_packet().len(), MAX_BODY_SIZE);
}

#[test]
fn test_body_one_past_limit_rejected() {
    let packet = Packet::with_data(Command::Map, &vec![0; MAX_BODY_SIZE + 1]);
    assert!(matches!(
        packet.to_bytes(),
        Err(ProtocolError::OversizedPacket(n)) if n == MAX_BODY_SIZE + 1
    ));
}

#[test]
fn test_header_parse_clamps_zero_size() {
    let header = PacketHeader::from_wire([0x00, 0x00, 0x00, 0x12]);
    assert_eq!(header.size, 0);
    assert_eq!(header.id, Command::GameAction.id());
}

#[test]
fn test_unknown_command_id_reassembled() {
    let mut transport = MemoryTransport::new();
    transport.push_inbound(&[0x00, 0x03, 0x12, 0x34, 0x7F]);
    let mut connection = Connection::new(transport);

    assert_eq!(connection.read_packet(), ReadStatus::Success);
    let packet = connection.inbound_packet();
    assert_eq!(packet.command_id(), 0x1234);
    assert!(packet.command().is_none());
    assert_eq!(packet.data(), &[0x7F]);
    assert_eq!(
        connection.stats().bytes_received(StatisticsGroup::Base),
        (HEADER_SIZE + 1) as u64
    );
}

// ============================================================================
// MALFORMED PAYLOADS
// ============================================================================

#[test]
fn test_decoder_recovers_from_unterminated_string() {
    let mut transport = MemoryTransport::new();
    let mut packet = Packet::new(Command::Chat);
    packet.write_u16(3);
    packet.write(b"abc");
    transport.push_inbound(&packet.to_bytes().unwrap());

    let mut connection = Connection::new(transport);
    assert_eq!(connection.read_packet(), ReadStatus::Success);

    let inbound = connection.inbound_packet_mut();
    assert_eq!(inbound.read_u16().unwrap(), 3);
    assert!(matches!(
        inbound.read_string(),
        Err(ProtocolError::MalformedString)
    ));
    assert_eq!(inbound.bytes_read(), 2);
    assert_eq!(inbound.read(3).unwrap(), b"abc");
}

#[test]
fn test_read_string_on_empty_body() {
    let mut packet = Packet::new(Command::Chat);
    assert!(packet.read_string().is_err());
    assert_eq!(packet.bytes_read(), 0);
}

#[test]
fn test_typed_read_past_end() {
    let mut packet = Packet::with_data(Command::Tick, &[1, 2, 3]);
    assert!(matches!(
        packet.read_u32(),
        Err(ProtocolError::InsufficientData {
            requested: 4,
            available: 3
        })
    ));
    assert_eq!(packet.read_u16().unwrap(), 0x0102);
}

// ============================================================================
// AUTHORIZATION GATE
// ============================================================================

#[test]
fn test_gate_covers_every_non_exempt_command() {
    let exempt = [
        Command::Ping,
        Command::Auth,
        Command::Token,
        Command::GameInfo,
        Command::ObjectsList,
        Command::Scripts,
        Command::MapRequest,
        Command::Heartbeat,
    ];

    let mut connection = Connection::new(MemoryTransport::new());
    for command in Command::ALL {
        let queued = connection.queue_packet(Packet::new(command), false);
        assert_eq!(queued, exempt.contains(&command), "{command}");
    }
    assert_eq!(connection.outbound_len(), exempt.len());
}

#[test]
fn test_gate_drops_counted_in_metrics() {
    let before = global_metrics().snapshot().packets_dropped_unauthorized;

    let mut connection = Connection::new(MemoryTransport::new());
    connection.queue_packet(Packet::new(Command::Chat), false);
    connection.queue_packet(Packet::new(Command::Map), true);

    let after = global_metrics().snapshot().packets_dropped_unauthorized;
    assert!(after >= before + 2);
}

#[test]
fn test_authorization_applies_only_to_future_packets() {
    let mut connection = Connection::new(MemoryTransport::new());
    assert!(!connection.queue_packet(Packet::new(Command::Chat), false));

    connection.set_auth_status(AuthStatus::Ok);
    assert!(connection.queue_packet(Packet::new(Command::Chat), false));

    connection.set_auth_status(AuthStatus::BadPassword);
    assert!(!connection.queue_packet(Packet::new(Command::Chat), false));
    assert_eq!(connection.outbound_len(), 1);
}

// ============================================================================
// QUEUE ORDERING UNDER BACK-PRESSURE
// ============================================================================

#[test]
fn test_interleaved_priority_and_partial_sends() {
    let mut connection = Connection::new(MemoryTransport::new().with_send_limit(5));
    connection.set_auth_status(AuthStatus::Ok);

    connection.queue_packet(Packet::with_data(Command::Map, &[1; 12]), false);
    connection.queue_packet(Packet::with_data(Command::Chat, &[2; 3]), false);

    // 5 of the map packet's 16 bytes go out
    connection.send_queued_packets().unwrap();
    connection.queue_packet(Packet::with_data(Command::Ping, &[3; 1]), true);
    connection.queue_packet(Packet::with_data(Command::Heartbeat, &[4; 1]), true);

    let order: Vec<_> = connection.queued_packets().filter_map(Packet::command).collect();
    assert_eq!(
        order,
        vec![Command::Map, Command::Heartbeat, Command::Ping, Command::Chat]
    );

    while connection.outbound_len() > 0 {
        connection.send_queued_packets().unwrap();
    }

    let mut expected = Vec::new();
    expected.extend(Packet::with_data(Command::Map, &[1; 12]).to_bytes().unwrap());
    expected.extend(Packet::with_data(Command::Heartbeat, &[4; 1]).to_bytes().unwrap());
    expected.extend(Packet::with_data(Command::Ping, &[3; 1]).to_bytes().unwrap());
    expected.extend(Packet::with_data(Command::Chat, &[2; 3]).to_bytes().unwrap());
    assert_eq!(connection.transport().outbound(), expected.as_slice());
}

#[test]
fn test_flush_on_closed_socket_keeps_queue() {
    let mut connection = Connection::new(MemoryTransport::new());
    connection.queue_packet(Packet::new(Command::Ping), false);
    connection.transport_mut().close();

    connection.send_queued_packets().unwrap();
    assert_eq!(connection.outbound_len(), 1);
    assert!(!connection.is_valid());
}

#[test]
fn test_sent_statistics_by_group() {
    let mut connection = Connection::new(MemoryTransport::new());
    connection.set_auth_status(AuthStatus::Ok);

    connection.queue_packet(Packet::with_data(Command::GameAction, &[0; 6]), false);
    connection.queue_packet(Packet::with_data(Command::Map, &[0; 10]), false);
    connection.queue_packet(Packet::with_data(Command::Chat, &[0; 2]), false);
    connection.send_queued_packets().unwrap();

    let stats = connection.stats();
    assert_eq!(stats.bytes_sent(StatisticsGroup::Commands), 10);
    assert_eq!(stats.bytes_sent(StatisticsGroup::MapData), 14);
    assert_eq!(stats.bytes_sent(StatisticsGroup::Base), 6);
    assert_eq!(stats.bytes_sent(StatisticsGroup::Total), 30);
    assert_eq!(stats.bytes_received(StatisticsGroup::Total), 0);
}
