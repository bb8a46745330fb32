//! `PacketCodec` driven through `Framed` over an in-process duplex pipe

#![allow(clippy::expect_used, clippy::unwrap_used)]

use futures::{SinkExt, StreamExt};
use netstream_protocol::core::codec::PacketCodec;
use netstream_protocol::core::command::Command;
use netstream_protocol::core::packet::Packet;
use netstream_protocol::protocol::connection::{AuthStatus, Connection, ReadStatus};
use netstream_protocol::transport::memory::MemoryTransport;
use tokio::io::AsyncWriteExt;
use tokio_util::codec::{Framed, FramedRead};

#[tokio::test]
async fn test_framed_roundtrip() {
    let (left, right) = tokio::io::duplex(64);
    let mut sender = Framed::new(left, PacketCodec);
    let mut receiver = Framed::new(right, PacketCodec);

    let mut chat = Packet::new(Command::Chat);
    chat.write_string("hello");
    chat.write_u32(42);

    let writer = tokio::spawn(async move {
        sender.send(chat).await.unwrap();
        sender
            .send(Packet::with_data(Command::Map, &[9; 200]))
            .await
            .unwrap();
        sender
    });

    let mut first = receiver.next().await.unwrap().unwrap();
    assert_eq!(first.command(), Some(Command::Chat));
    assert_eq!(first.read_string().unwrap(), "hello");
    assert_eq!(first.read_u32().unwrap(), 42);

    let second = receiver.next().await.unwrap().unwrap();
    assert_eq!(second.command(), Some(Command::Map));
    assert_eq!(second.data(), &[9; 200][..]);

    drop(writer.await.unwrap());
    assert!(receiver.next().await.is_none());
}

#[tokio::test]
async fn test_framed_reads_connection_output() {
    let mut connection = Connection::new(MemoryTransport::new().with_send_limit(3));
    connection.set_auth_status(AuthStatus::Ok);
    connection.queue_packet(Packet::with_data(Command::GameAction, &[1, 2, 3, 4]), false);
    connection.queue_packet(Packet::with_data(Command::Heartbeat, &[]), true);

    while connection.outbound_len() > 0 {
        connection.send_queued_packets().unwrap();
    }
    let wire = connection.transport_mut().take_outbound();

    let (mut writer, reader) = tokio::io::duplex(8);
    let feed = tokio::spawn(async move {
        for chunk in wire.chunks(5) {
            writer.write_all(chunk).await.unwrap();
        }
    });

    let mut frames = FramedRead::new(reader, PacketCodec);
    let first = frames.next().await.unwrap().unwrap();
    assert_eq!(first.command(), Some(Command::Heartbeat));
    assert!(first.is_empty());

    let second = frames.next().await.unwrap().unwrap();
    assert_eq!(second.command(), Some(Command::GameAction));
    assert_eq!(second.data(), &[1, 2, 3, 4]);

    feed.await.unwrap();
    assert!(frames.next().await.is_none());
}

#[tokio::test]
async fn test_connection_reads_codec_output() {
    let (left, mut right) = tokio::io::duplex(256);
    let mut sink = Framed::new(left, PacketCodec);

    let mut packet = Packet::new(Command::PlayerInfo);
    packet.write_u8(3);
    packet.write_string("runner");
    sink.send(packet).await.unwrap();

    let mut wire = vec![0u8; 4 + 1 + 7];
    tokio::io::AsyncReadExt::read_exact(&mut right, &mut wire)
        .await
        .unwrap();

    let mut transport = MemoryTransport::new();
    transport.push_inbound(&wire);
    let mut connection = Connection::new(transport);
    assert_eq!(connection.read_packet(), ReadStatus::Success);

    let inbound = connection.inbound_packet_mut();
    assert_eq!(inbound.read_u8().unwrap(), 3);
    assert_eq!(inbound.read_string().unwrap(), "runner");
}
