//! Outbound packet queue.
//!
//! FIFO with one exception: priority packets jump ahead, but never in front of
//! a packet whose transmission has already started. Resuming a half-sent packet
//! from the wrong offset would corrupt the stream.

use std::collections::VecDeque;

use crate::core::packet::Packet;

#[derive(Debug, Default)]
pub struct OutboundQueue {
    packets: VecDeque<Packet>,
}

impl OutboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, packet: Packet) {
        self.packets.push_back(packet);
    }

    /// Insert at the front, or second if the front packet is mid-send
    pub fn push_priority(&mut self, packet: Packet) {
        match self.packets.front() {
            Some(front) if front.bytes_transferred() > 0 => self.packets.insert(1, packet),
            _ => self.packets.push_front(packet),
        }
    }

    pub fn front_mut(&mut self) -> Option<&mut Packet> {
        self.packets.front_mut()
    }

    pub fn pop_front(&mut self) -> Option<Packet> {
        self.packets.pop_front()
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Packet> {
        self.packets.iter()
    }

    pub fn clear(&mut self) {
        self.packets.clear();
    }
}
