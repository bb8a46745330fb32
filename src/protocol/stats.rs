//! Per-connection traffic statistics.
//!
//! Every fully sent or received packet is attributed to one
//! [`StatisticsGroup`] by its command and also to [`StatisticsGroup::Total`].

use crate::core::command::Command;

/// Traffic category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatisticsGroup {
    Total,
    Base,
    Commands,
    MapData,
}

impl StatisticsGroup {
    pub const COUNT: usize = 4;

    pub const ALL: [StatisticsGroup; Self::COUNT] = [
        StatisticsGroup::Total,
        StatisticsGroup::Base,
        StatisticsGroup::Commands,
        StatisticsGroup::MapData,
    ];

    #[inline]
    fn index(self) -> usize {
        match self {
            StatisticsGroup::Total => 0,
            StatisticsGroup::Base => 1,
            StatisticsGroup::Commands => 2,
            StatisticsGroup::MapData => 3,
        }
    }

    /// Category for a packet's command. Unknown ids count as base traffic.
    pub fn classify(command: Option<Command>) -> Self {
        let Some(command) = command else {
            return StatisticsGroup::Base;
        };

        // No wildcard arm: a new command must be placed explicitly.
        match command {
            Command::GameAction => StatisticsGroup::Commands,
            Command::Map => StatisticsGroup::MapData,
            Command::Auth
            | Command::Token
            | Command::GameInfo
            | Command::Ping
            | Command::PingList
            | Command::MapRequest
            | Command::ObjectsList
            | Command::Scripts
            | Command::Heartbeat
            | Command::Chat
            | Command::Tick
            | Command::PlayerList
            | Command::PlayerInfo
            | Command::DisconnectMessage
            | Command::ShowError
            | Command::GroupList
            | Command::Event
            | Command::RequestGameState
            | Command::GameState => StatisticsGroup::Base,
        }
    }
}

/// Direction of a completed transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkStats {
    bytes_sent: [u64; StatisticsGroup::COUNT],
    bytes_received: [u64; StatisticsGroup::COUNT],
}

impl NetworkStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `bytes` to the command's group and to the total
    pub fn record(&mut self, command: Option<Command>, bytes: usize, direction: Direction) {
        let group = StatisticsGroup::classify(command);
        let counters = match direction {
            Direction::Sent => &mut self.bytes_sent,
            Direction::Received => &mut self.bytes_received,
        };

        counters[group.index()] += bytes as u64;
        counters[StatisticsGroup::Total.index()] += bytes as u64;
    }

    pub fn bytes_sent(&self, group: StatisticsGroup) -> u64 {
        self.bytes_sent[group.index()]
    }

    pub fn bytes_received(&self, group: StatisticsGroup) -> u64 {
        self.bytes_received[group.index()]
    }
}
