//! # Command Tags
//!
//! Closed enumeration of the command ids carried in every packet header.
//!
//! The numeric values are part of the wire format and must never be reordered;
//! new commands are appended with a fresh id.

use crate::error::{ProtocolError, Result};
use std::fmt;

/// Identifies the semantic payload type of a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Command {
    Auth = 0,
    Token = 1,
    GameInfo = 2,
    Ping = 3,
    PingList = 4,
    Map = 5,
    MapRequest = 6,
    ObjectsList = 7,
    Scripts = 8,
    Heartbeat = 9,
    Chat = 10,
    Tick = 11,
    PlayerList = 12,
    PlayerInfo = 13,
    DisconnectMessage = 14,
    ShowError = 15,
    GroupList = 16,
    Event = 17,
    GameAction = 18,
    RequestGameState = 19,
    GameState = 20,
}

impl Command {
    /// Every command, in id order.
    pub const ALL: [Command; 21] = [
        Command::Auth,
        Command::Token,
        Command::GameInfo,
        Command::Ping,
        Command::PingList,
        Command::Map,
        Command::MapRequest,
        Command::ObjectsList,
        Command::Scripts,
        Command::Heartbeat,
        Command::Chat,
        Command::Tick,
        Command::PlayerList,
        Command::PlayerInfo,
        Command::DisconnectMessage,
        Command::ShowError,
        Command::GroupList,
        Command::Event,
        Command::GameAction,
        Command::RequestGameState,
        Command::GameState,
    ];

    /// Raw wire value
    #[inline]
    pub fn id(self) -> u16 {
        self as u16
    }

    /// Look up a command by its wire value
    pub fn from_id(id: u16) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    /// Whether the connection must be authorized before this command may be sent.
    ///
    /// The exempt commands are the ones needed to establish a session in the
    /// first place.
    pub fn requires_authorization(self) -> bool {
        !matches!(
            self,
            Command::Ping
                | Command::Auth
                | Command::Token
                | Command::GameInfo
                | Command::ObjectsList
                | Command::Scripts
                | Command::MapRequest
                | Command::Heartbeat
        )
    }

    /// Human-readable name, used in log fields
    pub fn name(self) -> &'static str {
        match self {
            Command::Auth => "AUTH",
            Command::Token => "TOKEN",
            Command::GameInfo => "GAME_INFO",
            Command::Ping => "PING",
            Command::PingList => "PING_LIST",
            Command::Map => "MAP",
            Command::MapRequest => "MAP_REQUEST",
            Command::ObjectsList => "OBJECTS_LIST",
            Command::Scripts => "SCRIPTS",
            Command::Heartbeat => "HEARTBEAT",
            Command::Chat => "CHAT",
            Command::Tick => "TICK",
            Command::PlayerList => "PLAYER_LIST",
            Command::PlayerInfo => "PLAYER_INFO",
            Command::DisconnectMessage => "DISCONNECT_MESSAGE",
            Command::ShowError => "SHOW_ERROR",
            Command::GroupList => "GROUP_LIST",
            Command::Event => "EVENT",
            Command::GameAction => "GAME_ACTION",
            Command::RequestGameState => "REQUEST_GAME_STATE",
            Command::GameState => "GAME_STATE",
        }
    }
}

impl TryFrom<u16> for Command {
    type Error = ProtocolError;

    fn try_from(id: u16) -> Result<Self> {
        Self::from_id(id).ok_or(ProtocolError::UnknownCommand(id))
    }
}

impl From<Command> for u16 {
    fn from(command: Command) -> Self {
        command.id()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_match_table_position() {
        for (index, command) in Command::ALL.iter().enumerate() {
            assert_eq!(usize::from(command.id()), index);
            assert_eq!(Command::from_id(command.id()), Some(*command));
        }
    }

    #[test]
    fn test_map_id_is_stable() {
        assert_eq!(Command::Map.id(), 5);
        assert_eq!(Command::try_from(5).ok(), Some(Command::Map));
    }

    #[test]
    fn test_unknown_id_rejected() {
        assert!(Command::from_id(Command::ALL.len() as u16).is_none());
        assert!(matches!(
            Command::try_from(0xFFFF),
            Err(ProtocolError::UnknownCommand(0xFFFF))
        ));
    }

    #[test]
    fn test_exempt_set_is_exact() {
        let exempt: Vec<Command> = Command::ALL
            .iter()
            .copied()
            .filter(|c| !c.requires_authorization())
            .collect();

        assert_eq!(
            exempt,
            vec![
                Command::Auth,
                Command::Token,
                Command::GameInfo,
                Command::Ping,
                Command::MapRequest,
                Command::ObjectsList,
                Command::Scripts,
                Command::Heartbeat,
            ]
        );
    }

    #[test]
    fn test_session_commands_require_authorization() {
        assert!(Command::Map.requires_authorization());
        assert!(Command::GameAction.requires_authorization());
        assert!(Command::Chat.requires_authorization());
    }
}
