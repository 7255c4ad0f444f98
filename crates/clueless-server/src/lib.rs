//! Clue-Less server: drives games over player connections.
//!
//! Each game runs on its own task as a [`game::GameProtocol`]. Every message
//! to a player is a request answered by exactly one reply; broadcasts are
//! barriers that wait for every seat before the game moves on.

pub mod accusation;
pub mod broadcast;
pub mod config;
pub mod connection;
pub mod game;
pub mod protocol;
pub mod server;
pub mod session;
pub mod suggestion;
pub mod table;
pub mod turn;

#[cfg(test)]
mod testing;

pub use connection::{BotConnection, ChannelConnection, ConnectionError, PlayerConnection};
pub use game::{GameProtocol, GameSummary};
pub use session::ProtocolConfig;
