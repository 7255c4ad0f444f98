//! Server configuration from the environment.

use crate::session::ProtocolConfig;
use clueless_core::{MAX_PLAYERS, MIN_PLAYERS};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("A table seats 3 to 6 players, got {0}")]
    PlayerCount(usize),

    #[error("{bots} bots would fill a table of {players}")]
    TooManyBots { bots: usize, players: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Seats per table
    pub players: usize,
    /// Seats taken by bots before anyone connects
    pub bots: usize,
    pub protocol: ProtocolConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = parse(&lookup, "SERVER_ADDR", "0.0.0.0:8080".parse().ok())?;
        let players: usize = parse(&lookup, "CLUELESS_PLAYERS", Some(MIN_PLAYERS))?;
        let bots: usize = parse(&lookup, "CLUELESS_BOTS", Some(0))?;
        let timeout_secs: u64 = parse(&lookup, "CLUELESS_REPLY_TIMEOUT_SECS", Some(120))?;
        let reveal = parse(&lookup, "CLUELESS_REVEAL_FAILED_ACCUSATIONS", Some(false))?;
        let max_violations = parse(&lookup, "CLUELESS_MAX_VIOLATIONS", Some(3))?;

        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(ConfigError::PlayerCount(players));
        }
        if bots >= players {
            return Err(ConfigError::TooManyBots { bots, players });
        }

        Ok(Self {
            addr,
            players,
            bots,
            protocol: ProtocolConfig {
                reply_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
                reveal_failed_accusations: reveal,
                max_violations_per_turn: max_violations,
            },
        })
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: Option<T>,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => default.ok_or(ConfigError::InvalidValue {
            key,
            value: String::new(),
        }),
    }
}
