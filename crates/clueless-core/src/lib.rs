//! Clue-Less - the board and turn rules of a networked deduction game
//!
//! This crate provides the core game logic for Clue-Less, including:
//! - The mansion board: rooms, single-occupancy hallways, home squares
//! - Cards, the sealed solution and the deal
//! - Per-turn action gating (move / suggest / accuse)
//! - Game state machine with suggestion and accusation resolution
//!
//! # Architecture
//!
//! The engine performs no I/O. The server crate owns the player connections
//! and drives a `GameState` through each turn, broadcasting the results.
//!
//! # Modules
//!
//! - [`board`]: Suspects, weapons, rooms, locations and the board graph
//! - [`cards`]: Cards, solution and dealing
//! - [`actions`]: Suggestions, accusations, turn options and events
//! - [`turn`]: Per-turn state and the action gateway
//! - [`player`]: Players and their notebooks
//! - [`game`]: Game state machine
//! - [`bot`]: Notebook-driven bots

pub mod actions;
pub mod board;
pub mod bot;
pub mod cards;
pub mod game;
pub mod player;
pub mod turn;

// Re-export commonly used types
pub use actions::{Accusation, ActivePlayerChoice, GameEvent, Suggestion, TurnOptions};
pub use board::{Board, Hallway, Location, LocationKind, LocationName, Room, Suspect, Weapon};
pub use bot::{Bot, BotDifficulty};
pub use cards::{Card, Deal, Solution};
pub use game::{GameError, GamePhase, GameState, PlayerId, MAX_PLAYERS, MIN_PLAYERS};
pub use player::{Notebook, Player};
pub use turn::TurnState;
