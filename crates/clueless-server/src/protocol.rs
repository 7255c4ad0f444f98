//! WebSocket protocol messages for Clue-Less.
//!
//! Every `ServerMessage` sent during a game is a request: the client must
//! answer with exactly one `ClientMessage`. Notifications are answered with
//! `Ack`, the options offer with `Choice`, a disproof poll with `Disprove`.

use clueless_core::{
    ActivePlayerChoice, Card, LocationName, Room, Solution, Suggestion, Suspect, TurnOptions,
    Weapon,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Why a client is receiving a `TurnStart`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProtocolRole {
    ActivePlayer,
    WaitingPlayer,
    Informational,
}

/// Sent once per player before the first turn. The hand is split by category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStart {
    pub character: Suspect,
    pub suspects: Vec<Suspect>,
    pub rooms: Vec<Room>,
    pub weapons: Vec<Weapon>,
    /// Suspects in turn order
    pub seating: Vec<Suspect>,
}

impl GameStart {
    pub fn new(character: Suspect, hand: &[Card], seating: Vec<Suspect>) -> Self {
        let mut start = Self {
            character,
            suspects: Vec::new(),
            rooms: Vec::new(),
            weapons: Vec::new(),
            seating,
        };
        for card in hand {
            match *card {
                Card::Suspect(s) => start.suspects.push(s),
                Card::Room(r) => start.rooms.push(r),
                Card::Weapon(w) => start.weapons.push(w),
            }
        }
        start
    }

    /// The hand as cards again
    pub fn hand(&self) -> Vec<Card> {
        self.suspects
            .iter()
            .map(|s| Card::Suspect(*s))
            .chain(self.rooms.iter().map(|r| Card::Room(*r)))
            .chain(self.weapons.iter().map(|w| Card::Weapon(*w)))
            .collect()
    }
}

/// Board status notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnStart {
    pub role: ProtocolRole,
    pub locations: BTreeMap<Suspect, LocationName>,
    pub announcement: Option<String>,
}

impl TurnStart {
    pub fn informational(
        locations: BTreeMap<Suspect, LocationName>,
        announcement: impl Into<String>,
    ) -> Self {
        Self {
            role: ProtocolRole::Informational,
            locations,
            announcement: Some(announcement.into()),
        }
    }
}

/// Options offered to the active player each action cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePlayerOptions {
    #[serde(flatten)]
    pub options: TurnOptions,
    /// Why the previous reply was rejected, if it was
    pub notice: Option<String>,
}

/// A card shown to the suggester
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disproof {
    pub disprover: Suspect,
    pub card: Card,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Connection accepted; not part of the game request/reply cycle
    Welcome { player_id: Uuid },

    /// Seated at a table; not part of the game request/reply cycle
    Seated { seat: usize, waiting_for: usize },

    /// Hand and character for this game
    GameStart(GameStart),

    /// Board status, with an optional announcement
    TurnStart(TurnStart),

    /// What the active player may do now
    ActivePlayerOptions(ActivePlayerOptions),

    /// Ask a waiting player to show one of `matching` against a suggestion.
    /// An empty `matching` means the player cannot disprove and must reply
    /// with no card.
    DisproofRequest {
        suggested_by: Suspect,
        suggestion: Suggestion,
        matching: Vec<Card>,
    },

    /// Private result of the active player's suggestion
    SuggestionOutcome {
        suggestion: Suggestion,
        disproof: Option<Disproof>,
    },

    /// Private result of a failed accusation: the envelope's contents
    AccusationFailed { solution: Solution },

    /// The game has ended
    GameOver {
        winner: Option<Suspect>,
        solution: Solution,
    },

    /// Error occurred
    Error { message: String },
}

impl ServerMessage {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::Welcome { .. } => "Welcome",
            ServerMessage::Seated { .. } => "Seated",
            ServerMessage::GameStart(_) => "GameStart",
            ServerMessage::TurnStart(_) => "TurnStart",
            ServerMessage::ActivePlayerOptions(_) => "ActivePlayerOptions",
            ServerMessage::DisproofRequest { .. } => "DisproofRequest",
            ServerMessage::SuggestionOutcome { .. } => "SuggestionOutcome",
            ServerMessage::AccusationFailed { .. } => "AccusationFailed",
            ServerMessage::GameOver { .. } => "GameOver",
            ServerMessage::Error { .. } => "Error",
        }
    }
}

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Take a seat at the waiting table
    Join { player_name: String },

    /// Acknowledge a notification
    Ack,

    /// Reply to `ActivePlayerOptions`
    Choice(ActivePlayerChoice),

    /// Reply to `DisproofRequest`
    Disprove { card: Option<Card> },
}

impl ClientMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Join { .. } => "Join",
            ClientMessage::Ack => "Ack",
            ClientMessage::Choice(_) => "Choice",
            ClientMessage::Disprove { .. } => "Disprove",
        }
    }
}
