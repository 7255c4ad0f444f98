//! Actions the active player can take and the events they produce.
//!
//! This module defines the suggestion/accusation triples, the options
//! offered to the active player at each decision point, the single choice
//! they reply with, and the events that result from resolving it.

use crate::board::{LocationName, Room, Suspect, Weapon};
use crate::cards::{Card, Solution};
use crate::game::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A claim made from inside a room, open to disproof
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub suspect: Suspect,
    pub room: Room,
    pub weapon: Weapon,
}

impl Suggestion {
    pub fn new(suspect: Suspect, room: Room, weapon: Weapon) -> Self {
        Self {
            suspect,
            room,
            weapon,
        }
    }

    /// The three cards a waiting player could disprove with
    pub fn cards(&self) -> [Card; 3] {
        [
            Card::Suspect(self.suspect),
            Card::Room(self.room),
            Card::Weapon(self.weapon),
        ]
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in the {} with the {}", self.suspect, self.room, self.weapon)
    }
}

/// A claim checked against the sealed solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accusation {
    pub suspect: Suspect,
    pub room: Room,
    pub weapon: Weapon,
}

impl Accusation {
    pub fn new(suspect: Suspect, room: Room, weapon: Weapon) -> Self {
        Self {
            suspect,
            room,
            weapon,
        }
    }

    pub fn is_correct(&self, solution: &Solution) -> bool {
        solution.matches(self.suspect, self.room, self.weapon)
    }
}

impl From<Solution> for Accusation {
    fn from(solution: Solution) -> Self {
        Self::new(solution.suspect, solution.room, solution.weapon)
    }
}

impl fmt::Display for Accusation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in the {} with the {}", self.suspect, self.room, self.weapon)
    }
}

/// What the active player may do at this decision point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOptions {
    /// Legal destinations, present only when moving is allowed
    pub moves: Option<Vec<LocationName>>,
    /// Room a suggestion would be made in, present only when suggesting is allowed
    pub suggestion: Option<Room>,
    /// Accusing is always offered
    pub accusation: bool,
}

impl TurnOptions {
    pub fn can_move(&self) -> bool {
        self.moves.is_some()
    }

    pub fn can_suggest(&self) -> bool {
        self.suggestion.is_some()
    }

    /// Whether a specific destination is on offer
    pub fn offers_move(&self, destination: LocationName) -> bool {
        self.moves
            .as_ref()
            .is_some_and(|moves| moves.contains(&destination))
    }
}

/// The active player's reply to a set of options: at most one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivePlayerChoice {
    Move(LocationName),
    Suggest(Suggestion),
    Accuse(Accusation),
    /// Nothing further this turn
    EndTurn,
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A suspect moved along the board
    CharacterMoved {
        player: PlayerId,
        suspect: Suspect,
        from: LocationName,
        to: LocationName,
    },

    /// A suggestion was made; the named suspect was pulled into the room
    SuggestionMade {
        player: PlayerId,
        suggestion: Suggestion,
        pulled_from: LocationName,
    },

    /// A waiting player showed a card to the suggester
    SuggestionDisproved {
        player: PlayerId,
        disprover: PlayerId,
        card: Card,
    },

    /// Nobody could disprove the suggestion
    SuggestionUnchallenged {
        player: PlayerId,
        suggestion: Suggestion,
    },

    /// An accusation was checked against the solution
    AccusationResolved {
        player: PlayerId,
        accusation: Accusation,
        correct: bool,
    },

    /// A player can no longer take turns
    PlayerEliminated { player: PlayerId },

    /// A player left the game (disconnected or unresponsive)
    PlayerWithdrew { player: PlayerId },

    /// The active player's turn was cut short after repeated rejected choices
    TurnForfeited { player: PlayerId },

    /// The game has a winner
    GameWon { player: PlayerId },

    /// Every player is out and nobody won
    GameAbandoned,
}
