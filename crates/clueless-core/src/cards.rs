//! Cards, the sealed solution, and dealing.

use crate::board::{Room, Suspect, Weapon};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single clue card
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Card {
    Suspect(Suspect),
    Weapon(Weapon),
    Room(Room),
}

impl Card {
    /// The full 21-card deck: suspects, then weapons, then rooms
    pub fn full_deck() -> Vec<Card> {
        let mut deck = Vec::with_capacity(21);
        deck.extend(Suspect::ALL.into_iter().map(Card::Suspect));
        deck.extend(Weapon::ALL.into_iter().map(Card::Weapon));
        deck.extend(Room::ALL.into_iter().map(Card::Room));
        deck
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Suspect(s) => write!(f, "{s}"),
            Card::Weapon(w) => write!(f, "{w}"),
            Card::Room(r) => write!(f, "{r}"),
        }
    }
}

/// The three cards sealed in the envelope at setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub suspect: Suspect,
    pub room: Room,
    pub weapon: Weapon,
}

impl Solution {
    pub fn new(suspect: Suspect, room: Room, weapon: Weapon) -> Self {
        Self {
            suspect,
            room,
            weapon,
        }
    }

    /// Whether a proposed triple names exactly this solution
    pub fn matches(&self, suspect: Suspect, room: Room, weapon: Weapon) -> bool {
        self.suspect == suspect && self.room == room && self.weapon == weapon
    }

    pub fn cards(&self) -> [Card; 3] {
        [
            Card::Suspect(self.suspect),
            Card::Room(self.room),
            Card::Weapon(self.weapon),
        ]
    }
}

/// Result of dealing: the solution plus one hand per seat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub solution: Solution,
    pub hands: Vec<Vec<Card>>,
}

impl Deal {
    /// Draw a random solution and deal the remaining 18 cards round-robin.
    ///
    /// With 4 or 5 players some hands hold one card more than others;
    /// seats earlier in the rotation get the extra cards.
    pub fn shuffle<R: Rng>(players: usize, rng: &mut R) -> Self {
        let suspect = Suspect::ALL[rng.gen_range(0..Suspect::ALL.len())];
        let room = Room::ALL[rng.gen_range(0..Room::ALL.len())];
        let weapon = Weapon::ALL[rng.gen_range(0..Weapon::ALL.len())];
        let solution = Solution::new(suspect, room, weapon);

        let sealed = solution.cards();
        let mut deck: Vec<Card> = Card::full_deck()
            .into_iter()
            .filter(|card| !sealed.contains(card))
            .collect();
        deck.shuffle(rng);

        Self::from_deck(solution, deck, players)
    }

    /// Deal an already ordered deck round-robin, starting at seat 0
    pub fn from_deck(solution: Solution, deck: Vec<Card>, players: usize) -> Self {
        let mut hands = vec![Vec::new(); players];
        if players > 0 {
            for (i, card) in deck.into_iter().enumerate() {
                hands[i % players].push(card);
            }
        }
        Self { solution, hands }
    }
}
