//! Player state and the deduction notebook.
//!
//! This module contains:
//! - Player struct binding a participant to a suspect and a notebook
//! - Notebook for the dealt hand, cards shown by others, and deductions

use crate::actions::Suggestion;
use crate::board::{Room, Suspect, Weapon};
use crate::cards::{Card, Solution};
use crate::game::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What a player knows about the cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notebook {
    hand: Vec<Card>,
    /// Cards other players have shown, with who showed them
    shown: BTreeMap<Card, PlayerId>,
    /// Cards deduced to be sealed in the envelope
    envelope: BTreeSet<Card>,
}

impl Notebook {
    pub fn new(hand: Vec<Card>) -> Self {
        Self {
            hand,
            ..Self::default()
        }
    }

    /// The dealt hand, in deal order
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn holds(&self, card: Card) -> bool {
        self.hand.contains(&card)
    }

    /// Hand cards that would disprove a suggestion, in suggestion order
    pub fn matching(&self, suggestion: &Suggestion) -> Vec<Card> {
        suggestion
            .cards()
            .into_iter()
            .filter(|card| self.holds(*card))
            .collect()
    }

    /// Record a card shown privately by another player
    pub fn record_shown(&mut self, card: Card, by: PlayerId) {
        self.shown.insert(card, by);
    }

    /// Who showed this card, if anyone did
    pub fn shown_by(&self, card: Card) -> Option<PlayerId> {
        self.shown.get(&card).copied()
    }

    /// Record a card deduced to be part of the solution
    pub fn mark_envelope(&mut self, card: Card) {
        self.envelope.insert(card);
    }

    /// Known not to be in the envelope
    pub fn is_cleared(&self, card: Card) -> bool {
        self.holds(card) || self.shown.contains_key(&card)
    }

    pub fn suspect_candidates(&self) -> Vec<Suspect> {
        self.candidates(Suspect::ALL.into_iter(), Card::Suspect)
    }

    pub fn weapon_candidates(&self) -> Vec<Weapon> {
        self.candidates(Weapon::ALL.into_iter(), Card::Weapon)
    }

    pub fn room_candidates(&self) -> Vec<Room> {
        self.candidates(Room::ALL.into_iter(), Card::Room)
    }

    fn candidates<T: Copy>(
        &self,
        all: impl Iterator<Item = T> + Clone,
        to_card: fn(T) -> Card,
    ) -> Vec<T> {
        if let Some(known) = all.clone().find(|item| self.envelope.contains(&to_card(*item))) {
            return vec![known];
        }
        all.filter(|item| !self.is_cleared(to_card(*item))).collect()
    }

    /// The solution, once every category is down to one candidate
    pub fn deduced_solution(&self) -> Option<Solution> {
        match (
            self.suspect_candidates().as_slice(),
            self.room_candidates().as_slice(),
            self.weapon_candidates().as_slice(),
        ) {
            ([suspect], [room], [weapon]) => Some(Solution::new(*suspect, *room, *weapon)),
            _ => None,
        }
    }
}

/// A seat at the table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Seat index, also the rotation order
    pub id: PlayerId,
    pub name: String,
    pub suspect: Suspect,
    pub notebook: Notebook,
    /// Made a wrong accusation; still disproves but takes no turns
    pub eliminated: bool,
    /// Stopped responding; skipped for turns
    pub withdrawn: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: String, suspect: Suspect, hand: Vec<Card>) -> Self {
        Self {
            id,
            name,
            suspect,
            notebook: Notebook::new(hand),
            eliminated: false,
            withdrawn: false,
        }
    }

    /// Whether this player still gets active turns
    pub fn takes_turns(&self) -> bool {
        !self.eliminated && !self.withdrawn
    }
}
