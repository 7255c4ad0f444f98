//! AI bot players for Clue-Less.
//!
//! A bot only knows what a remote client would know: its hand, the options
//! it is offered, and the outcomes of its own suggestions. It keeps
//! a `Notebook` and accuses once every category is down to one candidate,
//! so it never makes a wrong accusation.
//!
//! - Easy: wanders and suggests at random
//! - Medium: heads for rooms it has not ruled out and suggests unknown cards

use crate::actions::{Accusation, ActivePlayerChoice, Suggestion, TurnOptions};
use crate::board::{LocationName, Room, Suspect, Weapon};
use crate::cards::Card;
use crate::game::PlayerId;
use crate::player::Notebook;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Bot difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotDifficulty {
    Easy,
    Medium,
}

/// A bot player that decides from its own notebook
pub struct Bot {
    pub suspect: Suspect,
    pub difficulty: BotDifficulty,
    notebook: Notebook,
    seating: Vec<Suspect>,
    /// Cards this bot has already shown to others
    revealed: Vec<Card>,
    rng: StdRng,
}

impl Bot {
    pub fn new(suspect: Suspect, difficulty: BotDifficulty) -> Self {
        Self::from_rng(suspect, difficulty, StdRng::from_entropy())
    }

    pub fn with_seed(suspect: Suspect, difficulty: BotDifficulty, seed: u64) -> Self {
        Self::from_rng(suspect, difficulty, StdRng::seed_from_u64(seed))
    }

    fn from_rng(suspect: Suspect, difficulty: BotDifficulty, rng: StdRng) -> Self {
        Self {
            suspect,
            difficulty,
            notebook: Notebook::default(),
            seating: Vec::new(),
            revealed: Vec::new(),
            rng,
        }
    }

    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    /// Take in the dealt hand and the seating order
    pub fn observe_deal(&mut self, hand: Vec<Card>, seating: Vec<Suspect>) {
        self.notebook = Notebook::new(hand);
        self.seating = seating;
    }

    /// Take in the result of our own suggestion
    pub fn observe_suggestion_outcome(
        &mut self,
        suggestion: &Suggestion,
        disproof: Option<(Suspect, Card)>,
    ) {
        match disproof {
            Some((by, card)) => {
                if let Some(seat) = self.seat_of(by) {
                    self.notebook.record_shown(card, seat);
                }
            }
            None => {
                for card in suggestion.cards() {
                    if !self.notebook.holds(card) {
                        self.notebook.mark_envelope(card);
                    }
                }
            }
        }
    }

    fn seat_of(&self, suspect: Suspect) -> Option<PlayerId> {
        self.seating.iter().position(|s| *s == suspect)
    }

    /// Choose one action from the options on offer
    pub fn choose_action(&mut self, options: &TurnOptions) -> ActivePlayerChoice {
        if options.accusation {
            if let Some(solution) = self.notebook.deduced_solution() {
                return ActivePlayerChoice::Accuse(Accusation::from(solution));
            }
        }

        match self.difficulty {
            BotDifficulty::Easy => self.choose_easy(options),
            BotDifficulty::Medium => self.choose_medium(options),
        }
    }

    /// Easy: suggest when possible, otherwise wander
    fn choose_easy(&mut self, options: &TurnOptions) -> ActivePlayerChoice {
        if let Some(room) = options.suggestion {
            let suspect = *Suspect::ALL.choose(&mut self.rng).unwrap_or(&self.suspect);
            let weapon = *Weapon::ALL.choose(&mut self.rng).unwrap_or(&Weapon::Rope);
            return ActivePlayerChoice::Suggest(Suggestion::new(suspect, room, weapon));
        }

        if let Some(moves) = &options.moves {
            if let Some(destination) = moves.choose(&mut self.rng) {
                return ActivePlayerChoice::Move(*destination);
            }
        }

        ActivePlayerChoice::EndTurn
    }

    /// Medium: suggest in rooms still in doubt, move toward them otherwise
    fn choose_medium(&mut self, options: &TurnOptions) -> ActivePlayerChoice {
        let rooms = self.notebook.room_candidates();

        if let Some(room) = options.suggestion {
            let worth_it = rooms.contains(&room) || !options.can_move();
            if worth_it {
                return ActivePlayerChoice::Suggest(self.build_suggestion(room));
            }
        }

        if let Some(moves) = &options.moves {
            if let Some(destination) = self.rank_moves(moves, &rooms) {
                return ActivePlayerChoice::Move(destination);
            }
        }

        if let Some(room) = options.suggestion {
            return ActivePlayerChoice::Suggest(self.build_suggestion(room));
        }

        ActivePlayerChoice::EndTurn
    }

    fn build_suggestion(&mut self, room: Room) -> Suggestion {
        let suspects = self.notebook.suspect_candidates();
        let weapons = self.notebook.weapon_candidates();

        let suspect = *suspects
            .choose(&mut self.rng)
            .unwrap_or(&self.suspect);
        let weapon = *weapons.choose(&mut self.rng).unwrap_or(&Weapon::Rope);

        Suggestion::new(suspect, room, weapon)
    }

    /// Candidate rooms first, then hallways leading to one, then anything
    fn rank_moves(
        &mut self,
        moves: &[LocationName],
        rooms: &[Room],
    ) -> Option<LocationName> {
        let score = |name: &LocationName| -> i32 {
            match name {
                LocationName::Room(room) if rooms.contains(room) => 3,
                LocationName::Hallway(hallway) => {
                    let (a, b) = hallway.ends();
                    if rooms.contains(&a) || rooms.contains(&b) {
                        2
                    } else {
                        1
                    }
                }
                _ => 0,
            }
        };

        let best = moves.iter().map(score).max()?;
        let top: Vec<LocationName> = moves.iter().copied().filter(|m| score(m) == best).collect();
        top.choose(&mut self.rng).copied()
    }

    /// Pick a card to show against someone else's suggestion
    pub fn choose_disproof(&mut self, matching: &[Card]) -> Option<Card> {
        let card = match self.difficulty {
            BotDifficulty::Easy => matching.choose(&mut self.rng).copied(),
            BotDifficulty::Medium => matching
                .iter()
                .find(|card| self.revealed.contains(card))
                .or_else(|| matching.first())
                .copied(),
        }?;
        if !self.revealed.contains(&card) {
            self.revealed.push(card);
        }
        Some(card)
    }
}
