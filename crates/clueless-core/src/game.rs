//! Core game state machine.
//!
//! This module contains the main `GameState` struct: the board, the seated
//! players, the sealed solution, and the rules for moving, suggesting,
//! disproving and accusing. It performs no I/O; the server drives it.

use crate::actions::{Accusation, GameEvent, Suggestion, TurnOptions};
use crate::board::{Board, LocationName, Room, Suspect};
use crate::cards::{Card, Deal, Solution};
use crate::player::Player;
use crate::turn::TurnState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seat index; also the position in the turn rotation
pub type PlayerId = usize;

/// Fewest players a game can start with
pub const MIN_PLAYERS: usize = 3;

/// One player per suspect
pub const MAX_PLAYERS: usize = 6;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Turns are being played
    InProgress,
    /// A correct accusation ended the game
    Solved { winner: PlayerId },
    /// Everyone else was eliminated or withdrew
    LastStanding { winner: PlayerId },
    /// Nobody is left to take a turn
    Abandoned,
}

/// Errors that can occur when applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Need at least 3 players, got {0}")]
    NotEnoughPlayers(usize),

    #[error("At most 6 players can play, got {0}")]
    TooManyPlayers(usize),

    #[error("{0} is already taken")]
    DuplicateSuspect(Suspect),

    #[error("Deal has {hands} hands for {players} players")]
    DealMismatch { hands: usize, players: usize },

    #[error("No such player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Game is over")]
    GameOver,

    #[error("Moving is not allowed right now")]
    MoveNotOffered,

    #[error("Cannot move to {0} from here")]
    IllegalMove(LocationName),

    #[error("Suggesting is not allowed right now")]
    SuggestionNotOffered,

    #[error("Suggestions must name the room you are in ({expected}), not {got}")]
    WrongRoom { expected: Room, got: Room },

    #[error("{0} does not disprove this suggestion")]
    NotADisprovingCard(Card),
}

/// The complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// The game board
    pub board: Board,
    /// All players, in seating order
    pub players: Vec<Player>,
    /// Whose turn it is, once turns have started
    pub current_player: Option<PlayerId>,
    /// Current game phase
    pub phase: GamePhase,
    /// Turn number (0 before the first turn)
    pub turn_number: u32,
    /// The sealed envelope
    solution: Solution,
}

impl GameState {
    /// Create a new game from a roster of (name, suspect) pairs, in seating order
    pub fn new(roster: Vec<(String, Suspect)>) -> Result<Self, GameError> {
        Self::with_rng(roster, &mut StdRng::from_entropy())
    }

    /// Create a new game, drawing the solution and deal from `rng`
    pub fn with_rng<R: Rng>(roster: Vec<(String, Suspect)>, rng: &mut R) -> Result<Self, GameError> {
        let deal = Deal::shuffle(roster.len(), rng);
        Self::from_deal(roster, Board::standard(), deal)
    }

    /// Create a game from an explicit board and deal
    pub fn from_deal(
        roster: Vec<(String, Suspect)>,
        board: Board,
        deal: Deal,
    ) -> Result<Self, GameError> {
        if roster.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers(roster.len()));
        }
        if roster.len() > MAX_PLAYERS {
            return Err(GameError::TooManyPlayers(roster.len()));
        }
        for (i, (_, suspect)) in roster.iter().enumerate() {
            if roster[..i].iter().any(|(_, other)| other == suspect) {
                return Err(GameError::DuplicateSuspect(*suspect));
            }
        }
        if deal.hands.len() != roster.len() {
            return Err(GameError::DealMismatch {
                hands: deal.hands.len(),
                players: roster.len(),
            });
        }

        let players = roster
            .into_iter()
            .zip(deal.hands)
            .enumerate()
            .map(|(id, ((name, suspect), hand))| Player::new(id, name, suspect, hand))
            .collect();

        Ok(Self {
            board,
            players,
            current_player: None,
            phase: GamePhase::InProgress,
            turn_number: 0,
            solution: deal.solution,
        })
    }

    /// Get the number of players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Get a player by ID
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    fn player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.players.get(id).ok_or(GameError::UnknownPlayer(id))
    }

    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, GameError> {
        self.players.get_mut(id).ok_or(GameError::UnknownPlayer(id))
    }

    /// Suspects in seating order
    pub fn seating(&self) -> Vec<Suspect> {
        self.players.iter().map(|p| p.suspect).collect()
    }

    /// The sealed envelope. Only revealed to clients when the game ends or
    /// privately to a player whose accusation failed.
    pub fn solution(&self) -> Solution {
        self.solution
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        self.phase != GamePhase::InProgress
    }

    /// Get the winner if the game is finished
    pub fn get_winner(&self) -> Option<PlayerId> {
        match self.phase {
            GamePhase::Solved { winner } | GamePhase::LastStanding { winner } => Some(winner),
            GamePhase::InProgress | GamePhase::Abandoned => None,
        }
    }

    /// Hand the turn to the next player who still takes turns.
    ///
    /// The first call starts at seat 0. Returns `None` once the game is
    /// finished or nobody is eligible.
    pub fn advance_turn(&mut self) -> Option<PlayerId> {
        if self.is_finished() || self.players.is_empty() {
            return None;
        }

        let count = self.players.len();
        let start = self.current_player.map(|p| p + 1).unwrap_or(0);
        let next = (0..count)
            .map(|offset| (start + offset) % count)
            .find(|&id| self.players[id].takes_turns())?;

        self.current_player = Some(next);
        self.turn_number += 1;
        Some(next)
    }

    fn ensure_active(&self, player: PlayerId) -> Result<Suspect, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        let suspect = self.player(player)?.suspect;
        if self.current_player != Some(player) {
            return Err(GameError::NotYourTurn);
        }
        Ok(suspect)
    }

    /// Options for the active player at this decision point
    pub fn options_for(&self, player: PlayerId, turn: &TurnState) -> Result<TurnOptions, GameError> {
        let suspect = self.ensure_active(player)?;
        Ok(turn.options(&self.board, suspect))
    }

    /// Move the active player's suspect, re-deriving legality server-side
    pub fn apply_move(
        &mut self,
        player: PlayerId,
        turn: &mut TurnState,
        destination: LocationName,
    ) -> Result<GameEvent, GameError> {
        let options = self.options_for(player, turn)?;
        if !options.can_move() {
            return Err(GameError::MoveNotOffered);
        }
        if !options.offers_move(destination) {
            return Err(GameError::IllegalMove(destination));
        }

        let suspect = self.player(player)?.suspect;
        let from = self.board.position(suspect);
        self.board.move_character(suspect, destination);
        turn.has_moved = true;

        Ok(GameEvent::CharacterMoved {
            player,
            suspect,
            from,
            to: destination,
        })
    }

    /// Validate a suggestion and pull the named suspect into the room.
    ///
    /// The room must be the one the active player stands in; a mismatch is
    /// rejected before anything moves.
    pub fn make_suggestion(
        &mut self,
        player: PlayerId,
        turn: &mut TurnState,
        suggestion: Suggestion,
    ) -> Result<GameEvent, GameError> {
        let options = self.options_for(player, turn)?;
        let expected = options.suggestion.ok_or(GameError::SuggestionNotOffered)?;
        if suggestion.room != expected {
            return Err(GameError::WrongRoom {
                expected,
                got: suggestion.room,
            });
        }

        let pulled_from = self.board.position(suggestion.suspect);
        self.board
            .move_character(suggestion.suspect, LocationName::Room(suggestion.room));
        turn.has_suggested = true;

        Ok(GameEvent::SuggestionMade {
            player,
            suggestion,
            pulled_from,
        })
    }

    /// Players polled for a disproof: everyone but the suggester, in seating
    /// order. Eliminated and withdrawn players are still polled.
    pub fn disproof_order(&self, player: PlayerId) -> Vec<PlayerId> {
        self.players
            .iter()
            .map(|p| p.id)
            .filter(|&id| id != player)
            .collect()
    }

    /// Cards `player` could show against a suggestion
    pub fn matching_cards(&self, player: PlayerId, suggestion: &Suggestion) -> Vec<Card> {
        self.get_player(player)
            .map(|p| p.notebook.matching(suggestion))
            .unwrap_or_default()
    }

    /// Record that `disprover` showed `card` to the suggester
    pub fn record_disproof(
        &mut self,
        player: PlayerId,
        disprover: PlayerId,
        suggestion: &Suggestion,
        card: Card,
    ) -> Result<GameEvent, GameError> {
        if !self.matching_cards(disprover, suggestion).contains(&card) {
            return Err(GameError::NotADisprovingCard(card));
        }
        self.player_mut(player)?.notebook.record_shown(card, disprover);

        Ok(GameEvent::SuggestionDisproved {
            player,
            disprover,
            card,
        })
    }

    /// Record that nobody could disprove. Any named card the suggester does
    /// not hold must be in the envelope.
    pub fn record_unchallenged(
        &mut self,
        player: PlayerId,
        suggestion: &Suggestion,
    ) -> Result<GameEvent, GameError> {
        let notebook = &mut self.player_mut(player)?.notebook;
        for card in suggestion.cards() {
            if !notebook.holds(card) {
                notebook.mark_envelope(card);
            }
        }

        Ok(GameEvent::SuggestionUnchallenged {
            player,
            suggestion: *suggestion,
        })
    }

    /// Check an accusation. A correct one ends the game; a wrong one
    /// eliminates the accuser from further turns.
    pub fn accuse(
        &mut self,
        player: PlayerId,
        turn: &mut TurnState,
        accusation: Accusation,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_active(player)?;
        turn.has_accused = true;

        let correct = accusation.is_correct(&self.solution);
        let mut events = vec![GameEvent::AccusationResolved {
            player,
            accusation,
            correct,
        }];

        if correct {
            self.phase = GamePhase::Solved { winner: player };
            events.push(GameEvent::GameWon { player });
        } else {
            self.player_mut(player)?.eliminated = true;
            events.push(GameEvent::PlayerEliminated { player });
            events.extend(self.check_last_standing());
        }

        Ok(events)
    }

    /// Take a player out of the rotation after they stop responding
    pub fn withdraw(&mut self, player: PlayerId) -> Result<Vec<GameEvent>, GameError> {
        let p = self.player_mut(player)?;
        if p.withdrawn {
            return Ok(Vec::new());
        }
        p.withdrawn = true;

        let mut events = vec![GameEvent::PlayerWithdrew { player }];
        events.extend(self.check_last_standing());
        Ok(events)
    }

    fn check_last_standing(&mut self) -> Vec<GameEvent> {
        if self.is_finished() {
            return Vec::new();
        }

        let remaining: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|p| p.takes_turns())
            .map(|p| p.id)
            .collect();

        match remaining.as_slice() {
            [] => {
                self.phase = GamePhase::Abandoned;
                vec![GameEvent::GameAbandoned]
            }
            [winner] => {
                self.phase = GamePhase::LastStanding { winner: *winner };
                vec![GameEvent::GameWon { player: *winner }]
            }
            _ => Vec::new(),
        }
    }
}
