//! Per-turn state and the action gateway.
//!
//! A `TurnState` lives for exactly one turn and is threaded through the
//! turn loop. The options offered to the active player are recomputed from
//! it and the board at every decision point, never cached.

use crate::actions::TurnOptions;
use crate::board::{Board, LocationKind, Suspect};
use serde::{Deserialize, Serialize};

/// What the active player has done so far this turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub has_moved: bool,
    pub has_suggested: bool,
    pub has_accused: bool,
    /// Rejected replies so far this turn
    pub violations: u32,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Action categories currently permitted to `suspect`
    pub fn options(&self, board: &Board, suspect: Suspect) -> TurnOptions {
        let destinations = board.legal_destinations(suspect);
        let can_move = !destinations.is_empty() && !self.has_moved;

        let location = board.location_of(suspect);
        let can_suggest = location.kind() == LocationKind::Room && !self.has_suggested;

        TurnOptions {
            moves: can_move.then_some(destinations),
            suggestion: if can_suggest {
                location.name.room()
            } else {
                None
            },
            accusation: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Hallway, LocationName, Room};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fresh_turn_in_room_offers_everything() {
        let board = Board::standard();
        let options = TurnState::new().options(&board, Suspect::ColonelMustard);

        assert!(options.can_move());
        assert_eq!(options.suggestion, Some(Room::Study));
        assert!(options.accusation);
    }

    #[test]
    fn test_no_move_after_moving() {
        let board = Board::standard();
        let turn = TurnState {
            has_moved: true,
            ..TurnState::new()
        };
        let options = turn.options(&board, Suspect::ColonelMustard);

        assert_eq!(options.moves, None);
        assert!(options.accusation);
    }

    #[test]
    fn test_no_move_when_boxed_in() {
        let mut board = Board::standard();
        board.move_character(Suspect::ColonelMustard, LocationName::Hallway(Hallway::H3));
        // Plum's home square only opens onto H3
        board.move_character(Suspect::ProfessorPlum, LocationName::Home(Suspect::ProfessorPlum));
        let options = TurnState::new().options(&board, Suspect::ProfessorPlum);

        assert_eq!(options.moves, None);
        assert_eq!(options.suggestion, None);
    }

    #[test]
    fn test_no_suggestion_outside_room() {
        let mut board = Board::standard();
        board.move_character(Suspect::MissScarlet, LocationName::Hallway(Hallway::H2));
        let options = TurnState::new().options(&board, Suspect::MissScarlet);

        assert_eq!(options.suggestion, None);
    }

    #[test]
    fn test_no_suggestion_after_suggesting() {
        let board = Board::standard();
        let turn = TurnState {
            has_suggested: true,
            ..TurnState::new()
        };
        assert_eq!(turn.options(&board, Suspect::MrGreen).suggestion, None);
    }
}
