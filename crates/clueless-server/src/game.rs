//! The game loop: deal announcement, then turns until someone wins.

use crate::connection::PlayerConnection;
use crate::protocol::{GameStart, ServerMessage};
use crate::session::{ProtocolConfig, Session};
use crate::turn::{run_turn, TurnOutcome};
use clueless_core::{GamePhase, GameState, PlayerId, Solution, Suspect};
use serde::Serialize;
use tracing::info;

/// How a game ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub phase: GamePhase,
    pub winner: Option<(PlayerId, Suspect)>,
    pub turns: u32,
    pub solution: Solution,
}

pub struct GameProtocol {
    session: Session,
}

impl GameProtocol {
    pub fn new(
        game: GameState,
        connections: Vec<Box<dyn PlayerConnection>>,
        config: ProtocolConfig,
    ) -> Self {
        Self {
            session: Session::new(game, connections, config),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Play the game to the end
    pub async fn play(mut self) -> GameSummary {
        let session = &mut self.session;
        let seating = session.game.seating();

        let starts = session
            .game
            .players
            .iter()
            .map(|p| {
                let start = GameStart::new(p.suspect, p.notebook.hand(), seating.clone());
                (p.id, ServerMessage::GameStart(start))
            })
            .collect();
        session.broadcast(starts).await;
        info!(players = seating.len(), "game started");

        while let Some(active) = session.game.advance_turn() {
            if run_turn(session, active).await == TurnOutcome::GameOver {
                break;
            }
        }

        let summary = self.summary();
        let winner = summary.winner.map(|(_, suspect)| suspect);
        let over = ServerMessage::GameOver {
            winner,
            solution: summary.solution,
        };
        let messages = self
            .session
            .all_seats()
            .into_iter()
            .map(|id| (id, over.clone()))
            .collect();
        self.session.broadcast(messages).await;

        info!(phase = ?summary.phase, turns = summary.turns, "game over");
        summary
    }

    fn summary(&self) -> GameSummary {
        let game = &self.session.game;
        GameSummary {
            phase: game.phase,
            winner: game
                .get_winner()
                .map(|id| (id, game.players[id].suspect)),
            turns: game.turn_number,
            solution: game.solution(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixed_game, fixed_session, Log, Script};
    use clueless_core::{Accusation, ActivePlayerChoice, Room, Weapon};
    use pretty_assertions::assert_eq;

    fn protocol(scripts: Vec<Script>) -> (GameProtocol, Log) {
        let (session, log) = fixed_session(ProtocolConfig::default(), scripts);
        (GameProtocol { session }, log)
    }

    fn wrong() -> ActivePlayerChoice {
        ActivePlayerChoice::Accuse(Accusation::new(Suspect::MrGreen, Room::Hall, Weapon::Wrench))
    }

    #[tokio::test]
    async fn test_correct_accusation_ends_the_game() {
        let right = ActivePlayerChoice::Accuse(Accusation::new(
            Suspect::ProfessorPlum,
            Room::Kitchen,
            Weapon::Rope,
        ));
        let (protocol, log) = protocol(vec![
            Script::idle(),
            Script::choices(vec![right]),
            Script::idle(),
        ]);

        let summary = protocol.play().await;

        assert_eq!(summary.phase, GamePhase::Solved { winner: 1 });
        assert_eq!(summary.winner, Some((1, Suspect::MissScarlet)));
        assert_eq!(summary.turns, 2);
        for seat in 0..3 {
            assert_eq!(log.count(seat, "GameStart"), 1);
            assert_eq!(log.count(seat, "GameOver"), 1);
        }
        assert_eq!(log.count(2, "ActivePlayerOptions"), 0);
    }

    #[tokio::test]
    async fn test_last_player_standing_wins() {
        let (protocol, log) = protocol(vec![
            Script::choices(vec![wrong()]),
            Script::choices(vec![wrong()]),
            Script::idle(),
        ]);

        let summary = protocol.play().await;

        assert_eq!(summary.phase, GamePhase::LastStanding { winner: 2 });
        assert_eq!(summary.turns, 2);
        // Eliminated players still hear the end of the game
        assert_eq!(log.count(0, "GameOver"), 1);
    }

    #[tokio::test]
    async fn test_eliminated_player_is_skipped() {
        let right = ActivePlayerChoice::Accuse(Accusation::new(
            Suspect::ProfessorPlum,
            Room::Kitchen,
            Weapon::Rope,
        ));
        let (protocol, log) = protocol(vec![
            Script::choices(vec![wrong()]),
            Script::idle(),
            Script::choices(vec![ActivePlayerChoice::EndTurn, right]),
        ]);

        let summary = protocol.play().await;

        assert_eq!(summary.phase, GamePhase::Solved { winner: 2 });
        // Turns: Mustard (wrong), Scarlet, Green, Scarlet, Green (right)
        assert_eq!(summary.turns, 5);
        assert_eq!(log.count(0, "ActivePlayerOptions"), 1);
    }

    #[tokio::test]
    async fn test_hang_ups_leave_last_player_standing() {
        let (protocol, _log) = protocol(vec![
            Script::idle().hanging_up(),
            Script::idle().hanging_up(),
            Script::idle().hanging_up(),
        ]);

        let summary = protocol.play().await;

        assert_eq!(summary.phase, GamePhase::LastStanding { winner: 2 });
        assert_eq!(summary.winner, Some((2, Suspect::MrGreen)));
    }

    #[tokio::test]
    async fn test_bots_play_a_whole_game() {
        use crate::connection::BotConnection;
        use clueless_core::{Bot, BotDifficulty};

        let game = fixed_game();
        let connections: Vec<Box<dyn PlayerConnection>> = game
            .players
            .iter()
            .map(|p| {
                let bot = Bot::with_seed(p.suspect, BotDifficulty::Medium, 11 + p.id as u64);
                Box::new(BotConnection::from_bot(bot)) as Box<dyn PlayerConnection>
            })
            .collect();

        let summary = GameProtocol::new(game, connections, ProtocolConfig::default())
            .play()
            .await;

        assert!(matches!(summary.phase, GamePhase::Solved { .. }));
        assert_eq!(
            summary.solution,
            Solution::new(Suspect::ProfessorPlum, Room::Kitchen, Weapon::Rope)
        );
    }
}
