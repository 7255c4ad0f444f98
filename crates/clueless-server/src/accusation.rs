//! Accusation resolution.

use crate::protocol::ServerMessage;
use crate::session::Session;
use clueless_core::{Accusation, GameError, PlayerId, TurnState};

/// Check the accusation and tell the table. Returns whether it was correct.
///
/// A wrong accuser privately learns the solution. What everyone else hears
/// about a wrong accusation depends on `reveal_failed_accusations`.
pub async fn resolve(
    session: &mut Session,
    active: PlayerId,
    turn: &mut TurnState,
    accusation: Accusation,
) -> Result<bool, GameError> {
    let events = session.game.accuse(active, turn, accusation)?;
    session.record(events);

    let accuser = session.suspect_of(active);
    let solution = session.game.solution();

    if accusation.is_correct(&solution) {
        let text = format!("{} accused {} and solved the case", accuser, accusation);
        session.announce(session.all_seats(), &text).await;
        return Ok(true);
    }

    session
        .notify(active, ServerMessage::AccusationFailed { solution })
        .await;

    let text = if session.config.reveal_failed_accusations {
        format!("{} accused {} and was wrong", accuser, accusation)
    } else {
        format!("{} made a wrong accusation", accuser)
    };
    session.announce(session.others(active), &text).await;

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ProtocolConfig;
    use crate::testing::{fixed_session, Script};
    use clueless_core::{GamePhase, Room, Solution, Suspect, Weapon};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_correct_accusation_solves_the_case() {
        let (mut session, log) = fixed_session(
            ProtocolConfig::default(),
            vec![Script::idle(), Script::idle(), Script::idle()],
        );
        session.game.advance_turn();
        let accusation = Accusation::new(Suspect::ProfessorPlum, Room::Kitchen, Weapon::Rope);

        let correct = resolve(&mut session, 0, &mut TurnState::new(), accusation)
            .await
            .unwrap();

        assert!(correct);
        assert_eq!(session.game.phase, GamePhase::Solved { winner: 0 });
        for seat in 0..3 {
            assert_eq!(
                log.announcements(seat),
                vec!["Colonel Mustard accused Professor Plum in the Kitchen with the Rope and solved the case".to_string()]
            );
        }
    }

    #[tokio::test]
    async fn test_wrong_accusation_is_concealed_by_default() {
        let (mut session, log) = fixed_session(
            ProtocolConfig::default(),
            vec![Script::idle(), Script::idle(), Script::idle()],
        );
        session.game.advance_turn();
        let accusation = Accusation::new(Suspect::MrGreen, Room::Hall, Weapon::Wrench);

        let correct = resolve(&mut session, 0, &mut TurnState::new(), accusation)
            .await
            .unwrap();

        assert!(!correct);
        assert!(session.game.players[0].eliminated);
        assert!(!session.game.is_finished());
        assert_eq!(
            log.announcements(1),
            vec!["Colonel Mustard made a wrong accusation".to_string()]
        );
        assert_eq!(
            log.solutions_sent(0),
            vec![Solution::new(Suspect::ProfessorPlum, Room::Kitchen, Weapon::Rope)]
        );
        assert!(log.solutions_sent(1).is_empty());
    }

    #[tokio::test]
    async fn test_wrong_accusation_can_be_revealed() {
        let config = ProtocolConfig {
            reveal_failed_accusations: true,
            ..ProtocolConfig::default()
        };
        let (mut session, log) = fixed_session(
            config,
            vec![Script::idle(), Script::idle(), Script::idle()],
        );
        session.game.advance_turn();
        let accusation = Accusation::new(Suspect::MrGreen, Room::Hall, Weapon::Wrench);

        resolve(&mut session, 0, &mut TurnState::new(), accusation)
            .await
            .unwrap();

        assert_eq!(
            log.announcements(2),
            vec!["Colonel Mustard accused Mr. Green in the Hall with the Wrench and was wrong".to_string()]
        );
    }
}
