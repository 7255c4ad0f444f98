//! One player's turn: status barrier, then the action loop.

use crate::protocol::{ActivePlayerOptions, ClientMessage, ProtocolRole, ServerMessage, TurnStart};
use crate::session::Session;
use crate::{accusation, suggestion};
use clueless_core::{ActivePlayerChoice, GameEvent, PlayerId, TurnState};
use tracing::{debug, info, warn};

/// What the game loop should do after a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue,
    GameOver,
}

/// Run a full turn for `active`.
pub async fn run_turn(session: &mut Session, active: PlayerId) -> TurnOutcome {
    let suspect = session.suspect_of(active);
    info!(turn = session.game.turn_number, seat = active, %suspect, "turn start");

    let locations = session.game.board.snapshot();
    let messages = session
        .all_seats()
        .into_iter()
        .map(|id| {
            let role = if id == active {
                ProtocolRole::ActivePlayer
            } else {
                ProtocolRole::WaitingPlayer
            };
            let status = TurnStart {
                role,
                locations: locations.clone(),
                announcement: None,
            };
            (id, ServerMessage::TurnStart(status))
        })
        .collect();
    session.broadcast(messages).await;

    let mut turn = TurnState::new();
    let mut notice = None;

    loop {
        if session.game.is_finished() || !session.is_connected(active) {
            break;
        }

        let options = match session.game.options_for(active, &turn) {
            Ok(options) => options,
            Err(e) => {
                warn!(seat = active, "no options: {}", e);
                break;
            }
        };
        let offer = ActivePlayerOptions {
            options,
            notice: notice.take(),
        };

        let choice = match session.ask(active, ServerMessage::ActivePlayerOptions(offer)).await {
            Ok(ClientMessage::Choice(choice)) => choice,
            Ok(other) => {
                notice = Some(format!("Expected a choice, got {}", other.kind()));
                if violation(session, active, &mut turn) {
                    break;
                }
                continue;
            }
            Err(_) => break,
        };
        debug!(seat = active, ?choice, "choice");

        match choice {
            ActivePlayerChoice::Move(destination) => {
                match session.game.apply_move(active, &mut turn, destination) {
                    Ok(event) => {
                        let text = format!("{} moved to {}", suspect, destination);
                        session.record([event]);
                        session.announce(session.others(active), &text).await;
                    }
                    Err(e) => {
                        notice = Some(e.to_string());
                        if violation(session, active, &mut turn) {
                            break;
                        }
                    }
                }
            }
            ActivePlayerChoice::Suggest(s) => {
                if let Err(e) = suggestion::resolve(session, active, &mut turn, s).await {
                    notice = Some(e.to_string());
                    if violation(session, active, &mut turn) {
                        break;
                    }
                }
            }
            ActivePlayerChoice::Accuse(a) => {
                if let Err(e) = accusation::resolve(session, active, &mut turn, a).await {
                    warn!(seat = active, "accusation rejected: {}", e);
                }
                break;
            }
            ActivePlayerChoice::EndTurn => break,
        }
    }

    if session.game.is_finished() {
        TurnOutcome::GameOver
    } else {
        TurnOutcome::Continue
    }
}

/// Count a rejected choice. Returns true once the turn should be ended.
fn violation(session: &mut Session, active: PlayerId, turn: &mut TurnState) -> bool {
    turn.violations += 1;
    let limit = session.config.max_violations_per_turn;
    if turn.violations >= limit {
        warn!(seat = active, violations = turn.violations, "too many rejected choices, ending turn");
        session.record([GameEvent::TurnForfeited { player: active }]);
        return true;
    }
    false
}
