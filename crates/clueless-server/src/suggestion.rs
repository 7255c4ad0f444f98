//! Suggestion resolution: pull the suspect in, announce, poll for a disproof.

use crate::protocol::{ClientMessage, Disproof, ServerMessage};
use crate::session::Session;
use clueless_core::{Card, GameError, PlayerId, Suggestion, Suspect, TurnState};
use tracing::{info, warn};

/// Resolve `suggestion` for the active player.
///
/// Rejections (not offered, wrong room) return before anything is sent or
/// moved. Otherwise every waiting player hears the suggestion before anyone
/// is polled, and the suggester learns the outcome before the table is told
/// who disproved.
pub async fn resolve(
    session: &mut Session,
    active: PlayerId,
    turn: &mut TurnState,
    suggestion: Suggestion,
) -> Result<Option<Disproof>, GameError> {
    let event = session.game.make_suggestion(active, turn, suggestion)?;
    session.record([event]);

    let suggester = session.suspect_of(active);
    let text = format!("{} suggested {}", suggester, suggestion);
    session.announce(session.others(active), &text).await;

    let mut disproof = None;
    for seat in session.game.disproof_order(active) {
        let matching = session.game.matching_cards(seat, &suggestion);
        let card = poll(session, seat, suggester, &suggestion, matching).await;
        if let Some(card) = card {
            let event = session.game.record_disproof(active, seat, &suggestion, card)?;
            session.record([event]);
            disproof = Some(Disproof {
                disprover: session.suspect_of(seat),
                card,
            });
            break;
        }
    }

    if disproof.is_none() {
        let event = session.game.record_unchallenged(active, &suggestion)?;
        session.record([event]);
    }

    session
        .notify(
            active,
            ServerMessage::SuggestionOutcome {
                suggestion,
                disproof,
            },
        )
        .await;

    let result = match disproof {
        Some(d) => format!("{} disproved {}'s suggestion", d.disprover, suggester),
        None => format!("No one could disprove {}'s suggestion", suggester),
    };
    session.announce(session.others(active), &result).await;

    Ok(disproof)
}

/// Ask one waiting player for a card. Players with nothing to show are still
/// asked. A missing or invalid answer from a player who can disprove falls
/// back to their first matching card.
async fn poll(
    session: &mut Session,
    seat: PlayerId,
    suggester: Suspect,
    suggestion: &Suggestion,
    matching: Vec<Card>,
) -> Option<Card> {
    let fallback = matching.first().copied();
    if !session.is_connected(seat) {
        return fallback;
    }

    let request = ServerMessage::DisproofRequest {
        suggested_by: suggester,
        suggestion: *suggestion,
        matching: matching.clone(),
    };
    let chosen = match session.ask(seat, request).await {
        Ok(ClientMessage::Disprove { card }) => card,
        Ok(other) => {
            warn!(seat, reply = other.kind(), "unexpected reply to disproof request");
            None
        }
        Err(_) => None,
    };

    match chosen {
        Some(card) if matching.contains(&card) => Some(card),
        Some(card) => {
            warn!(seat, %card, "card shown does not match, using first match");
            fallback
        }
        None if fallback.is_some() => {
            info!(seat, "player can disprove but showed nothing, using first match");
            fallback
        }
        None => None,
    }
}
