//! Scripted connections for protocol tests.

use crate::connection::{ConnectionError, PlayerConnection};
use crate::protocol::{ActivePlayerOptions, ClientMessage, ProtocolRole, ServerMessage};
use crate::session::{ProtocolConfig, Session};
use async_trait::async_trait;
use clueless_core::{
    ActivePlayerChoice, Board, Card, Deal, GameState, LocationName, PlayerId, Room, Solution,
    Suspect, Weapon,
};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Every message the server sent, in the order connections received them
#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Vec<(PlayerId, ServerMessage)>>>);

impl Log {
    fn push(&self, seat: PlayerId, msg: ServerMessage) {
        self.0.lock().unwrap().push((seat, msg));
    }

    fn sent_to(&self, seat: PlayerId) -> Vec<ServerMessage> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == seat)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn kinds_in_order(&self) -> Vec<(PlayerId, &'static str)> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .map(|(s, m)| (*s, m.kind()))
            .collect()
    }

    pub fn count(&self, seat: PlayerId, kind: &str) -> usize {
        self.sent_to(seat).iter().filter(|m| m.kind() == kind).count()
    }

    pub fn options_sent(&self, seat: PlayerId) -> Vec<ActivePlayerOptions> {
        self.sent_to(seat)
            .into_iter()
            .filter_map(|m| match m {
                ServerMessage::ActivePlayerOptions(offer) => Some(offer),
                _ => None,
            })
            .collect()
    }

    pub fn roles(&self, seat: PlayerId) -> Vec<ProtocolRole> {
        self.sent_to(seat)
            .into_iter()
            .filter_map(|m| match m {
                ServerMessage::TurnStart(status) => Some(status.role),
                _ => None,
            })
            .collect()
    }

    /// Board positions carried by each TurnStart
    pub fn locations(&self, seat: PlayerId) -> Vec<BTreeMap<Suspect, LocationName>> {
        self.sent_to(seat)
            .into_iter()
            .filter_map(|m| match m {
                ServerMessage::TurnStart(status) => Some(status.locations),
                _ => None,
            })
            .collect()
    }

    pub fn announcements(&self, seat: PlayerId) -> Vec<String> {
        self.sent_to(seat)
            .into_iter()
            .filter_map(|m| match m {
                ServerMessage::TurnStart(status) => status.announcement,
                _ => None,
            })
            .collect()
    }

    pub fn solutions_sent(&self, seat: PlayerId) -> Vec<Solution> {
        self.sent_to(seat)
            .into_iter()
            .filter_map(|m| match m {
                ServerMessage::AccusationFailed { solution } => Some(solution),
                _ => None,
            })
            .collect()
    }
}

/// Canned replies for one seat
pub struct Script {
    choices: VecDeque<ActivePlayerChoice>,
    /// `None` shows the first matching card
    shows: Option<Option<Card>>,
    /// Close the connection when asked for a choice
    hang_up_on_choice: bool,
}

impl Script {
    /// Acknowledges everything, ends every turn, shows the first match
    pub fn idle() -> Self {
        Self::choices(Vec::new())
    }

    pub fn choices(choices: Vec<ActivePlayerChoice>) -> Self {
        Self {
            choices: choices.into(),
            shows: None,
            hang_up_on_choice: false,
        }
    }

    pub fn showing(mut self, card: Option<Card>) -> Self {
        self.shows = Some(card);
        self
    }

    pub fn hanging_up(mut self) -> Self {
        self.hang_up_on_choice = true;
        self
    }
}

pub struct ScriptedConnection {
    seat: PlayerId,
    label: String,
    script: Script,
    log: Log,
}

#[async_trait]
impl PlayerConnection for ScriptedConnection {
    async fn request(&mut self, msg: ServerMessage) -> Result<ClientMessage, ConnectionError> {
        self.log.push(self.seat, msg.clone());
        let reply = match msg {
            ServerMessage::ActivePlayerOptions(_) => {
                if self.script.hang_up_on_choice {
                    return Err(ConnectionError::Closed);
                }
                let choice = self
                    .script
                    .choices
                    .pop_front()
                    .unwrap_or(ActivePlayerChoice::EndTurn);
                ClientMessage::Choice(choice)
            }
            ServerMessage::DisproofRequest { matching, .. } => ClientMessage::Disprove {
                card: self.script.shows.unwrap_or_else(|| matching.first().copied()),
            },
            _ => ClientMessage::Ack,
        };
        Ok(reply)
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Mustard, Scarlet and Green in their starting rooms, with a known deal:
///
/// - seat 0: Mustard, Peacock, Dagger, Wrench, Lounge, Dining Room
/// - seat 1: Scarlet, White, Lead Pipe, Study, Library, Conservatory
/// - seat 2: Green, Candlestick, Revolver, Hall, Billiard Room, Ballroom
///
/// The solution is Plum in the Kitchen with the Rope.
pub fn fixed_game() -> GameState {
    let solution = Solution::new(Suspect::ProfessorPlum, Room::Kitchen, Weapon::Rope);
    let sealed = solution.cards();
    let deck = Card::full_deck()
        .into_iter()
        .filter(|c| !sealed.contains(c))
        .collect();
    let roster = vec![
        ("Ann".to_string(), Suspect::ColonelMustard),
        ("Bo".to_string(), Suspect::MissScarlet),
        ("Cy".to_string(), Suspect::MrGreen),
    ];
    GameState::from_deal(roster, Board::standard(), Deal::from_deck(solution, deck, 3)).unwrap()
}

pub fn fixed_session(config: ProtocolConfig, scripts: Vec<Script>) -> (Session, Log) {
    let log = Log::default();
    let connections = scripts
        .into_iter()
        .enumerate()
        .map(|(seat, script)| {
            Box::new(ScriptedConnection {
                seat,
                label: format!("seat {seat}"),
                script,
                log: log.clone(),
            }) as Box<dyn PlayerConnection>
        })
        .collect();
    (Session::new(fixed_game(), connections, config), log)
}
