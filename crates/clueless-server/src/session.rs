//! A running game: the engine state plus one connection per seat.

use crate::broadcast::{fan_out, Delivery};
use crate::connection::{request_within, ConnectionError, PlayerConnection};
use crate::protocol::{ClientMessage, ServerMessage, TurnStart};
use clueless_core::{GameEvent, GameState, PlayerId, Suspect};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Knobs for how the server runs a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// How long any single reply may take; `None` waits forever
    pub reply_timeout: Option<Duration>,
    /// Tell everyone what a wrong accusation named
    pub reveal_failed_accusations: bool,
    /// Rejected choices tolerated before the turn is ended for the player
    pub max_violations_per_turn: u32,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            reply_timeout: Some(Duration::from_secs(120)),
            reveal_failed_accusations: false,
            max_violations_per_turn: 3,
        }
    }
}

/// A seat's connection and whether it is still reachable
pub struct Seat {
    pub id: PlayerId,
    pub name: String,
    pub connection: Box<dyn PlayerConnection>,
    pub connected: bool,
}

impl Seat {
    pub fn new(id: PlayerId, name: String, connection: Box<dyn PlayerConnection>) -> Self {
        Self {
            id,
            name,
            connection,
            connected: true,
        }
    }
}

pub struct Session {
    pub game: GameState,
    pub seats: Vec<Seat>,
    pub config: ProtocolConfig,
    /// Everything that happened, in order
    pub events: Vec<GameEvent>,
}

impl Session {
    /// Seat one connection per player, in seating order
    pub fn new(
        game: GameState,
        connections: Vec<Box<dyn PlayerConnection>>,
        config: ProtocolConfig,
    ) -> Self {
        let seats = game
            .players
            .iter()
            .zip(connections)
            .map(|(player, connection)| Seat::new(player.id, player.name.clone(), connection))
            .collect();

        Self {
            game,
            seats,
            config,
            events: Vec::new(),
        }
    }

    pub fn suspect_of(&self, player: PlayerId) -> Suspect {
        self.game.players[player].suspect
    }

    pub fn is_connected(&self, player: PlayerId) -> bool {
        self.seats.get(player).is_some_and(|s| s.connected)
    }

    /// Every seat except `except`
    pub fn others(&self, except: PlayerId) -> Vec<PlayerId> {
        self.seats.iter().map(|s| s.id).filter(|&id| id != except).collect()
    }

    pub fn all_seats(&self) -> Vec<PlayerId> {
        self.seats.iter().map(|s| s.id).collect()
    }

    pub fn record(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        for event in events {
            debug!(?event, "game event");
            self.events.push(event);
        }
    }

    /// Single request/reply with the reply deadline. A failure disconnects
    /// the seat.
    pub async fn ask(
        &mut self,
        player: PlayerId,
        msg: ServerMessage,
    ) -> Result<ClientMessage, ConnectionError> {
        let limit = self.config.reply_timeout;
        let seat = match self.seats.get_mut(player) {
            Some(seat) if seat.connected => seat,
            _ => return Err(ConnectionError::Closed),
        };

        let result = request_within(seat.connection.as_mut(), msg, limit).await;
        if let Err(e) = &result {
            self.disconnect(player, e);
        }
        result
    }

    /// Send a notification that only needs an acknowledgement
    pub async fn notify(&mut self, player: PlayerId, msg: ServerMessage) {
        if let Ok(reply) = self.ask(player, msg).await {
            if reply != ClientMessage::Ack {
                debug!(seat = player, reply = reply.kind(), "non-ack reply to notification");
            }
        }
    }

    /// Barrier fan-out; seats that drop out are disconnected
    pub async fn broadcast(&mut self, messages: Vec<(PlayerId, ServerMessage)>) -> Delivery {
        let delivery = fan_out(&mut self.seats, messages, self.config.reply_timeout).await;
        for (player, error) in &delivery.dropped {
            self.disconnect(*player, error);
        }
        delivery
    }

    /// Same informational text to each of `recipients`, with the current board
    pub async fn announce(&mut self, recipients: Vec<PlayerId>, text: &str) -> Delivery {
        let status = TurnStart::informational(self.game.board.snapshot(), text);
        info!("{}", text);
        let messages = recipients
            .into_iter()
            .map(|id| (id, ServerMessage::TurnStart(status.clone())))
            .collect();
        self.broadcast(messages).await
    }

    /// Stop talking to a seat and take the player out of the rotation.
    ///
    /// The player keeps their cards; disproofs are made for them.
    pub fn disconnect(&mut self, player: PlayerId, reason: &ConnectionError) {
        let Some(seat) = self.seats.get_mut(player) else {
            return;
        };
        if !seat.connected {
            return;
        }
        seat.connected = false;
        warn!(seat = player, name = %seat.name, "player disconnected: {}", reason);

        match self.game.withdraw(player) {
            Ok(events) => self.record(events),
            Err(e) => warn!(seat = player, "withdraw failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ChannelConnection;
    use crate::protocol::ProtocolRole;
    use crate::testing::{fixed_session, Script};
    use clueless_core::{GamePhase, Suspect};
    use pretty_assertions::assert_eq;

    fn session(config: ProtocolConfig) -> (Session, Vec<crate::connection::ClientEnd>) {
        let roster = vec![
            ("Ann".to_string(), Suspect::MissScarlet),
            ("Bo".to_string(), Suspect::ColonelMustard),
            ("Cy".to_string(), Suspect::MrsWhite),
        ];
        let game = GameState::new(roster).unwrap();
        let mut connections: Vec<Box<dyn PlayerConnection>> = Vec::new();
        let mut clients = Vec::new();
        for player in &game.players {
            let (conn, client) = ChannelConnection::pair(player.name.clone());
            connections.push(Box::new(conn));
            clients.push(client);
        }
        (Session::new(game, connections, config), clients)
    }

    #[test]
    fn test_seats_follow_players() {
        let (session, _clients) = session(ProtocolConfig::default());
        let names: Vec<&str> = session.seats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Bo", "Cy"]);
        assert_eq!(session.others(1), vec![0, 2]);
    }

    #[tokio::test]
    async fn test_closed_connection_withdraws_player() {
        let (mut session, mut clients) = session(ProtocolConfig::default());
        drop(clients.remove(1));

        let result = session
            .ask(1, ServerMessage::Error { message: String::new() })
            .await;

        assert!(matches!(result, Err(ConnectionError::Closed)));
        assert!(!session.is_connected(1));
        assert!(session.game.players[1].withdrawn);
        assert_eq!(session.game.phase, GamePhase::InProgress);
    }

    #[tokio::test]
    async fn test_disconnected_seat_is_not_asked_again() {
        let (mut session, _clients) = session(ProtocolConfig::default());
        session.disconnect(0, &ConnectionError::Closed);

        let result = session
            .ask(0, ServerMessage::Error { message: String::new() })
            .await;
        assert!(matches!(result, Err(ConnectionError::Closed)));
        assert_eq!(session.events.len(), 1);
    }

    #[tokio::test]
    async fn test_timeouts_leave_last_player_standing() {
        let config = ProtocolConfig {
            reply_timeout: Some(Duration::from_millis(20)),
            ..ProtocolConfig::default()
        };
        let (mut session, mut clients) = session(config);
        let mut answering = clients.remove(2);
        tokio::spawn(async move {
            while answering.incoming.recv().await.is_some() {
                let _ = answering.outgoing.send(ClientMessage::Ack);
            }
        });

        let delivery = session.announce(session.all_seats(), "hello").await;

        assert_eq!(delivery.acknowledged, vec![2]);
        assert_eq!(session.game.phase, GamePhase::LastStanding { winner: 2 });
    }

    #[tokio::test]
    async fn test_announcement_leaves_board_untouched() {
        let scripts = (0..3).map(|_| Script::idle()).collect();
        let (mut session, log) = fixed_session(ProtocolConfig::default(), scripts);
        let before = session.game.board.snapshot();

        let delivery = session.announce(session.all_seats(), "Nothing happened").await;

        assert!(delivery.is_complete());
        assert_eq!(session.game.board.snapshot(), before);
        for seat in 0..3 {
            assert_eq!(log.locations(seat), vec![before.clone()]);
            assert_eq!(log.roles(seat), vec![ProtocolRole::Informational]);
        }
    }
}
