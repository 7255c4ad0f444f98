//! Player connections.
//!
//! The game loop talks to every seat through [`PlayerConnection`]: send one
//! message, await exactly one reply. WebSocket clients sit behind a
//! [`ChannelConnection`]; bots answer in-process through [`BotConnection`].

use crate::protocol::{ClientMessage, ServerMessage};
use async_trait::async_trait;
use clueless_core::{Bot, BotDifficulty, Suspect};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Connection closed")]
    Closed,

    #[error("No reply within {0:?}")]
    TimedOut(Duration),

    #[error("Expected a reply to {expected}, got {got}")]
    UnexpectedReply {
        expected: &'static str,
        got: &'static str,
    },
}

/// A single player's request/reply channel
#[async_trait]
pub trait PlayerConnection: Send {
    /// Send a message and wait for the reply to it
    async fn request(&mut self, msg: ServerMessage) -> Result<ClientMessage, ConnectionError>;

    /// Name used in logs
    fn label(&self) -> &str;
}

/// `request` bounded by an optional timeout
pub async fn request_within(
    connection: &mut dyn PlayerConnection,
    msg: ServerMessage,
    limit: Option<Duration>,
) -> Result<ClientMessage, ConnectionError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, connection.request(msg))
            .await
            .map_err(|_| ConnectionError::TimedOut(limit))?,
        None => connection.request(msg).await,
    }
}

/// Server half of an in-memory channel pair
pub struct ChannelConnection {
    label: String,
    outbound: mpsc::UnboundedSender<ServerMessage>,
    inbound: mpsc::UnboundedReceiver<ClientMessage>,
}

/// Client half: what the transport (or a test) reads and writes
pub struct ClientEnd {
    pub incoming: mpsc::UnboundedReceiver<ServerMessage>,
    pub outgoing: mpsc::UnboundedSender<ClientMessage>,
}

impl ChannelConnection {
    pub fn pair(label: impl Into<String>) -> (Self, ClientEnd) {
        let (to_client, incoming) = mpsc::unbounded_channel();
        let (outgoing, from_client) = mpsc::unbounded_channel();
        let connection = Self {
            label: label.into(),
            outbound: to_client,
            inbound: from_client,
        };
        (connection, ClientEnd { incoming, outgoing })
    }
}

#[async_trait]
impl PlayerConnection for ChannelConnection {
    async fn request(&mut self, msg: ServerMessage) -> Result<ClientMessage, ConnectionError> {
        // Anything already queued was sent before this request and cannot answer it
        while let Ok(stale) = self.inbound.try_recv() {
            debug!(connection = %self.label, reply = stale.kind(), "dropping unsolicited reply");
        }
        self.outbound
            .send(msg)
            .map_err(|_| ConnectionError::Closed)?;
        self.inbound.recv().await.ok_or(ConnectionError::Closed)
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// A seat played by a [`Bot`]
pub struct BotConnection {
    label: String,
    bot: Bot,
}

impl BotConnection {
    pub fn new(suspect: Suspect, difficulty: BotDifficulty) -> Self {
        Self::from_bot(Bot::new(suspect, difficulty))
    }

    pub fn from_bot(bot: Bot) -> Self {
        Self {
            label: format!("{} (bot)", bot.suspect),
            bot,
        }
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl PlayerConnection for BotConnection {
    async fn request(&mut self, msg: ServerMessage) -> Result<ClientMessage, ConnectionError> {
        let reply = match msg {
            ServerMessage::GameStart(start) => {
                self.bot.observe_deal(start.hand(), start.seating);
                ClientMessage::Ack
            }
            ServerMessage::ActivePlayerOptions(offer) => {
                ClientMessage::Choice(self.bot.choose_action(&offer.options))
            }
            ServerMessage::DisproofRequest { matching, .. } => ClientMessage::Disprove {
                card: self.bot.choose_disproof(&matching),
            },
            ServerMessage::SuggestionOutcome {
                suggestion,
                disproof,
            } => {
                let shown = disproof.map(|d| (d.disprover, d.card));
                self.bot.observe_suggestion_outcome(&suggestion, shown);
                ClientMessage::Ack
            }
            _ => ClientMessage::Ack,
        };
        Ok(reply)
    }

    fn label(&self) -> &str {
        &self.label
    }
}
