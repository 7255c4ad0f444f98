//! WebSocket server and connection handling.

use crate::config::ServerConfig;
use crate::connection::{ChannelConnection, ClientEnd};
use crate::game::GameSummary;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::table::Table;
use clueless_core::BotDifficulty;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Where a game stands
#[derive(Debug, Clone)]
pub enum GameStatus {
    InProgress { players: Vec<String> },
    Finished(GameSummary),
}

/// Server state shared across all connections.
pub struct ServerState {
    pub config: ServerConfig,
    /// Every game started by this server
    pub games: DashMap<Uuid, GameStatus>,
    /// The table currently taking players
    pub table: Mutex<Table>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        let table = Self::fresh_table(&config);
        Self {
            config,
            games: DashMap::new(),
            table: Mutex::new(table),
        }
    }

    fn fresh_table(config: &ServerConfig) -> Table {
        Table::with_bots(config.players, config.bots, BotDifficulty::Medium)
    }

    /// Seat a player. When this fills the table, its game starts on a
    /// separate task and a new table opens.
    pub async fn seat_player(
        self: &Arc<Self>,
        player_id: Uuid,
        name: String,
        connection: ChannelConnection,
    ) -> Result<ServerMessage, crate::table::TableError> {
        let mut table = self.table.lock().await;
        let (seat, suspect) = table.add_player(player_id, name, Box::new(connection))?;
        info!(%player_id, seat, %suspect, table = %table.id, "player seated");

        let seated = ServerMessage::Seated {
            seat,
            waiting_for: table.capacity - table.player_count(),
        };

        if table.is_full() {
            let full = std::mem::replace(&mut *table, Self::fresh_table(&self.config));
            drop(table);
            self.start_game(full)?;
        }

        Ok(seated)
    }

    fn start_game(self: &Arc<Self>, table: Table) -> Result<(), crate::table::TableError> {
        let game_id = table.id;
        let players = table.seats().iter().map(|s| s.name.clone()).collect();
        let protocol = table.start(self.config.protocol.clone())?;
        self.games.insert(game_id, GameStatus::InProgress { players });
        info!(%game_id, "game starting");

        let state = Arc::clone(self);
        tokio::spawn(async move {
            let summary = protocol.play().await;
            info!(%game_id, phase = ?summary.phase, "game finished");
            state.games.insert(game_id, GameStatus::Finished(summary));
        });
        Ok(())
    }

    /// Leave the waiting table after disconnecting before the game started
    pub async fn leave_table(&self, player_id: Uuid) -> Option<usize> {
        let mut table = self.table.lock().await;
        let waiting = table.remove_player(player_id).ok()?;
        if waiting == 0 {
            info!(%player_id, table = %table.id, "left the table, no one else is waiting");
        } else {
            info!(%player_id, table = %table.id, waiting, "left the table");
        }
        Some(waiting)
    }
}

/// Run the WebSocket server.
pub async fn run_server(state: Arc<ServerState>) -> anyhow::Result<()> {
    let addr = state.config.addr;
    let listener = TcpListener::bind(addr).await?;
    info!("Clue-Less server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let player_id = Uuid::new_v4();

    let welcome = serde_json::to_string(&ServerMessage::Welcome { player_id })?;
    ws_sender.send(Message::Text(welcome.into())).await?;

    // The first message must be a Join
    let player_name = loop {
        match ws_receiver.next().await {
            Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Join { player_name }) => break player_name,
                _ => {
                    let reply = ServerMessage::Error {
                        message: "Send Join first".to_string(),
                    };
                    ws_sender.send(Message::Text(serde_json::to_string(&reply)?.into())).await?;
                }
            },
            Some(Ok(Message::Close(_))) | None => return Ok(()),
            Some(Ok(_)) => {}
            Some(Err(e)) => return Err(e.into()),
        }
    };

    let (connection, client) = ChannelConnection::pair(player_name.clone());
    let seated = match state.seat_player(player_id, player_name, connection).await {
        Ok(seated) => seated,
        Err(e) => {
            let reply = ServerMessage::Error {
                message: e.to_string(),
            };
            ws_sender.send(Message::Text(serde_json::to_string(&reply)?.into())).await?;
            return Ok(());
        }
    };
    ws_sender.send(Message::Text(serde_json::to_string(&seated)?.into())).await?;

    let ClientEnd {
        mut incoming,
        outgoing,
    } = client;

    // Forward game requests to the socket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = incoming.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    // Forward replies to the game
    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(reply) => {
                    if outgoing.send(reply).is_err() {
                        break;
                    }
                }
                Err(_) => warn!("Invalid message from {}: {}", player_id, text),
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", player_id);
                break;
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", player_id, e);
                break;
            }
            _ => {}
        }
    }

    // Dropping `outgoing` closes the seat's connection for a running game
    drop(outgoing);
    state.leave_table(player_id).await;
    send_task.abort();

    info!("Connection closed for {}", player_id);
    Ok(())
}
