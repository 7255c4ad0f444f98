//! The waiting table: seats fill up until a game can start.

use crate::connection::{BotConnection, PlayerConnection};
use crate::game::GameProtocol;
use crate::session::ProtocolConfig;
use clueless_core::{BotDifficulty, GameError, GameState, Suspect};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Table is full")]
    TableFull,

    #[error("Player not at table")]
    PlayerNotSeated,

    #[error("Waiting for {0} more players")]
    NotEnoughPlayers(usize),

    #[error(transparent)]
    Game(#[from] GameError),
}

/// Someone sitting at the table
pub struct TableSeat {
    pub id: Uuid,
    pub name: String,
    pub suspect: Suspect,
    connection: Box<dyn PlayerConnection>,
}

impl TableSeat {
    pub fn is_bot(&self) -> bool {
        self.id.is_nil()
    }
}

pub struct Table {
    pub id: Uuid,
    pub capacity: usize,
    seats: Vec<TableSeat>,
}

impl Table {
    pub fn new(capacity: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            capacity,
            seats: Vec::new(),
        }
    }

    /// A table with its first `bots` seats already taken
    pub fn with_bots(capacity: usize, bots: usize, difficulty: BotDifficulty) -> Self {
        let mut table = Self::new(capacity);
        for _ in 0..bots.min(capacity) {
            if let Some(suspect) = table.next_suspect() {
                let connection = BotConnection::new(suspect, difficulty);
                let name = connection.label().to_string();
                table.seats.push(TableSeat {
                    id: Uuid::nil(),
                    name,
                    suspect,
                    connection: Box::new(connection),
                });
            }
        }
        table
    }

    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    /// Seats held by people rather than bots
    pub fn waiting(&self) -> usize {
        self.seats.iter().filter(|s| !s.is_bot()).count()
    }

    pub fn is_full(&self) -> bool {
        self.seats.len() >= self.capacity
    }

    pub fn seats(&self) -> &[TableSeat] {
        &self.seats
    }

    /// First suspect nobody has taken yet
    fn next_suspect(&self) -> Option<Suspect> {
        Suspect::ALL
            .into_iter()
            .find(|s| self.seats.iter().all(|seat| seat.suspect != *s))
    }

    /// Seat a player. Returns their seat index and suspect.
    pub fn add_player(
        &mut self,
        id: Uuid,
        name: String,
        connection: Box<dyn PlayerConnection>,
    ) -> Result<(usize, Suspect), TableError> {
        if self.is_full() {
            return Err(TableError::TableFull);
        }
        let suspect = self.next_suspect().ok_or(TableError::TableFull)?;

        self.seats.push(TableSeat {
            id,
            name,
            suspect,
            connection,
        });
        Ok((self.seats.len() - 1, suspect))
    }

    /// Leave before the game starts. Returns how many people are still waiting.
    pub fn remove_player(&mut self, id: Uuid) -> Result<usize, TableError> {
        let index = self
            .seats
            .iter()
            .position(|s| s.id == id && !s.is_bot())
            .ok_or(TableError::PlayerNotSeated)?;
        self.seats.remove(index);
        Ok(self.waiting())
    }

    /// Deal and hand the seats over to a game
    pub fn start(self, config: ProtocolConfig) -> Result<GameProtocol, TableError> {
        if !self.is_full() {
            return Err(TableError::NotEnoughPlayers(self.capacity - self.seats.len()));
        }

        let (roster, connections): (Vec<_>, Vec<_>) = self
            .seats
            .into_iter()
            .map(|seat| ((seat.name, seat.suspect), seat.connection))
            .unzip();

        let game = GameState::new(roster)?;
        Ok(GameProtocol::new(game, connections, config))
    }
}
