//! Per-session lobby state
//!
//! A lobby moves through `Forming -> Active -> Closed`:
//! - players join and place towers while Forming or Active
//! - the first `start_round` call activates the lobby
//! - once Closed every mutating call is rejected
//!
//! Towers are only recorded on their tile; nothing is simulated here.

use log::{debug, info};
use shared::{StageDescriptor, Tile};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// Lifecycle phase of a lobby
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyState {
    Forming,
    Active,
    Closed,
}

/// Rejected lobby or registry operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LobbyError {
    #[error("lobby {lobby_id} does not exist")]
    UnknownLobby { lobby_id: u32 },

    #[error("lobby limit of {max_lobbies} reached")]
    RegistryFull { max_lobbies: usize },

    #[error("no lobby IDs left to hand out")]
    IdsExhausted,

    #[error("lobby {lobby_id} is closed")]
    Closed { lobby_id: u32 },

    #[error("lobby {lobby_id} is full ({max_players} players)")]
    Full { lobby_id: u32, max_players: usize },

    #[error("player {player_id} is already in the lobby")]
    AlreadyJoined { player_id: u32 },

    #[error("player {player_id} is not in the lobby")]
    UnknownPlayer { player_id: u32 },

    #[error("lobby {lobby_id} has no players")]
    NoPlayers { lobby_id: u32 },

    #[error("tile ({x}, {y}) is outside the board")]
    TileOutOfBounds { x: i32, y: i32 },

    #[error("tile ({x}, {y}) is blocked")]
    TileBlocked { x: i32, y: i32 },

    #[error("tile ({x}, {y}) already holds a tower")]
    TileOccupied { x: i32, y: i32 },
}

/// One game session played on a single stage
#[derive(Debug)]
pub struct Lobby {
    id: u32,
    stage: Arc<StageDescriptor>,
    state: LobbyState,
    max_players: usize,
    players: HashSet<u32>,
    /// Tower tiles mapped to the player that placed them
    towers: HashMap<Tile, u32>,
    round: u32,
}

impl Lobby {
    /// Creates an empty lobby in the Forming state
    ///
    /// The lobby plays on `stage` for its whole life, even if the catalog
    /// reloads the board in the meantime.
    pub fn new(id: u32, stage: Arc<StageDescriptor>, max_players: usize) -> Self {
        Self {
            id,
            stage,
            state: LobbyState::Forming,
            max_players,
            players: HashSet::new(),
            towers: HashMap::new(),
            round: 0,
        }
    }

    /// Unique ID assigned by the registry
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The board this lobby is played on
    pub fn stage(&self) -> &Arc<StageDescriptor> {
        &self.stage
    }

    /// Current lifecycle phase
    pub fn state(&self) -> LobbyState {
        self.state
    }

    /// Number of the current round, 0 before the first start
    pub fn round(&self) -> u32 {
        self.round
    }

    /// IDs of the players currently in the lobby
    pub fn players(&self) -> &HashSet<u32> {
        &self.players
    }

    /// Owner of the tower on `tile`, if any
    pub fn tower_at(&self, tile: Tile) -> Option<u32> {
        self.towers.get(&tile).copied()
    }

    /// Returns the number of placed towers
    pub fn tower_count(&self) -> usize {
        self.towers.len()
    }

    /// Adds a player while the lobby is open and below capacity
    pub fn join(&mut self, player_id: u32) -> Result<(), LobbyError> {
        self.ensure_open()?;
        if self.players.contains(&player_id) {
            return Err(LobbyError::AlreadyJoined { player_id });
        }
        if self.players.len() >= self.max_players {
            return Err(LobbyError::Full {
                lobby_id: self.id,
                max_players: self.max_players,
            });
        }

        self.players.insert(player_id);
        info!("Player {} joined lobby {}", player_id, self.id);
        Ok(())
    }

    /// Removes the player together with every tower they placed.
    pub fn leave(&mut self, player_id: u32) -> Result<(), LobbyError> {
        self.ensure_open()?;
        if !self.players.remove(&player_id) {
            return Err(LobbyError::UnknownPlayer { player_id });
        }

        self.towers.retain(|_, owner| *owner != player_id);
        info!("Player {} left lobby {}", player_id, self.id);
        Ok(())
    }

    /// Records a tower for `player_id` on `tile`
    ///
    /// The tile must be on the board, not blocked and not already taken.
    pub fn place_tower(&mut self, player_id: u32, tile: Tile) -> Result<(), LobbyError> {
        self.ensure_open()?;
        if !self.players.contains(&player_id) {
            return Err(LobbyError::UnknownPlayer { player_id });
        }

        let Tile { x, y } = tile;
        if !self.stage.contains_tile(tile) {
            return Err(LobbyError::TileOutOfBounds { x, y });
        }
        if self.stage.is_blocked(tile) {
            return Err(LobbyError::TileBlocked { x, y });
        }
        if self.towers.contains_key(&tile) {
            return Err(LobbyError::TileOccupied { x, y });
        }

        self.towers.insert(tile, player_id);
        debug!(
            "Player {} placed tower at ({}, {}) in lobby {}",
            player_id, x, y, self.id
        );
        Ok(())
    }

    /// Starts the next round and returns its number.
    pub fn start_round(&mut self) -> Result<u32, LobbyError> {
        self.ensure_open()?;
        if self.players.is_empty() {
            return Err(LobbyError::NoPlayers { lobby_id: self.id });
        }

        self.state = LobbyState::Active;
        self.round += 1;
        info!("Lobby {} started round {}", self.id, self.round);
        Ok(self.round)
    }

    pub(crate) fn close(&mut self) {
        self.state = LobbyState::Closed;
    }

    fn ensure_open(&self) -> Result<(), LobbyError> {
        if self.state == LobbyState::Closed {
            return Err(LobbyError::Closed { lobby_id: self.id });
        }
        Ok(())
    }
}
