//! Registry of open lobbies
//!
//! Hands out unique lobby IDs and tells observers when a lobby closes.
//! Observers subscribe with [`LobbyRegistry::subscribe`] and receive
//! [`LobbyEvent`]s on an unbounded channel; a dropped receiver is pruned on
//! the next publish.

use crate::lobby::{Lobby, LobbyError};
use log::{debug, info};
use shared::StageDescriptor;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Lifecycle notifications published to registry observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyEvent {
    /// A lobby was registered and is Forming
    Created { lobby_id: u32 },
    /// A lobby was closed and removed from the registry
    Closed { lobby_id: u32 },
}

/// Owns every open lobby, indexed by ID
pub struct LobbyRegistry {
    lobbies: HashMap<u32, Lobby>,
    /// Next ID to hand out; IDs are never reused
    next_lobby_id: u32,
    max_lobbies: usize,
    max_players: usize,
    subscribers: Vec<mpsc::UnboundedSender<LobbyEvent>>,
}

impl LobbyRegistry {
    /// Creates an empty registry
    ///
    /// `max_players` is applied to every lobby it opens. Lobby IDs start at 1.
    pub fn new(max_lobbies: usize, max_players: usize) -> Self {
        Self {
            lobbies: HashMap::new(),
            next_lobby_id: 1,
            max_lobbies,
            max_players,
            subscribers: Vec::new(),
        }
    }

    /// Opens a new lobby on `stage` and returns its ID.
    ///
    /// Fails once `max_lobbies` are open, or when the ID space is used up;
    /// `u32::MAX` itself is never handed out.
    pub fn register(&mut self, stage: Arc<StageDescriptor>) -> Result<u32, LobbyError> {
        if self.lobbies.len() >= self.max_lobbies {
            return Err(LobbyError::RegistryFull {
                max_lobbies: self.max_lobbies,
            });
        }

        let lobby_id = self.next_lobby_id;
        self.next_lobby_id = lobby_id
            .checked_add(1)
            .ok_or(LobbyError::IdsExhausted)?;

        info!(
            "Lobby {} opened on stage {} ({})",
            lobby_id,
            stage.number(),
            stage.name()
        );
        self.lobbies
            .insert(lobby_id, Lobby::new(lobby_id, stage, self.max_players));
        self.publish(LobbyEvent::Created { lobby_id });

        Ok(lobby_id)
    }

    /// Closes the lobby, drops it from the registry and notifies observers.
    pub fn close(&mut self, lobby_id: u32) -> Result<Lobby, LobbyError> {
        let mut lobby = self
            .lobbies
            .remove(&lobby_id)
            .ok_or(LobbyError::UnknownLobby { lobby_id })?;

        lobby.close();
        info!("Lobby {} closed", lobby_id);
        self.publish(LobbyEvent::Closed { lobby_id });

        Ok(lobby)
    }

    /// Registers an observer; it receives every event published from now on.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<LobbyEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Looks up an open lobby
    pub fn get(&self, lobby_id: u32) -> Result<&Lobby, LobbyError> {
        self.lobbies
            .get(&lobby_id)
            .ok_or(LobbyError::UnknownLobby { lobby_id })
    }

    /// Looks up an open lobby for joining, tower placement or round starts
    pub fn get_mut(&mut self, lobby_id: u32) -> Result<&mut Lobby, LobbyError> {
        self.lobbies
            .get_mut(&lobby_id)
            .ok_or(LobbyError::UnknownLobby { lobby_id })
    }

    /// IDs of all open lobbies in ascending order
    pub fn lobby_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.lobbies.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the number of open lobbies
    pub fn len(&self) -> usize {
        self.lobbies.len()
    }

    /// Returns true if no lobby is open
    pub fn is_empty(&self) -> bool {
        self.lobbies.is_empty()
    }

    fn publish(&mut self, event: LobbyEvent) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        if self.subscribers.len() != before {
            debug!(
                "Dropped {} disconnected lobby observer(s)",
                before - self.subscribers.len()
            );
        }
    }
}
