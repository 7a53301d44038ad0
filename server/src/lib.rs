//! # Tower Defense Server Library
//!
//! Server-side state for the tower-defense game: the stage currently being
//! served and the lobbies (game sessions) playing on it. The geometric stage
//! model itself lives in the `shared` crate so clients can build the exact
//! same enemy path from the same board document.
//!
//! ## Module Organization
//!
//! ### Stage Catalog (`stage_catalog`)
//! Loads a board file and keeps the built stage behind an `Arc`:
//! - Async file loading and parsing
//! - Hot reload by building a fresh stage and swapping the reference
//! - Failed reloads keep serving the previous stage
//!
//! ### Lobby (`lobby`)
//! One game session with an explicit `Forming -> Active -> Closed` lifecycle:
//! - Player join/leave with a capacity limit
//! - Tower placement checked against board bounds, blocked and occupied tiles
//! - Round starting
//!
//! ### Lobby Registry (`lobby_registry`)
//! Owns all open lobbies:
//! - Unique, never reused lobby IDs
//! - Closing a lobby publishes a notification to every subscribed observer
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::lobby_registry::LobbyRegistry;
//! use server::stage_catalog::StageCatalog;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = StageCatalog::load("boards/meadow.json").await?;
//!     let mut registry = LobbyRegistry::new(16, 4);
//!     let mut events = registry.subscribe();
//!
//!     let lobby_id = registry.register(catalog.current().await)?;
//!     registry.get_mut(lobby_id)?.join(1)?;
//!     registry.close(lobby_id)?;
//!
//!     while let Ok(event) = events.try_recv() {
//!         println!("{:?}", event);
//!     }
//!     Ok(())
//! }
//! ```

pub mod lobby;
pub mod lobby_registry;
pub mod stage_catalog;
