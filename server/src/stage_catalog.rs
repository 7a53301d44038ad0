//! Board file loading with hot reload
//!
//! The catalog keeps the current stage behind an `Arc`. A reload parses the
//! file into a brand-new [`StageDescriptor`] and swaps the reference; lobbies
//! that already hold the previous `Arc` keep playing on it untouched.

use log::{info, warn};
use shared::{StageDescriptor, StageError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Failure while loading or reloading a board file
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read board file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("board file {} is invalid: {source}", .path.display())]
    Stage {
        path: PathBuf,
        #[source]
        source: StageError,
    },
}

/// The stage currently being served, rebuilt from its board file on reload
pub struct StageCatalog {
    source: PathBuf,
    current: RwLock<Arc<StageDescriptor>>,
}

impl StageCatalog {
    /// Reads and builds the board at `path`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let source = path.as_ref().to_path_buf();
        let stage = read_stage(&source).await?;

        info!(
            "Loaded stage {} ({}) from {}: {}x{} board, path length {:.2}",
            stage.number(),
            stage.name(),
            source.display(),
            stage.x_size(),
            stage.y_size(),
            stage.path_length()
        );

        Ok(Self {
            source,
            current: RwLock::new(Arc::new(stage)),
        })
    }

    /// Board file this catalog reads from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Snapshot of the stage currently being served.
    pub async fn current(&self) -> Arc<StageDescriptor> {
        Arc::clone(&*self.current.read().await)
    }

    /// Rebuilds the stage from disk and swaps it in.
    ///
    /// On failure the current stage stays in place.
    pub async fn reload(&self) -> Result<Arc<StageDescriptor>, CatalogError> {
        let stage = match read_stage(&self.source).await {
            Ok(stage) => Arc::new(stage),
            Err(e) => {
                warn!("Keeping current stage, reload failed: {}", e);
                return Err(e);
            }
        };

        *self.current.write().await = Arc::clone(&stage);
        info!(
            "Reloaded stage {} ({}), path length {:.2}",
            stage.number(),
            stage.name(),
            stage.path_length()
        );
        Ok(stage)
    }
}

async fn read_stage(path: &Path) -> Result<StageDescriptor, CatalogError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    StageDescriptor::parse(&text).map_err(|source| CatalogError::Stage {
        path: path.to_path_buf(),
        source,
    })
}
