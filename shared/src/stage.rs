//! Board descriptions and the stage model built from them
//!
//! A board arrives as a [`StageDocument`], either JSON text or the compact
//! bincode form sent to clients. Building a [`StageDescriptor`] from it runs
//! the path construction once; the descriptor is read-only afterwards and can
//! be shared between threads behind an `Arc`.

use crate::error::StageError;
use crate::geometry::{Point, Tile};
use crate::path::PathModel;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Wire schema of a board description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StageDocument {
    pub number: i32,
    pub name: String,
    pub x_size: i32,
    pub y_size: i32,
    /// Kept in supplied order, duplicates included.
    pub blocked_tiles: Vec<Tile>,
    pub path_points: Vec<Point>,
}

impl StageDocument {
    /// Reads the PascalCase JSON form.
    pub fn from_json(text: &str) -> Result<Self, StageError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, StageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads the compact bincode form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StageError> {
        bincode::deserialize(bytes).map_err(StageError::Decode)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StageError> {
        bincode::serialize(self).map_err(StageError::Encode)
    }

    /// Runs path construction and produces the queryable stage.
    pub fn build(self) -> Result<StageDescriptor, StageError> {
        StageDescriptor::from_document(self)
    }
}

/// A parsed board with its enemy path already built.
#[derive(Debug, Clone)]
pub struct StageDescriptor {
    number: i32,
    name: String,
    x_size: i32,
    y_size: i32,
    blocked_tiles: BTreeSet<Tile>,
    /// Blocked tiles as they appeared in the document
    supplied_tiles: Vec<Tile>,
    waypoints: Vec<Point>,
    path: PathModel,
}

impl StageDescriptor {
    /// Parses a JSON board document and builds its path.
    pub fn parse(text: &str) -> Result<Self, StageError> {
        StageDocument::from_json(text)?.build()
    }

    /// Decodes a bincode board document and builds its path.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StageError> {
        StageDocument::from_bytes(bytes)?.build()
    }

    /// Builds the path for `document`; no other validation is performed.
    pub fn from_document(document: StageDocument) -> Result<Self, StageError> {
        let path = PathModel::new(document.path_points.clone())?;

        let blocked_tiles: BTreeSet<Tile> = document.blocked_tiles.iter().copied().collect();
        if blocked_tiles.len() != document.blocked_tiles.len() {
            debug!(
                "Stage {} lists {} duplicate blocked tile(s)",
                document.number,
                document.blocked_tiles.len() - blocked_tiles.len()
            );
        }

        Ok(Self {
            number: document.number,
            name: document.name,
            x_size: document.x_size,
            y_size: document.y_size,
            blocked_tiles,
            supplied_tiles: document.blocked_tiles,
            waypoints: document.path_points,
            path,
        })
    }

    /// The source fields this stage was built from, tiles and waypoints as supplied.
    pub fn to_document(&self) -> StageDocument {
        StageDocument {
            number: self.number,
            name: self.name.clone(),
            x_size: self.x_size,
            y_size: self.y_size,
            blocked_tiles: self.supplied_tiles.clone(),
            path_points: self.waypoints.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, StageError> {
        self.to_document().to_json()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StageError> {
        self.to_document().to_bytes()
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x_size(&self) -> i32 {
        self.x_size
    }

    pub fn y_size(&self) -> i32 {
        self.y_size
    }

    /// Distinct blocked tiles.
    pub fn blocked_tiles(&self) -> &BTreeSet<Tile> {
        &self.blocked_tiles
    }

    /// Waypoints exactly as supplied, before duplicate collapsing.
    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    pub fn path(&self) -> &PathModel {
        &self.path
    }

    pub fn path_length(&self) -> f64 {
        self.path.path_length()
    }

    pub fn point_along_path(&self, length: f64) -> Point {
        self.path.point_along_path(length)
    }

    pub fn sample_path(&self, count: usize) -> Vec<Point> {
        self.path.sample(count)
    }

    /// Whether `tile` lies inside `[0, x_size) x [0, y_size)`.
    pub fn contains_tile(&self, tile: Tile) -> bool {
        (0..self.x_size).contains(&tile.x) && (0..self.y_size).contains(&tile.y)
    }

    pub fn is_blocked(&self, tile: Tile) -> bool {
        self.blocked_tiles.contains(&tile)
    }
}
