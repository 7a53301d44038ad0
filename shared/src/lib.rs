//! Stage model shared by the game server and its clients
//!
//! Holds the board value types and the path-interpolation engine that maps
//! "distance traveled" to a board position for anything walking the enemy path.
//!
//! ```rust
//! use shared::{Point, StageDescriptor};
//!
//! let stage = StageDescriptor::parse(r#"{
//!     "Number": 1, "Name": "Tutorial", "XSize": 10, "YSize": 10,
//!     "BlockedTiles": [],
//!     "PathPoints": [{ "X": 0.0, "Y": 0.0 }, { "X": 10.0, "Y": 0.0 }, { "X": 10.0, "Y": 10.0 }]
//! }"#)?;
//!
//! assert_eq!(stage.path_length(), 20.0);
//! assert_eq!(stage.point_along_path(1000.0), Point::new(10.0, 10.0));
//! # Ok::<(), shared::StageError>(())
//! ```

pub mod affine;
pub mod error;
pub mod geometry;
pub mod path;
pub mod stage;

pub use affine::AffineLine;
pub use error::{PathError, StageError};
pub use geometry::{Point, Tile};
pub use path::PathModel;
pub use stage::{StageDescriptor, StageDocument};
