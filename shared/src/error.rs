//! Error types for stage parsing and path construction
//!
//! All construction failures surface as typed errors; queries against a
//! built path never fail.

use thiserror::Error;

/// Failure while building a [`crate::PathModel`] or one of its segments
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// No waypoints were supplied
    #[error("path has no waypoints")]
    EmptyPath,

    /// Two samples at the same arc length cannot define a slope
    #[error("degenerate segment: both samples lie at arc length {length}")]
    DegenerateSegment {
        /// The shared arc length of both samples.
        length: f64,
    },

    /// A waypoint coordinate is NaN or infinite
    #[error("waypoint {index} has a non-finite coordinate")]
    NonFiniteWaypoint {
        /// Position of the offending waypoint in the input sequence.
        index: usize,
    },

    /// The distance traveled up to a waypoint does not fit in an `f64`
    #[error("cumulative path length overflows at waypoint {index}")]
    NonFiniteLength {
        /// Position of the waypoint after duplicate collapsing.
        index: usize,
    },
}

/// Failure while turning a board document into a [`crate::StageDescriptor`]
#[derive(Error, Debug)]
pub enum StageError {
    /// Malformed or missing fields in a JSON board document
    #[error("failed to parse stage document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Malformed binary board document
    #[error("failed to decode stage document: {0}")]
    Decode(#[source] bincode::Error),

    /// The board could not be written in binary form
    #[error("failed to encode stage document: {0}")]
    Encode(#[source] bincode::Error),

    /// The waypoint sequence does not describe a usable path
    #[error("invalid stage path: {0}")]
    Path(#[from] PathError),
}
