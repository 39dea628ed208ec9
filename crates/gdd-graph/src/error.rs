//! Graph-subsystem error type.

use thiserror::Error;

use gdd_core::{HubId, LocationId};

/// Errors produced by `gdd-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Malformed or inconsistent input graph.  Fatal at load time.
    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    /// The hub graph is disconnected for this pair.  Recoverable.
    #[error("no route from {from} to {to}")]
    NoRoute { from: HubId, to: HubId },

    /// A stitched route too short to drive along.  Indicates a bug upstream.
    #[error("stitched route has {points} point(s), need at least 2")]
    DegenerateRoute { points: usize },

    #[error("location {0} not found")]
    UnknownLocation(LocationId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
