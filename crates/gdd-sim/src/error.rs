use gdd_core::{CoreError, LocationId};
use gdd_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// A refuelling detour is required but no fuel stop can be reached.
    /// The job stays in progress; retry or abort it.
    #[error("no reachable fuel stop on the way from {from} to {to}")]
    UnreachableDestination { from: LocationId, to: LocationId },

    #[error("no reachable fuel stop from {0}")]
    NoFuelStop(LocationId),

    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error("configuration error: {0}")]
    Config(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
