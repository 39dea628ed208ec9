//! `gdd-graph`: hub graph, input loading, routing, and stitching.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`store`]   | `GraphStore` (CSR + R-tree), `GraphStoreBuilder`, `Location` |
//! | [`records`] | JSON input records and the directory loader                 |
//! | [`router`]  | `HubRouter` trait, `HubPath`, `AStarRouter`                  |
//! | [`stitch`]  | `RouteStitcher`, `StitchedRoute`                             |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                               |

pub mod error;
pub mod records;
pub mod router;
pub mod stitch;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use records::{EdgeRecord, GraphSources, HubRecord, LinkRecord, LocationRecord, load_dir};
pub use router::{AStarRouter, HubPath, HubRouter};
pub use stitch::{RouteStitcher, StitchedRoute};
pub use store::{Endpoint, GraphStore, GraphStoreBuilder, Hub, HubEdge, LinkKey, Location, LocationCategory};
