//! `gdd-core`: foundational types for the go-dot-delivery engine.
//!
//! This crate is a dependency of every other `gdd-*` crate.  It has no
//! `gdd-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`ids`]      | `HubId`, `EdgeId`, `LocationId`, `JobId`                 |
//! | [`geo`]      | `GeoPoint`, haversine distance, polyline helpers         |
//! | [`config`]   | `SimConfig`, `VehicleSpec`, `DispatchConfig`             |
//! | [`time`]     | `Tick`, `SimClock`                                       |
//! | [`rng`]      | `SimRng`                                                 |
//! | [`error`]    | `CoreError`, `CoreResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DispatchConfig, SimConfig, VehicleSpec};
pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, polyline_length_m};
pub use ids::{EdgeId, HubId, JobId, LocationId};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
