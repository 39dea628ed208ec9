//! `gdd-mobility`: vehicle state, live routes, and movement.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`vehicle`]   | `Vehicle`: position, fuel, durability, consumption        |
//! | [`route`]     | `ActiveRoute`, `LegKind`, `ArrivalEvent`                  |
//! | [`movement`]  | `MovementSimulator`: per-tick advancement along a route   |
//!
//! # Movement model (continuous, distance-driven)
//!
//! Each tick the vehicle gets a distance budget of `speed × elapsed` and
//! spends it greedily along the route's segments.  Fuel and durability are
//! charged for exactly the distance covered, in the same step that moves
//! the vehicle, so no observer ever sees distance without its cost.  A
//! partially covered segment has its start point overwritten with the
//! vehicle's position; the next tick resumes from there.
//!
//! Nothing in this crate fails: malformed routes are rejected upstream by
//! the stitcher.

pub mod movement;
pub mod route;
pub mod vehicle;


pub use movement::{Advance, MovementSimulator};
pub use route::{ActiveRoute, ArrivalEvent, LegKind};
pub use vehicle::Vehicle;
