//! `gdd-sim`: dispatch decisions, the job state machine, and the session
//! that drives them.
//!
//! # Tick flow
//!
//! ```text
//! Session::tick(elapsed):
//!   ① Move      MovementSimulator spends speed × elapsed along the route,
//!                 charging fuel and durability per metre.
//!   ② Observe   depletion warnings, on_tick.
//!   ③ Arrive    on reaching the route end, the state machine produces a
//!                 Transition plus follow-up Actions (never calls back into
//!                 itself).
//!   ④ Apply     the tick loop consumes the Actions, e.g. re-dispatching
//!                 the job after a refuelling stop.
//! ```
//!
//! Commands (`accept_job`, `request_refuel`, `retry_job`, `abort_job`)
//! either succeed completely or return a [`SimError`] and leave the session
//! untouched.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use gdd_graph::{AStarRouter, load_dir};
//! use gdd_sim::{Job, NoopObserver, Session};
//!
//! let graph = load_dir(Path::new("data"))?;
//! let depot = graph.location_by_key("depot").unwrap();
//! let shop = graph.location_by_key("shop").unwrap();
//! let mut session = Session::new(SimConfig::default(), graph, AStarRouter, depot)?;
//! session.accept_job(Job::new(JobId(1), depot, shop, 80.0), &mut NoopObserver)?;
//! while !session.is_idle() {
//!     session.tick(1.0 / 60.0, &mut NoopObserver)?;
//! }
//! ```

pub mod dispatcher;
pub mod error;
pub mod job;
pub mod observer;
pub mod session;
pub mod snapshot;


pub use dispatcher::{Dispatcher, RouteAssignment};
pub use error::{SimError, SimResult};
pub use job::{Job, JobStatus, VehicleMode};
pub use observer::{NoopObserver, Resource, SessionObserver};
pub use session::{Action, Session, TickReport, Transition};
pub use snapshot::{JobSnapshot, SessionSnapshot, SnapshotPatch, VehicleSnapshot};
