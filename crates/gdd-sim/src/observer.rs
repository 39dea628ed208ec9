//! Session observer trait for rendering, logging, and persistence.

use gdd_core::SimClock;
use gdd_mobility::{ActiveRoute, ArrivalEvent, Vehicle};

use crate::{Job, SessionSnapshot, VehicleMode};

/// Which resource ran dry.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Resource {
    Fuel,
    Durability,
}

/// Callbacks invoked by [`Session`][crate::Session].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  The session never depends on what an
/// observer does: persistence media, drawing, and HUD output all live
/// behind this trait.
pub trait SessionObserver {
    /// Called at the end of every tick, after movement.
    fn on_tick(&mut self, _clock: &SimClock, _vehicle: &Vehicle, _mode: VehicleMode) {}

    /// Called when a new route replaces whatever was in flight.
    fn on_route_committed(&mut self, _route: &ActiveRoute) {}

    /// Called when the vehicle reaches the end of its route, before the
    /// state machine reacts.
    fn on_arrival(&mut self, _event: &ArrivalEvent, _vehicle: &Vehicle) {}

    fn on_job_completed(&mut self, _job: &Job) {}

    /// Called once each time a resource reaches zero.
    fn on_resource_depleted(&mut self, _resource: Resource, _vehicle: &Vehicle) {}

    /// Called after every committed state change with the snapshot to store.
    fn on_persist(&mut self, _snapshot: &SessionSnapshot) {}
}

/// A [`SessionObserver`] that does nothing.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
