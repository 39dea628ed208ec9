//! Refuel-or-deliver decisions.
//!
//! The dispatcher only reads the graph and the vehicle.  It returns a
//! [`RouteAssignment`] value; committing that assignment is the session's
//! job, so a failed decision never leaves partial state behind.

use gdd_core::{DispatchConfig, GeoPoint, LocationId, SimConfig, VehicleSpec};
use gdd_graph::{
    GraphError, GraphStore, HubRouter, Location, LocationCategory, RouteStitcher, StitchedRoute,
};
use gdd_mobility::{ActiveRoute, LegKind, Vehicle};

use crate::{Job, SimError, SimResult};

/// The outcome of a dispatch decision, not yet committed.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAssignment {
    pub leg:    LegKind,
    pub target: LocationId,
    pub points: Vec<GeoPoint>,
    /// Fuel the leg is expected to burn.
    pub estimated_fuel: f64,
}

impl RouteAssignment {
    pub fn into_route(self) -> ActiveRoute {
        ActiveRoute::new(self.points, self.leg, self.target)
    }
}

pub struct Dispatcher<'a, R: HubRouter> {
    stitcher: RouteStitcher<'a, R>,
    vehicle:  VehicleSpec,
    config:   DispatchConfig,
}

impl<'a, R: HubRouter> Dispatcher<'a, R> {
    pub fn new(graph: &'a GraphStore, router: &'a R, config: &SimConfig) -> Self {
        Self {
            stitcher: RouteStitcher::new(graph, router),
            vehicle:  config.vehicle,
            config:   config.dispatch,
        }
    }

    pub fn graph(&self) -> &'a GraphStore {
        self.stitcher.graph()
    }

    /// Fuel needed to drive the stitched route `from → to`.
    pub fn estimate_resource_cost(&self, from: LocationId, to: LocationId) -> SimResult<f64> {
        let route = self.stitcher.stitch_route(from, to)?;
        Ok(self.vehicle.fuel_for(route.length_m()))
    }

    /// Path cost in metres between two locations.
    ///
    /// Uses the accumulated hub-edge distance; when that is zero (same hub,
    /// or edges without distances) the stitched geometry is measured instead.
    pub fn leg_cost(&self, from: LocationId, to: LocationId) -> SimResult<f64> {
        let path = self.stitcher.hub_path(from, to)?;
        if path.distance_m > 0.0 {
            return Ok(path.distance_m);
        }
        Ok(self.stitcher.stitch_route(from, to)?.length_m())
    }

    /// The fuel stop minimising `cost(from → stop) + cost(stop → to)`.
    ///
    /// Stops unreachable from either side are skipped.  Equal totals go to
    /// the lowest location id.  Any other graph error is returned.
    pub fn select_fuel_stop(
        &self,
        from: LocationId,
        to:   LocationId,
    ) -> SimResult<Option<&'a Location>> {
        self.cheapest_stop(|stop| Ok(self.leg_cost(from, stop)? + self.leg_cost(stop, to)?))
    }

    /// The fuel stop closest to `from` by path cost.
    pub fn nearest_fuel_stop(&self, from: LocationId) -> SimResult<Option<&'a Location>> {
        self.cheapest_stop(|stop| self.leg_cost(from, stop))
    }

    fn cheapest_stop<F>(&self, cost: F) -> SimResult<Option<&'a Location>>
    where
        F: Fn(LocationId) -> SimResult<f64>,
    {
        let mut best: Option<(f64, &'a Location)> = None;
        for stop in self.graph().locations_in(LocationCategory::Fuel) {
            let total = match cost(stop.id) {
                Ok(c) => c,
                Err(SimError::Graph(e @ GraphError::NoRoute { .. })) => {
                    tracing::debug!(stop = %stop.key, error = %e, "fuel stop unreachable, skipped");
                    continue;
                }
                Err(e) => return Err(e),
            };
            // Locations iterate in id order, so strict `<` keeps the lowest id.
            if best.is_none_or(|(c, _)| total < c) {
                best = Some((total, stop));
            }
        }
        Ok(best.map(|(_, stop)| stop))
    }

    /// Decide the next leg for `job`: straight to the destination, or via a
    /// fuel stop when the tank cannot cover the trip plus the safety margin.
    ///
    /// A vehicle that already has a full tank never detours; it goes direct
    /// and the shortfall is logged.
    ///
    /// # Errors
    ///
    /// [`SimError::Graph`] if the destination itself cannot be routed to,
    /// [`SimError::UnreachableDestination`] if a detour is needed and no
    /// fuel stop is reachable.
    pub fn dispatch(&self, vehicle: &Vehicle, job: &Job) -> SimResult<RouteAssignment> {
        let from = vehicle.current_location;
        let to = job.destination;
        let direct = self.stitcher.stitch_route(from, to)?;
        let need = self.vehicle.fuel_for(direct.length_m());

        if vehicle.fuel >= need + self.config.safety_margin {
            return Ok(self.assign(LegKind::Delivering, to, direct));
        }
        if vehicle.is_tank_full() {
            tracing::warn!(
                job = %job.id,
                need,
                capacity = vehicle.spec.fuel_max,
                "full tank cannot cover the leg, driving direct"
            );
            return Ok(self.assign(LegKind::Delivering, to, direct));
        }

        let stop = self
            .select_fuel_stop(from, to)?
            .ok_or(SimError::UnreachableDestination { from, to })?;
        let detour = self.stitcher.stitch_route(from, stop.id)?;
        tracing::info!(
            job = %job.id,
            fuel = vehicle.fuel,
            need,
            stop = %stop.key,
            "refuelling detour"
        );
        Ok(self.assign(LegKind::Refueling, stop.id, detour))
    }

    /// Route to the nearest fuel stop regardless of the current fuel level.
    pub fn plan_refuel(&self, vehicle: &Vehicle) -> SimResult<RouteAssignment> {
        let from = vehicle.current_location;
        let stop = self.nearest_fuel_stop(from)?.ok_or(SimError::NoFuelStop(from))?;
        let route = self.stitcher.stitch_route(from, stop.id)?;
        Ok(self.assign(LegKind::Refueling, stop.id, route))
    }

    fn assign(&self, leg: LegKind, target: LocationId, route: StitchedRoute) -> RouteAssignment {
        let estimated_fuel = self.vehicle.fuel_for(route.length_m());
        RouteAssignment { leg, target, points: route.points, estimated_fuel }
    }
}
