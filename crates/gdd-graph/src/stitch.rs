//! Route stitching: location → hub → … → hub → location as one polyline.

use gdd_core::{GeoPoint, LocationId, polyline_length_m};

use crate::router::{HubPath, HubRouter};
use crate::store::{Endpoint, GraphStore, Location};
use crate::{GraphError, GraphResult};

/// A stitched route together with the hub path it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchedRoute {
    pub points:   Vec<GeoPoint>,
    pub hub_path: HubPath,
}

impl StitchedRoute {
    /// Great-circle length of the stitched geometry in metres.
    pub fn length_m(&self) -> f64 {
        polyline_length_m(&self.points)
    }
}

/// Composes location-link and hub-edge geometry into a single continuous
/// polyline.
///
/// Stitching only reads the graph, so it is safe to call repeatedly for
/// estimation without committing to a route.
pub struct RouteStitcher<'a, R: HubRouter> {
    graph:  &'a GraphStore,
    router: &'a R,
}

impl<'a, R: HubRouter> RouteStitcher<'a, R> {
    pub fn new(graph: &'a GraphStore, router: &'a R) -> Self {
        Self { graph, router }
    }

    pub fn graph(&self) -> &'a GraphStore {
        self.graph
    }

    /// Hub path between the hubs of two locations.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownLocation`] for an id outside the store,
    /// [`GraphError::NoRoute`] if the hubs are disconnected.
    pub fn hub_path(&self, from: LocationId, to: LocationId) -> GraphResult<HubPath> {
        let from_hub = self.graph.location_hub(from)?;
        let to_hub = self.graph.location_hub(to)?;
        self.router
            .find_hub_path(self.graph, from_hub, to_hub)
            .ok_or(GraphError::NoRoute { from: from_hub, to: to_hub })
    }

    /// Coordinates of the full route from `from` to `to`.
    pub fn stitch(&self, from: LocationId, to: LocationId) -> GraphResult<Vec<GeoPoint>> {
        self.stitch_route(from, to).map(|r| r.points)
    }

    /// Like [`stitch`](Self::stitch) but also returns the hub path.
    ///
    /// # Errors
    ///
    /// As [`hub_path`](Self::hub_path), plus [`GraphError::DegenerateRoute`]
    /// if fewer than two points result.
    pub fn stitch_route(&self, from: LocationId, to: LocationId) -> GraphResult<StitchedRoute> {
        let hub_path = self.hub_path(from, to)?;
        let origin = self.location(from)?;
        let dest = self.location(to)?;

        // Consecutive edges share an endpoint by construction; drop the
        // repeated first point of every edge after the first.
        let mut hub_leg: Vec<GeoPoint> = Vec::new();
        for (i, &edge) in hub_path.edges.iter().enumerate() {
            let poly = self.graph.edge(edge).polyline;
            let skip = usize::from(i > 0);
            hub_leg.extend_from_slice(&poly[skip.min(poly.len())..]);
        }

        let mut points = self.access_leg(origin);
        join(&mut points, &hub_leg);
        join(&mut points, &self.egress_leg(dest));

        if points.len() < 2 {
            return Err(GraphError::DegenerateRoute { points: points.len() });
        }
        tracing::debug!(
            from = %origin.key,
            to = %dest.key,
            hubs = hub_path.hubs.len(),
            points = points.len(),
            "stitched route"
        );
        Ok(StitchedRoute { points, hub_path })
    }

    fn location(&self, id: LocationId) -> GraphResult<&'a Location> {
        self.graph.location(id).ok_or(GraphError::UnknownLocation(id))
    }

    /// Location → its hub: the real link if one was loaded, else a straight
    /// segment.
    fn access_leg(&self, loc: &Location) -> Vec<GeoPoint> {
        self.graph
            .link(Endpoint::Location(loc.id), Endpoint::Hub(loc.hub))
            .map(<[GeoPoint]>::to_vec)
            .unwrap_or_else(|| vec![loc.pos, self.graph.hub_pos(loc.hub)])
    }

    fn egress_leg(&self, loc: &Location) -> Vec<GeoPoint> {
        self.graph
            .link(Endpoint::Hub(loc.hub), Endpoint::Location(loc.id))
            .map(<[GeoPoint]>::to_vec)
            .unwrap_or_else(|| vec![self.graph.hub_pos(loc.hub), loc.pos])
    }
}

/// Append `piece`, dropping its first point when it repeats the current end.
fn join(points: &mut Vec<GeoPoint>, piece: &[GeoPoint]) {
    let skip = match (points.last(), piece.first()) {
        (Some(last), Some(first)) if last == first => 1,
        _ => 0,
    };
    points.extend_from_slice(&piece[skip.min(piece.len())..]);
}
