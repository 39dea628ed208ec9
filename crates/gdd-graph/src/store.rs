//! Hub graph storage and builder.
//!
//! # Data layout
//!
//! Hub-to-hub edges use **Compressed Sparse Row (CSR)** format.  Given a
//! `HubId h`, its outgoing edges occupy
//!
//! ```text
//! edge_from[ hub_out_start[h] .. hub_out_start[h+1] ]
//! ```
//!
//! All edge arrays are sorted by source hub (stable, so input order is kept
//! within a hub) and indexed by `EdgeId`.
//!
//! Location links live in a `HashMap` keyed by a structured [`LinkKey`].
//! Every polyline, edge or link, is stored once per direction so lookups
//! never have to reverse anything at query time.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `[lon, lat]` to the nearest `LocationId`.
//! Used to re-anchor a restored session whose location id no longer
//! resolves.

use std::collections::HashMap;

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use serde::{Deserialize, Serialize};

use gdd_core::{EdgeId, GeoPoint, HubId, LocationId, polyline_length_m};

use crate::{GraphError, GraphResult};

// ── Public value types ────────────────────────────────────────────────────────

/// An internal routing node.  Not player-visible.
#[derive(Debug, Clone, PartialEq)]
pub struct Hub {
    pub key: String,
    pub pos: GeoPoint,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationCategory {
    Depot,
    Business,
    Fuel,
    Garage,
    Service,
}

impl LocationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationCategory::Depot    => "depot",
            LocationCategory::Business => "business",
            LocationCategory::Fuel     => "fuel",
            LocationCategory::Garage   => "garage",
            LocationCategory::Service  => "service",
        }
    }
}

impl std::fmt::Display for LocationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A player-facing point of interest, attached to exactly one hub.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id:       LocationId,
    pub key:      String,
    pub name:     String,
    pub category: LocationCategory,
    pub pos:      GeoPoint,
    pub hub:      HubId,
}

/// One end of a location link.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Hub(HubId),
    Location(LocationId),
}

/// Ordered `(from, to)` pair identifying a directed location link.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinkKey {
    pub from: Endpoint,
    pub to:   Endpoint,
}

impl LinkKey {
    #[inline]
    pub fn new(from: Endpoint, to: Endpoint) -> Self {
        Self { from, to }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        Self { from: self.to, to: self.from }
    }
}

/// Borrowed view of one directed hub-to-hub edge.
#[derive(Copy, Clone, Debug)]
pub struct HubEdge<'a> {
    pub id:         EdgeId,
    pub from:       HubId,
    pub to:         HubId,
    pub distance_m: f64,
    pub duration_s: f64,
    /// Ordered from `from` to `to`.
    pub polyline:   &'a [GeoPoint],
}

// ── R-tree location entry ─────────────────────────────────────────────────────

#[derive(Clone)]
struct LocationEntry {
    point: [f64; 2], // [lon, lat]
    id:    LocationId,
}

impl RTreeObject for LocationEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for LocationEntry {
    /// Squared Euclidean distance in lon/lat space.  Good enough for picking
    /// the closest of a handful of city-scale locations.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlon = self.point[0] - point[0];
        let dlat = self.point[1] - point[1];
        dlon * dlon + dlat * dlat
    }
}

// ── GraphStore ────────────────────────────────────────────────────────────────

/// Read-only hub graph, location table, and link geometry.
///
/// Do not construct directly; use [`GraphStoreBuilder`] or
/// [`GraphStore::load`].
pub struct GraphStore {
    // ── Hubs ──────────────────────────────────────────────────────────────
    pub hubs: Vec<Hub>,
    hub_index: HashMap<String, HubId>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// Outgoing edges of hub `h` are at EdgeIds
    /// `hub_out_start[h] .. hub_out_start[h+1]`.  Length = `hub_count + 1`.
    pub hub_out_start: Vec<u32>,

    pub edge_from:       Vec<HubId>,
    pub edge_to:         Vec<HubId>,
    pub edge_distance_m: Vec<f64>,
    pub edge_duration_s: Vec<f64>,
    pub edge_polyline:   Vec<Vec<GeoPoint>>,

    // ── Locations and links ───────────────────────────────────────────────
    pub locations: Vec<Location>,
    location_index: HashMap<String, LocationId>,
    links: HashMap<LinkKey, Vec<GeoPoint>>,

    spatial_idx: RTree<LocationEntry>,
}

impl GraphStore {
    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn hub_count(&self) -> usize {
        self.hubs.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hubs.is_empty()
    }

    // ── Hubs and edges ────────────────────────────────────────────────────

    pub fn hub(&self, id: HubId) -> Option<&Hub> {
        self.hubs.get(id.index())
    }

    /// Position of a hub.  Panics on an id that did not come from this store.
    #[inline]
    pub fn hub_pos(&self, id: HubId) -> GeoPoint {
        self.hubs[id.index()].pos
    }

    pub fn hub_by_key(&self, key: &str) -> Option<HubId> {
        self.hub_index.get(key).copied()
    }

    pub fn edge(&self, id: EdgeId) -> HubEdge<'_> {
        let i = id.index();
        HubEdge {
            id,
            from:       self.edge_from[i],
            to:         self.edge_to[i],
            distance_m: self.edge_distance_m[i],
            duration_s: self.edge_duration_s[i],
            polyline:   &self.edge_polyline[i],
        }
    }

    /// All outgoing directed edges from `hub`.  Empty for an isolated or
    /// unknown hub.
    pub fn neighbors(&self, hub: HubId) -> impl Iterator<Item = HubEdge<'_>> + '_ {
        let (start, end) = if hub.index() < self.hub_count() {
            (
                self.hub_out_start[hub.index()] as usize,
                self.hub_out_start[hub.index() + 1] as usize,
            )
        } else {
            (0, 0)
        };
        (start..end).map(move |i| self.edge(EdgeId(i as u32)))
    }

    // ── Locations ─────────────────────────────────────────────────────────

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id.index())
    }

    pub fn location_by_key(&self, key: &str) -> Option<LocationId> {
        self.location_index.get(key).copied()
    }

    /// The hub a location is attached to.
    pub fn location_hub(&self, id: LocationId) -> GraphResult<HubId> {
        self.location(id)
            .map(|l| l.hub)
            .ok_or(GraphError::UnknownLocation(id))
    }

    pub fn locations_in(
        &self,
        category: LocationCategory,
    ) -> impl Iterator<Item = &Location> + '_ {
        self.locations.iter().filter(move |l| l.category == category)
    }

    /// Exact-match lookup of the directed link polyline `from → to`.
    pub fn link(&self, from: Endpoint, to: Endpoint) -> Option<&[GeoPoint]> {
        self.links.get(&LinkKey::new(from, to)).map(Vec::as_slice)
    }

    /// The location closest to `pos`.  `None` only if there are no locations.
    pub fn nearest_location(&self, pos: GeoPoint) -> Option<LocationId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lon, pos.lat])
            .map(|e| e.id)
    }
}

// ── GraphStoreBuilder ─────────────────────────────────────────────────────────

/// Construct a [`GraphStore`] incrementally, then call [`build`](Self::build).
///
/// Hubs must be added before the edges, locations, and links that refer to
/// them.  `build()` sorts edges by source hub, constructs the CSR arrays, and
/// bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use gdd_core::GeoPoint;
/// use gdd_graph::{GraphStoreBuilder, LocationCategory};
///
/// let mut b = GraphStoreBuilder::new();
/// let a = b.add_hub("A", GeoPoint::new(-88.04, 30.69)).unwrap();
/// let c = b.add_hub("C", GeoPoint::new(-88.03, 30.70)).unwrap();
/// b.add_road(a, c, 1_450.0, 95.0, Vec::new()); // straight-line geometry
/// b.add_location("depot", "Depot", LocationCategory::Depot, GeoPoint::new(-88.041, 30.69), a)
///     .unwrap();
/// let graph = b.build();
/// assert_eq!(graph.hub_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// ```
pub struct GraphStoreBuilder {
    hubs:           Vec<Hub>,
    hub_index:      HashMap<String, HubId>,
    raw_edges:      Vec<RawEdge>,
    locations:      Vec<Location>,
    location_index: HashMap<String, LocationId>,
    links:          HashMap<LinkKey, Vec<GeoPoint>>,
}

struct RawEdge {
    from:       HubId,
    to:         HubId,
    distance_m: f64,
    duration_s: f64,
    polyline:   Vec<GeoPoint>,
}

impl GraphStoreBuilder {
    pub fn new() -> Self {
        Self {
            hubs:           Vec::new(),
            hub_index:      HashMap::new(),
            raw_edges:      Vec::new(),
            locations:      Vec::new(),
            location_index: HashMap::new(),
            links:          HashMap::new(),
        }
    }

    /// Add a hub and return its `HubId` (sequential from 0).
    pub fn add_hub(&mut self, key: impl Into<String>, pos: GeoPoint) -> GraphResult<HubId> {
        let key = key.into();
        if !pos.is_finite() {
            return Err(GraphError::DataIntegrity(format!("hub {key} has non-finite coordinates")));
        }
        if self.hub_index.contains_key(&key) {
            return Err(GraphError::DataIntegrity(format!("duplicate hub id {key}")));
        }
        let id = HubId(self.hubs.len() as u32);
        self.hub_index.insert(key.clone(), id);
        self.hubs.push(Hub { key, pos });
        Ok(id)
    }

    pub fn hub_by_key(&self, key: &str) -> Option<HubId> {
        self.hub_index.get(key).copied()
    }

    pub fn location_by_key(&self, key: &str) -> Option<LocationId> {
        self.location_index.get(key).copied()
    }

    /// The hub a location was attached to.
    pub fn location_hub(&self, id: LocationId) -> Option<HubId> {
        self.locations.get(id.index()).map(|l| l.hub)
    }

    pub fn hub_count(&self) -> usize { self.hubs.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Add a **directed** edge from `from` to `to`.
    ///
    /// A polyline with fewer than two points is replaced by the straight
    /// segment between the hubs.  A zero distance is replaced by the
    /// polyline's great-circle length so that the A* heuristic stays
    /// admissible.
    pub fn add_directed_edge(
        &mut self,
        from:       HubId,
        to:         HubId,
        distance_m: f64,
        duration_s: f64,
        polyline:   Vec<GeoPoint>,
    ) {
        let polyline = if polyline.len() < 2 {
            vec![self.hubs[from.index()].pos, self.hubs[to.index()].pos]
        } else {
            polyline
        };
        let distance_m = if distance_m > 0.0 {
            distance_m
        } else {
            polyline_length_m(&polyline)
        };
        self.raw_edges.push(RawEdge { from, to, distance_m, duration_s, polyline });
    }

    /// Add edges in **both directions**.  The reverse edge gets the reversed
    /// polyline and identical distance/duration.
    pub fn add_road(
        &mut self,
        a:          HubId,
        b:          HubId,
        distance_m: f64,
        duration_s: f64,
        polyline:   Vec<GeoPoint>,
    ) {
        let mut reversed = polyline.clone();
        reversed.reverse();
        self.add_directed_edge(a, b, distance_m, duration_s, polyline);
        self.add_directed_edge(b, a, distance_m, duration_s, reversed);
    }

    /// Add a location attached to `hub`.
    pub fn add_location(
        &mut self,
        key:      impl Into<String>,
        name:     impl Into<String>,
        category: LocationCategory,
        pos:      GeoPoint,
        hub:      HubId,
    ) -> GraphResult<LocationId> {
        let key = key.into();
        if hub.index() >= self.hubs.len() {
            return Err(GraphError::DataIntegrity(format!("location {key} refers to unknown {hub}")));
        }
        if !pos.is_finite() {
            return Err(GraphError::DataIntegrity(format!(
                "location {key} has non-finite coordinates"
            )));
        }
        if self.location_index.contains_key(&key) {
            return Err(GraphError::DataIntegrity(format!("duplicate location id {key}")));
        }
        let id = LocationId(self.locations.len() as u32);
        self.location_index.insert(key.clone(), id);
        self.locations.push(Location { id, key, name: name.into(), category, pos, hub });
        Ok(id)
    }

    /// Store a link polyline in both directions.  Later links replace
    /// earlier ones for the same endpoint pair.
    pub fn add_link(&mut self, from: Endpoint, to: Endpoint, polyline: Vec<GeoPoint>) {
        let key = LinkKey::new(from, to);
        let mut reversed = polyline.clone();
        reversed.reverse();
        self.links.insert(key, polyline);
        self.links.insert(key.reversed(), reversed);
    }

    /// Consume the builder and produce a [`GraphStore`].
    pub fn build(self) -> GraphStore {
        let hub_count = self.hubs.len();
        let edge_count = self.raw_edges.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:       Vec<HubId> = raw.iter().map(|e| e.from).collect();
        let edge_to:         Vec<HubId> = raw.iter().map(|e| e.to).collect();
        let edge_distance_m: Vec<f64>   = raw.iter().map(|e| e.distance_m).collect();
        let edge_duration_s: Vec<f64>   = raw.iter().map(|e| e.duration_s).collect();

        let mut hub_out_start = vec![0u32; hub_count + 1];
        for e in &raw {
            hub_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=hub_count {
            hub_out_start[i] += hub_out_start[i - 1];
        }
        debug_assert_eq!(hub_out_start[hub_count] as usize, edge_count);

        let edge_polyline: Vec<Vec<GeoPoint>> = raw.into_iter().map(|e| e.polyline).collect();

        let entries: Vec<LocationEntry> = self
            .locations
            .iter()
            .map(|l| LocationEntry { point: [l.pos.lon, l.pos.lat], id: l.id })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        GraphStore {
            hubs: self.hubs,
            hub_index: self.hub_index,
            hub_out_start,
            edge_from,
            edge_to,
            edge_distance_m,
            edge_duration_s,
            edge_polyline,
            locations: self.locations,
            location_index: self.location_index,
            links: self.links,
            spatial_idx,
        }
    }
}

impl Default for GraphStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
