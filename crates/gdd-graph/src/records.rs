//! JSON graph input.
//!
//! # File layout
//!
//! The offline routing tool writes one directory of JSON files:
//!
//! | File                        | Shape                              | Required |
//! |-----------------------------|------------------------------------|----------|
//! | `hubs.json`                 | `{"hubs": [HubRecord]}`            | yes      |
//! | `edges.json`                | `{"edges": [EdgeRecord]}`          | yes*     |
//! | `edges.real.json`           | `{"edges": [EdgeRecord]}`          | no       |
//! | `locations.json`            | `{"locations": [LocationRecord]}`  | yes      |
//! | `location_links.real.json`  | `{"links": [LinkRecord]}`          | no       |
//!
//! \* `edges.real.json` (road-following polylines) is preferred when present;
//! otherwise the base `edges.json` is used.  Without a links file every
//! location falls back to a straight segment to its hub.  Neither fallback
//! is an error.
//!
//! Coordinates are `[lng, lat]` pairs throughout.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use gdd_core::GeoPoint;

use crate::store::{Endpoint, GraphStore, GraphStoreBuilder, LocationCategory};
use crate::{GraphError, GraphResult};

// ── Records ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubRecord {
    pub id:  String,
    pub lng: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to:   String,
    #[serde(default)]
    pub distance_m: f64,
    #[serde(default)]
    pub duration_s: f64,
    #[serde(default)]
    pub polyline: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id:   String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: LocationCategory,
    pub lng: f64,
    pub lat: f64,
    #[serde(rename = "hubId")]
    pub hub_id: String,
}

/// A location↔hub polyline.  Distance and duration are carried for parity
/// with the tool output but are not used: link cost is always measured from
/// the geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub from: String,
    pub to:   String,
    #[serde(default)]
    pub distance_m: f64,
    #[serde(default)]
    pub duration_s: f64,
    #[serde(default)]
    pub polyline: Vec<[f64; 2]>,
}

#[derive(Deserialize)]
struct HubsFile {
    hubs: Vec<HubRecord>,
}

#[derive(Deserialize)]
struct EdgesFile {
    edges: Vec<EdgeRecord>,
}

#[derive(Deserialize)]
struct LocationsFile {
    locations: Vec<LocationRecord>,
}

#[derive(Deserialize)]
struct LinksFile {
    links: Vec<LinkRecord>,
}

fn to_polyline(raw: &[[f64; 2]]) -> Vec<GeoPoint> {
    raw.iter().copied().map(GeoPoint::from_lng_lat).collect()
}

// ── GraphStore::load ──────────────────────────────────────────────────────────

impl GraphStore {
    /// Build a store from already-parsed input records.
    ///
    /// # Errors
    ///
    /// [`GraphError::DataIntegrity`] on duplicate hub or location ids, on a
    /// location whose hub is missing, or on a negative / non-finite edge
    /// distance or duration.
    ///
    /// Edges naming an unknown endpoint are dropped with a warning, as are
    /// links that do not join a location to the hub it is attached to.
    pub fn load(
        hubs:      Vec<HubRecord>,
        edges:     Vec<EdgeRecord>,
        locations: Vec<LocationRecord>,
        links:     Vec<LinkRecord>,
    ) -> GraphResult<GraphStore> {
        let mut b = GraphStoreBuilder::new();

        for h in hubs {
            b.add_hub(h.id, GeoPoint::new(h.lng, h.lat))?;
        }

        let mut dropped = 0usize;
        for e in edges {
            let (Some(from), Some(to)) = (b.hub_by_key(&e.from), b.hub_by_key(&e.to)) else {
                tracing::warn!(from = %e.from, to = %e.to, "dropping edge with unknown hub endpoint");
                dropped += 1;
                continue;
            };
            for (what, v) in [("distance_m", e.distance_m), ("duration_s", e.duration_s)] {
                if !(v.is_finite() && v >= 0.0) {
                    return Err(GraphError::DataIntegrity(format!(
                        "edge {} -> {} has invalid {what} {v}",
                        e.from, e.to
                    )));
                }
            }
            b.add_road(from, to, e.distance_m, e.duration_s, to_polyline(&e.polyline));
        }

        for l in locations {
            let hub = b.hub_by_key(&l.hub_id).ok_or_else(|| {
                GraphError::DataIntegrity(format!("location {} refers to missing hub {}", l.id, l.hub_id))
            })?;
            b.add_location(l.id, l.name, l.category, GeoPoint::new(l.lng, l.lat), hub)?;
        }

        for link in links {
            let Some((from, to)) = resolve_link(&b, &link.from, &link.to) else {
                tracing::warn!(
                    from = %link.from,
                    to = %link.to,
                    "dropping link that does not join a location to its own hub"
                );
                continue;
            };
            if link.polyline.len() < 2 {
                tracing::warn!(from = %link.from, to = %link.to, "dropping link with fewer than 2 points");
                continue;
            }
            b.add_link(from, to, to_polyline(&link.polyline));
        }

        let store = b.build();
        tracing::info!(
            hubs = store.hub_count(),
            edges = store.edge_count(),
            locations = store.location_count(),
            links = store.link_count(),
            dropped_edges = dropped,
            "graph loaded"
        );
        Ok(store)
    }
}

/// Resolve a link record to `(location, hub)` or `(hub, location)` endpoints.
///
/// Hub and location keys live in separate namespaces and may collide, so
/// each side is read against the location's own `hubId` rather than looked
/// up in one shared table.  Either orientation is accepted.
fn resolve_link(b: &GraphStoreBuilder, from: &str, to: &str) -> Option<(Endpoint, Endpoint)> {
    let as_access = |loc_key: &str, hub_key: &str| {
        let loc = b.location_by_key(loc_key)?;
        let hub = b.hub_by_key(hub_key)?;
        (b.location_hub(loc)? == hub).then_some((loc, hub))
    };
    if let Some((loc, hub)) = as_access(from, to) {
        return Some((Endpoint::Location(loc), Endpoint::Hub(hub)));
    }
    as_access(to, from).map(|(loc, hub)| (Endpoint::Hub(hub), Endpoint::Location(loc)))
}

// ── Directory loader ──────────────────────────────────────────────────────────

/// The concrete files chosen for a data directory after applying fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSources {
    pub hubs:      PathBuf,
    pub edges:     PathBuf,
    pub locations: PathBuf,
    pub links:     Option<PathBuf>,
}

impl GraphSources {
    /// Resolve file names under `dir`, preferring `.real.json` sources.
    pub fn resolve(dir: &Path) -> Self {
        let real_edges = dir.join("edges.real.json");
        let edges = if real_edges.is_file() {
            real_edges
        } else {
            dir.join("edges.json")
        };
        let links = Some(dir.join("location_links.real.json")).filter(|p| p.is_file());
        Self {
            hubs: dir.join("hubs.json"),
            edges,
            locations: dir.join("locations.json"),
            links,
        }
    }

    pub fn load(&self) -> GraphResult<GraphStore> {
        let hubs: HubsFile = read_json(&self.hubs)?;
        let edges: EdgesFile = read_json(&self.edges)?;
        let locations: LocationsFile = read_json(&self.locations)?;
        let links = match &self.links {
            Some(path) => read_json::<LinksFile>(path)?.links,
            None => {
                tracing::info!("no location link file, using straight-line links");
                Vec::new()
            }
        };
        tracing::info!(edges = %self.edges.display(), "edge source");
        GraphStore::load(hubs.hubs, edges.edges, locations.locations, links)
    }
}

/// Load a graph from a data directory (see the module docs for the layout).
pub fn load_dir(dir: &Path) -> GraphResult<GraphStore> {
    GraphSources::resolve(dir).load()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> GraphResult<T> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
