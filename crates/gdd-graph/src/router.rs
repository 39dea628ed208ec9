//! Hub routing trait and default A* implementation.
//!
//! # Pluggability
//!
//! The stitcher and dispatcher call routing through the [`HubRouter`]
//! trait, so a different search (plain Dijkstra, precomputed all-pairs
//! tables) can be swapped in without touching them.
//!
//! # Cost units
//!
//! Path cost is accumulated edge `distance_m` in metres.  The heuristic is
//! the haversine distance to the goal hub, which never exceeds the road
//! distance and is consistent with it.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use gdd_core::{EdgeId, HubId};

use crate::store::GraphStore;

// ── HubPath ───────────────────────────────────────────────────────────────────

/// An ordered hub sequence from start to goal plus the edges between them.
#[derive(Debug, Clone, PartialEq)]
pub struct HubPath {
    /// Hubs in travel order; always starts with the start hub.
    pub hubs: Vec<HubId>,
    /// `edges[i]` connects `hubs[i]` to `hubs[i + 1]`.
    pub edges: Vec<EdgeId>,
    /// Accumulated edge distance in metres.
    pub distance_m: f64,
}

impl HubPath {
    /// `true` if start and goal are the same hub.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── HubRouter trait ───────────────────────────────────────────────────────────

pub trait HubRouter {
    /// Shortest hub path from `start` to `goal`.
    ///
    /// Returns `None` when no path exists.  That is an expected outcome on a
    /// disconnected graph, not an error.  `start == goal` yields `[start]`.
    fn find_hub_path(&self, graph: &GraphStore, start: HubId, goal: HubId) -> Option<HubPath>;
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// A* over the hub graph.
///
/// Among frontier entries with equal `f = g + h` the lowest `HubId` is
/// expanded first, so equal-cost alternatives resolve the same way on every
/// run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarRouter;

impl HubRouter for AStarRouter {
    fn find_hub_path(&self, graph: &GraphStore, start: HubId, goal: HubId) -> Option<HubPath> {
        astar(graph, start, goal)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

/// Totally ordered `f64` for heap keys.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn astar(graph: &GraphStore, start: HubId, goal: HubId) -> Option<HubPath> {
    let n = graph.hub_count();
    if start.index() >= n || goal.index() >= n {
        return None;
    }
    if start == goal {
        return Some(HubPath { hubs: vec![start], edges: vec![], distance_m: 0.0 });
    }

    let goal_pos = graph.hub_pos(goal);
    let h = |hub: HubId| graph.hub_pos(hub).distance_m(goal_pos);

    // g[v] = best known accumulated distance to v.
    let mut g = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];
    g[start.index()] = 0.0;

    // Min-heap on (f, hub, g).  The hub in second position is the tie-break.
    let mut frontier: BinaryHeap<Reverse<(Cost, HubId, Cost)>> = BinaryHeap::new();
    frontier.push(Reverse((Cost(h(start)), start, Cost(0.0))));

    while let Some(Reverse((_, hub, Cost(cost)))) = frontier.pop() {
        // Superseded by a cheaper re-admission.
        if cost > g[hub.index()] {
            continue;
        }
        if hub == goal {
            return Some(reconstruct(graph, &prev_edge, start, goal, cost));
        }

        for edge in graph.neighbors(hub) {
            let tentative = cost + edge.distance_m;
            if tentative < g[edge.to.index()] {
                g[edge.to.index()] = tentative;
                prev_edge[edge.to.index()] = edge.id;
                frontier.push(Reverse((Cost(tentative + h(edge.to)), edge.to, Cost(tentative))));
            }
        }
    }

    tracing::debug!(%start, %goal, "hub frontier exhausted without reaching goal");
    None
}

fn reconstruct(
    graph:     &GraphStore,
    prev_edge: &[EdgeId],
    start:     HubId,
    goal:      HubId,
    total_m:   f64,
) -> HubPath {
    let mut edges = Vec::new();
    let mut cur = goal;
    while cur != start {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();

    let mut hubs = Vec::with_capacity(edges.len() + 1);
    hubs.push(start);
    hubs.extend(edges.iter().map(|&e| graph.edge_to[e.index()]));

    HubPath { hubs, edges, distance_m: total_m }
}
