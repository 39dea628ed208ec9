//! Unit tests for gdd-graph.
//!
//! All tests use hand-crafted graphs near (0°, 0°), where 0.0089° of
//! longitude is just under 1 km of great-circle distance.

#[cfg(test)]
mod helpers {
    use gdd_core::{GeoPoint, HubId, LocationId};
    use crate::{GraphStore, GraphStoreBuilder, LocationCategory};

    pub const KM_DEG: f64 = 0.0089;

    /// Hubs A–B–C in a line along the equator, 1000 m road edges.
    /// One location per hub, offset slightly north: `a_depot`, `b_fuel`,
    /// `c_shop`.
    pub fn line_graph() -> (GraphStore, [HubId; 3], [LocationId; 3]) {
        let mut b = GraphStoreBuilder::new();
        let a = b.add_hub("A", GeoPoint::new(0.0, 0.0)).unwrap();
        let bh = b.add_hub("B", GeoPoint::new(KM_DEG, 0.0)).unwrap();
        let c = b.add_hub("C", GeoPoint::new(2.0 * KM_DEG, 0.0)).unwrap();
        b.add_road(a, bh, 1_000.0, 60.0, Vec::new());
        b.add_road(bh, c, 1_000.0, 60.0, Vec::new());

        let la = b
            .add_location("a_depot", "Depot", LocationCategory::Depot, GeoPoint::new(0.0, 0.0005), a)
            .unwrap();
        let lb = b
            .add_location("b_fuel", "Fuel", LocationCategory::Fuel, GeoPoint::new(KM_DEG, 0.0005), bh)
            .unwrap();
        let lc = b
            .add_location("c_shop", "Shop", LocationCategory::Business, GeoPoint::new(2.0 * KM_DEG, 0.0005), c)
            .unwrap();
        (b.build(), [a, bh, c], [la, lb, lc])
    }

    /// Five hubs:
    ///
    /// ```text
    ///   0 ── 1 ── 2
    ///   │         │
    ///   3 ─────── 4
    /// ```
    ///
    /// Distances: 0-1 1000, 1-2 1000, 2-4 1000, 0-3 1000, 3-4 2500.
    /// Shortest 0→4 is 0→1→2→4 (3000 m) vs 0→3→4 (3500 m).
    pub fn loop_graph() -> (GraphStore, [HubId; 5]) {
        let mut b = GraphStoreBuilder::new();
        let h0 = b.add_hub("h0", GeoPoint::new(0.0, 0.0)).unwrap();
        let h1 = b.add_hub("h1", GeoPoint::new(KM_DEG, 0.0)).unwrap();
        let h2 = b.add_hub("h2", GeoPoint::new(2.0 * KM_DEG, 0.0)).unwrap();
        let h3 = b.add_hub("h3", GeoPoint::new(0.0, -KM_DEG)).unwrap();
        let h4 = b.add_hub("h4", GeoPoint::new(2.0 * KM_DEG, -KM_DEG)).unwrap();
        b.add_road(h0, h1, 1_000.0, 60.0, Vec::new());
        b.add_road(h1, h2, 1_000.0, 60.0, Vec::new());
        b.add_road(h2, h4, 1_000.0, 60.0, Vec::new());
        b.add_road(h0, h3, 1_000.0, 60.0, Vec::new());
        b.add_road(h3, h4, 2_500.0, 150.0, Vec::new());
        (b.build(), [h0, h1, h2, h3, h4])
    }

    /// Exhaustive shortest simple-path distance, or `None` if unreachable.
    pub fn brute_force(graph: &GraphStore, start: HubId, goal: HubId) -> Option<f64> {
        fn dfs(g: &GraphStore, cur: HubId, goal: HubId, seen: &mut Vec<bool>, acc: f64, best: &mut Option<f64>) {
            if cur == goal {
                *best = Some(best.map_or(acc, |b: f64| b.min(acc)));
                return;
            }
            for e in g.neighbors(cur) {
                if !seen[e.to.index()] {
                    seen[e.to.index()] = true;
                    dfs(g, e.to, goal, seen, acc + e.distance_m, best);
                    seen[e.to.index()] = false;
                }
            }
        }
        let mut seen = vec![false; graph.hub_count()];
        seen[start.index()] = true;
        let mut best = None;
        dfs(graph, start, goal, &mut seen, 0.0, &mut best);
        best
    }
}

// ── Builder & store structure ─────────────────────────────────────────────────

#[cfg(test)]
mod store {
    use gdd_core::{GeoPoint, HubId, polyline_length_m};
    use crate::{Endpoint, GraphError, GraphStoreBuilder, LocationCategory};

    #[test]
    fn empty_build() {
        let graph = GraphStoreBuilder::new().build();
        assert_eq!(graph.hub_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
        assert!(graph.nearest_location(GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn road_is_stored_in_both_directions() {
        let (graph, [a, b, c], _) = super::helpers::line_graph();
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.neighbors(a).count(), 1);
        assert_eq!(graph.neighbors(b).count(), 2);
        assert!(graph.neighbors(c).all(|e| e.from == c && e.to == b));
    }

    #[test]
    fn isolated_and_unknown_hubs_have_no_neighbors() {
        let mut b = GraphStoreBuilder::new();
        let lone = b.add_hub("lone", GeoPoint::new(1.0, 1.0)).unwrap();
        let graph = b.build();
        assert_eq!(graph.neighbors(lone).count(), 0);
        assert_eq!(graph.neighbors(HubId(99)).count(), 0);
        assert_eq!(graph.hub(lone).map(|h| h.key.as_str()), Some("lone"));
        assert!(graph.hub(HubId(99)).is_none());
    }

    #[test]
    fn reversed_edge_reads_forward_geometry_backwards() {
        let mut b = GraphStoreBuilder::new();
        let a = b.add_hub("a", GeoPoint::new(0.0, 0.0)).unwrap();
        let c = b.add_hub("c", GeoPoint::new(0.01, 0.0)).unwrap();
        let poly = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.004, 0.001),
            GeoPoint::new(0.01, 0.0),
        ];
        b.add_road(a, c, 1_200.0, 80.0, poly.clone());
        let graph = b.build();

        let fwd = graph.neighbors(a).next().unwrap();
        let rev = graph.neighbors(c).next().unwrap();
        assert_eq!((fwd.from, fwd.to), (rev.to, rev.from));
        assert_eq!(fwd.distance_m, rev.distance_m);
        assert_eq!(fwd.duration_s, rev.duration_s);

        let mut round_trip = rev.polyline.to_vec();
        round_trip.reverse();
        assert_eq!(round_trip, poly);
        assert_eq!(fwd.polyline, poly.as_slice());
    }

    #[test]
    fn missing_geometry_falls_back_to_straight_segment() {
        let (graph, [a, b, _], _) = super::helpers::line_graph();
        let e = graph.neighbors(a).next().unwrap();
        assert_eq!(e.polyline, &[graph.hub_pos(a), graph.hub_pos(b)]);
        assert_eq!(e.distance_m, 1_000.0);
    }

    #[test]
    fn zero_distance_is_filled_from_geometry() {
        let mut b = GraphStoreBuilder::new();
        let a = b.add_hub("a", GeoPoint::new(0.0, 0.0)).unwrap();
        let c = b.add_hub("c", GeoPoint::new(0.01, 0.0)).unwrap();
        b.add_road(a, c, 0.0, 0.0, Vec::new());
        let graph = b.build();
        let e = graph.neighbors(a).next().unwrap();
        assert!((e.distance_m - polyline_length_m(e.polyline)).abs() < 1e-9);
        assert!(e.distance_m > 1_000.0);
    }

    #[test]
    fn duplicate_hub_rejected() {
        let mut b = GraphStoreBuilder::new();
        b.add_hub("x", GeoPoint::new(0.0, 0.0)).unwrap();
        let dup = b.add_hub("x", GeoPoint::new(1.0, 0.0));
        assert!(matches!(dup, Err(GraphError::DataIntegrity(_))));
    }

    #[test]
    fn location_on_unknown_hub_rejected() {
        let mut b = GraphStoreBuilder::new();
        let r = b.add_location("l", "L", LocationCategory::Depot, GeoPoint::new(0.0, 0.0), HubId(3));
        assert!(matches!(r, Err(GraphError::DataIntegrity(_))));
    }

    #[test]
    fn link_lookup_is_exact_and_bidirectional() {
        let mut b = GraphStoreBuilder::new();
        let h = b.add_hub("h", GeoPoint::new(0.0, 0.0)).unwrap();
        let l = b
            .add_location("l", "L", LocationCategory::Fuel, GeoPoint::new(0.001, 0.001), h)
            .unwrap();
        let poly = vec![
            GeoPoint::new(0.001, 0.001),
            GeoPoint::new(0.001, 0.0),
            GeoPoint::new(0.0, 0.0),
        ];
        b.add_link(Endpoint::Location(l), Endpoint::Hub(h), poly.clone());
        let graph = b.build();

        assert_eq!(graph.link(Endpoint::Location(l), Endpoint::Hub(h)), Some(poly.as_slice()));
        let back = graph.link(Endpoint::Hub(h), Endpoint::Location(l)).unwrap();
        assert_eq!(back.first(), poly.last());
        assert_eq!(back.last(), poly.first());
        assert!(graph.link(Endpoint::Hub(h), Endpoint::Hub(h)).is_none());
    }

    #[test]
    fn lookups_by_key_and_category() {
        let (graph, [_, b, _], [_, fuel, _]) = super::helpers::line_graph();
        assert_eq!(graph.hub_by_key("B"), Some(b));
        assert_eq!(graph.location_by_key("b_fuel"), Some(fuel));
        assert_eq!(graph.location_hub(fuel).unwrap(), b);
        let fuels: Vec<_> = graph.locations_in(LocationCategory::Fuel).map(|l| l.id).collect();
        assert_eq!(fuels, vec![fuel]);
        assert!(graph.location_by_key("nope").is_none());
    }

    #[test]
    fn nearest_location_snaps() {
        let (graph, _, [a, _, c]) = super::helpers::line_graph();
        assert_eq!(graph.nearest_location(GeoPoint::new(0.0001, 0.0)), Some(a));
        assert_eq!(graph.nearest_location(GeoPoint::new(0.02, 0.0)), Some(c));
    }
}

// ── Loading from records and files ────────────────────────────────────────────

#[cfg(test)]
mod load {
    use std::fs;

    use gdd_core::GeoPoint;

    use crate::{
        EdgeRecord, Endpoint, GraphError, GraphSources, GraphStore, HubRecord, LinkRecord,
        LocationCategory, LocationRecord, load_dir,
    };

    fn hubs() -> Vec<HubRecord> {
        vec![
            HubRecord { id: "A".into(), lng: 0.0, lat: 0.0 },
            HubRecord { id: "B".into(), lng: 0.01, lat: 0.0 },
        ]
    }

    fn edge(from: &str, to: &str) -> EdgeRecord {
        EdgeRecord {
            from: from.into(),
            to: to.into(),
            distance_m: 1_100.0,
            duration_s: 70.0,
            polyline: vec![],
        }
    }

    fn location(id: &str, hub: &str) -> LocationRecord {
        LocationRecord {
            id: id.into(),
            name: id.to_uppercase(),
            category: LocationCategory::Business,
            lng: 0.0,
            lat: 0.001,
            hub_id: hub.into(),
        }
    }

    #[test]
    fn edge_with_unknown_endpoint_is_dropped() {
        let graph = GraphStore::load(
            hubs(),
            vec![edge("A", "B"), edge("A", "GHOST"), edge("GHOST", "B")],
            vec![location("shop", "A")],
            vec![],
        )
        .unwrap();
        assert_eq!(graph.edge_count(), 2);
        let a = graph.hub_by_key("A").unwrap();
        let b = graph.hub_by_key("B").unwrap();
        for hub in [a, b] {
            for e in graph.neighbors(hub) {
                assert!(e.to == a || e.to == b);
            }
        }
    }

    #[test]
    fn location_with_missing_hub_is_fatal() {
        let r = GraphStore::load(hubs(), vec![], vec![location("shop", "Z")], vec![]);
        assert!(matches!(r, Err(GraphError::DataIntegrity(_))));
    }

    #[test]
    fn negative_distance_is_fatal() {
        let mut e = edge("A", "B");
        e.distance_m = -5.0;
        let r = GraphStore::load(hubs(), vec![e], vec![], vec![]);
        assert!(matches!(r, Err(GraphError::DataIntegrity(_))));
    }

    #[test]
    fn short_or_dangling_links_are_dropped() {
        let links = vec![
            LinkRecord {
                from: "shop".into(),
                to: "A".into(),
                distance_m: 0.0,
                duration_s: 0.0,
                polyline: vec![[0.0, 0.001]],
            },
            LinkRecord {
                from: "shop".into(),
                to: "NOWHERE".into(),
                distance_m: 0.0,
                duration_s: 0.0,
                polyline: vec![[0.0, 0.001], [0.0, 0.0]],
            },
        ];
        let graph = GraphStore::load(hubs(), vec![edge("A", "B")], vec![location("shop", "A")], links)
            .unwrap();
        assert_eq!(graph.link_count(), 0);
    }

    fn link(from: &str, to: &str) -> LinkRecord {
        LinkRecord {
            from: from.into(),
            to: to.into(),
            distance_m: 0.0,
            duration_s: 0.0,
            polyline: vec![[0.0, 0.001], [0.0002, 0.0005], [0.0, 0.0]],
        }
    }

    #[test]
    fn link_resolves_against_the_locations_own_hub_when_keys_collide() {
        // "shop" is both a hub key and a location key; "depot" hangs off hub "shop".
        let hubs = vec![
            HubRecord { id: "H".into(), lng: 0.01, lat: 0.0 },
            HubRecord { id: "shop".into(), lng: 0.0, lat: 0.0 },
        ];
        let locations = vec![location("depot", "shop"), location("shop", "H")];
        let graph = GraphStore::load(hubs, vec![], locations, vec![link("depot", "shop")]).unwrap();

        let depot = graph.location_by_key("depot").unwrap();
        let shop_loc = graph.location_by_key("shop").unwrap();
        let shop_hub = graph.hub_by_key("shop").unwrap();
        let poly = graph.link(Endpoint::Location(depot), Endpoint::Hub(shop_hub)).unwrap();
        assert_eq!(poly.len(), 3);
        assert!(graph.link(Endpoint::Location(depot), Endpoint::Location(shop_loc)).is_none());
        assert_eq!(graph.link_count(), 2);
    }

    #[test]
    fn hub_first_link_and_foreign_hub_link() {
        let graph = GraphStore::load(
            hubs(),
            vec![edge("A", "B")],
            vec![location("shop", "A")],
            vec![link("A", "shop"), link("shop", "B")],
        )
        .unwrap();
        let shop = graph.location_by_key("shop").unwrap();
        let a = graph.hub_by_key("A").unwrap();
        let b = graph.hub_by_key("B").unwrap();

        // Stored as written, and read backwards for the access direction.
        let hub_first = graph.link(Endpoint::Hub(a), Endpoint::Location(shop)).unwrap();
        assert_eq!(hub_first.first(), Some(&GeoPoint::new(0.0, 0.001)));
        let access = graph.link(Endpoint::Location(shop), Endpoint::Hub(a)).unwrap();
        assert_eq!(access.first(), Some(&GeoPoint::new(0.0, 0.0)));
        // B is not shop's hub, so that link is dropped.
        assert!(graph.link(Endpoint::Location(shop), Endpoint::Hub(b)).is_none());
        assert_eq!(graph.link_count(), 2);
    }

    #[test]
    fn load_dir_prefers_real_edges_and_tolerates_missing_links() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("hubs.json"),
            r#"{"hubs":[{"id":"A","lng":0.0,"lat":0.0},{"id":"B","lng":0.01,"lat":0.0}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("edges.json"),
            r#"{"edges":[{"from":"A","to":"B","distance_m":5000,"duration_s":300,"polyline":[]}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("edges.real.json"),
            r#"{"edges":[{"from":"A","to":"B","distance_m":1150,"duration_s":90,
                "polyline":[[0.0,0.0],[0.005,0.0005],[0.01,0.0]]}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("locations.json"),
            r#"{"locations":[{"id":"gas","name":"Gas","type":"fuel","lng":0.0,"lat":0.001,"hubId":"A"}]}"#,
        )
        .unwrap();

        let sources = GraphSources::resolve(dir.path());
        assert!(sources.edges.ends_with("edges.real.json"));
        assert!(sources.links.is_none());

        let graph = load_dir(dir.path()).unwrap();
        let a = graph.hub_by_key("A").unwrap();
        let e = graph.neighbors(a).next().unwrap();
        assert_eq!(e.distance_m, 1_150.0);
        assert_eq!(e.polyline.len(), 3);
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn load_dir_reads_links_when_present() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hubs.json"), r#"{"hubs":[{"id":"A","lng":0.0,"lat":0.0}]}"#).unwrap();
        fs::write(dir.path().join("edges.json"), r#"{"edges":[]}"#).unwrap();
        fs::write(
            dir.path().join("locations.json"),
            r#"{"locations":[{"id":"gas","name":"Gas","type":"fuel","lng":0.0,"lat":0.001,"hubId":"A"}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("location_links.real.json"),
            r#"{"links":[{"from":"gas","to":"A","distance_m":120,"duration_s":10,
                "polyline":[[0.0,0.001],[0.0005,0.0005],[0.0,0.0]]}]}"#,
        )
        .unwrap();

        let graph = load_dir(dir.path()).unwrap();
        assert_eq!(graph.link_count(), 2);
    }

    #[test]
    fn missing_required_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_dir(dir.path()), Err(GraphError::Io(_))));
    }

    #[test]
    fn unknown_category_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hubs.json"), r#"{"hubs":[{"id":"A","lng":0.0,"lat":0.0}]}"#).unwrap();
        fs::write(dir.path().join("edges.json"), r#"{"edges":[]}"#).unwrap();
        fs::write(
            dir.path().join("locations.json"),
            r#"{"locations":[{"id":"x","name":"X","type":"spaceport","lng":0.0,"lat":0.0,"hubId":"A"}]}"#,
        )
        .unwrap();
        assert!(matches!(load_dir(dir.path()), Err(GraphError::Json(_))));
    }
}

// ── A* routing ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use gdd_core::{GeoPoint, HubId};
    use crate::{AStarRouter, GraphStoreBuilder, HubRouter};

    #[test]
    fn same_hub_is_single_element_path() {
        let (graph, [h0, ..]) = super::helpers::loop_graph();
        let p = AStarRouter.find_hub_path(&graph, h0, h0).unwrap();
        assert_eq!(p.hubs, vec![h0]);
        assert!(p.is_trivial());
        assert_eq!(p.distance_m, 0.0);
    }

    #[test]
    fn shortest_path_correct() {
        let (graph, [h0, h1, h2, _, h4]) = super::helpers::loop_graph();
        let p = AStarRouter.find_hub_path(&graph, h0, h4).unwrap();
        assert_eq!(p.hubs, vec![h0, h1, h2, h4]);
        assert_eq!(p.edges.len(), 3);
        assert_eq!(p.distance_m, 3_000.0);
        for (i, &e) in p.edges.iter().enumerate() {
            assert_eq!(graph.edge_from[e.index()], p.hubs[i]);
            assert_eq!(graph.edge_to[e.index()], p.hubs[i + 1]);
        }
    }

    #[test]
    fn matches_brute_force_on_every_pair() {
        let (graph, hubs) = super::helpers::loop_graph();
        for &s in &hubs {
            for &t in &hubs {
                let astar = AStarRouter.find_hub_path(&graph, s, t).map(|p| p.distance_m);
                let brute = super::helpers::brute_force(&graph, s, t);
                match (astar, brute) {
                    (Some(a), Some(b)) => assert!((a - b).abs() < 1e-6, "{s}->{t}: {a} vs {b}"),
                    (None, None) => {}
                    other => panic!("{s}->{t}: reachability mismatch {other:?}"),
                }
            }
        }
    }

    #[test]
    fn matches_brute_force_on_dense_graph() {
        // Six hubs on a small ring with chords; road distances are the
        // straight-line length scaled by per-edge detour factors.
        let mut b = GraphStoreBuilder::new();
        let pts = [
            (0.0, 0.0), (0.01, 0.002), (0.02, 0.0),
            (0.02, -0.01), (0.01, -0.012), (0.0, -0.01),
        ];
        let hubs: Vec<HubId> = pts
            .iter()
            .enumerate()
            .map(|(i, &(lon, lat))| b.add_hub(format!("r{i}"), GeoPoint::new(lon, lat)).unwrap())
            .collect();
        let pairs = [(0, 1, 1.1), (1, 2, 1.4), (2, 3, 1.0), (3, 4, 1.2), (4, 5, 1.05),
                     (5, 0, 1.3), (0, 3, 1.6), (1, 4, 1.1), (2, 5, 2.0)];
        for (i, j, detour) in pairs {
            let d = GeoPoint::new(pts[i].0, pts[i].1).distance_m(GeoPoint::new(pts[j].0, pts[j].1));
            b.add_road(hubs[i], hubs[j], d * detour, 0.0, Vec::new());
        }
        let graph = b.build();

        for &s in &hubs {
            for &t in &hubs {
                let a = AStarRouter.find_hub_path(&graph, s, t).unwrap().distance_m;
                let r = super::helpers::brute_force(&graph, s, t).unwrap();
                assert!((a - r).abs() < 1e-6, "{s}->{t}: {a} vs {r}");
            }
        }
    }

    #[test]
    fn disconnected_returns_none() {
        let mut b = GraphStoreBuilder::new();
        let a = b.add_hub("a", GeoPoint::new(0.0, 0.0)).unwrap();
        let c = b.add_hub("c", GeoPoint::new(0.0, 0.01)).unwrap();
        let graph = b.build();
        assert!(AStarRouter.find_hub_path(&graph, a, c).is_none());
        assert!(AStarRouter.find_hub_path(&graph, a, HubId(42)).is_none());
    }

    #[test]
    fn one_way_blocks_return() {
        let mut b = GraphStoreBuilder::new();
        let a = b.add_hub("a", GeoPoint::new(0.0, 0.0)).unwrap();
        let c = b.add_hub("c", GeoPoint::new(0.01, 0.0)).unwrap();
        b.add_directed_edge(a, c, 1_200.0, 60.0, Vec::new());
        let graph = b.build();
        assert!(AStarRouter.find_hub_path(&graph, a, c).is_some());
        assert!(AStarRouter.find_hub_path(&graph, c, a).is_none());
    }

    #[test]
    fn equal_cost_tie_prefers_lowest_hub_id() {
        // Diamond: s → {m1, m2} → t with identical geometry and distances.
        // m1 and m2 sit at the same point so their f-costs tie exactly.
        let mut b = GraphStoreBuilder::new();
        let s = b.add_hub("s", GeoPoint::new(0.0, 0.0)).unwrap();
        let m_low = b.add_hub("m_low", GeoPoint::new(0.01, 0.0)).unwrap();
        let m_high = b.add_hub("m_high", GeoPoint::new(0.01, 0.0)).unwrap();
        let t = b.add_hub("t", GeoPoint::new(0.02, 0.0)).unwrap();
        // Insert the higher id's edges first so insertion order can't explain the result.
        b.add_road(s, m_high, 1_200.0, 0.0, Vec::new());
        b.add_road(m_high, t, 1_200.0, 0.0, Vec::new());
        b.add_road(s, m_low, 1_200.0, 0.0, Vec::new());
        b.add_road(m_low, t, 1_200.0, 0.0, Vec::new());
        let graph = b.build();

        for _ in 0..3 {
            let p = AStarRouter.find_hub_path(&graph, s, t).unwrap();
            assert_eq!(p.hubs, vec![s, m_low, t]);
        }
    }
}

// ── Stitching ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stitching {
    use gdd_core::{GeoPoint, LocationId, polyline_length_m};
    use crate::{AStarRouter, Endpoint, GraphError, GraphStoreBuilder, LocationCategory, RouteStitcher};

    #[test]
    fn straight_fallback_route_shape() {
        let (graph, [a, b, c], [la, _, lc]) = super::helpers::line_graph();
        let stitcher = RouteStitcher::new(&graph, &AStarRouter);
        let pts = stitcher.stitch(la, lc).unwrap();

        // depot, A, B, C, shop: edge endpoints deduplicated at every join.
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], graph.location(la).unwrap().pos);
        assert_eq!(pts[1], graph.hub_pos(a));
        assert_eq!(pts[2], graph.hub_pos(b));
        assert_eq!(pts[3], graph.hub_pos(c));
        assert_eq!(pts[4], graph.location(lc).unwrap().pos);
        for w in pts.windows(2) {
            assert_ne!(w[0], w[1]);
        }
    }

    #[test]
    fn stitch_is_pure() {
        let (graph, _, [la, lb, lc]) = super::helpers::line_graph();
        let stitcher = RouteStitcher::new(&graph, &AStarRouter);
        for (f, t) in [(la, lc), (lc, la), (lb, lb)] {
            assert_eq!(stitcher.stitch(f, t).unwrap(), stitcher.stitch(f, t).unwrap());
        }
    }

    #[test]
    fn same_hub_route_goes_via_the_hub() {
        let (graph, [_, b, _], [_, lb, _]) = super::helpers::line_graph();
        let stitcher = RouteStitcher::new(&graph, &AStarRouter);
        let r = stitcher.stitch_route(lb, lb).unwrap();
        assert!(r.hub_path.is_trivial());
        assert_eq!(r.points.len(), 3);
        assert_eq!(r.points[1], graph.hub_pos(b));
    }

    #[test]
    fn real_links_replace_straight_segments() {
        let mut b = GraphStoreBuilder::new();
        let h0 = b.add_hub("h0", GeoPoint::new(0.0, 0.0)).unwrap();
        let h1 = b.add_hub("h1", GeoPoint::new(0.01, 0.0)).unwrap();
        let road = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.005, 0.001), GeoPoint::new(0.01, 0.0)];
        b.add_road(h0, h1, 0.0, 0.0, road);
        let l0 = b
            .add_location("l0", "L0", LocationCategory::Depot, GeoPoint::new(0.0, 0.002), h0)
            .unwrap();
        let l1 = b
            .add_location("l1", "L1", LocationCategory::Service, GeoPoint::new(0.01, 0.002), h1)
            .unwrap();
        // Only l0 has a real link; l1 uses the straight fallback.
        b.add_link(
            Endpoint::Location(l0),
            Endpoint::Hub(h0),
            vec![GeoPoint::new(0.0, 0.002), GeoPoint::new(0.001, 0.001), GeoPoint::new(0.0, 0.0)],
        );
        let graph = b.build();

        let pts = RouteStitcher::new(&graph, &AStarRouter).stitch(l0, l1).unwrap();
        // l0, bend, h0, road-mid, h1, l1
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[1], GeoPoint::new(0.001, 0.001));
        assert_eq!(pts[3], GeoPoint::new(0.005, 0.001));

        // Reverse direction reads the link backwards.
        let back = RouteStitcher::new(&graph, &AStarRouter).stitch(l1, l0).unwrap();
        assert_eq!(back.len(), 6);
        assert_eq!(back[4], GeoPoint::new(0.001, 0.001));
        assert!((polyline_length_m(&pts) - polyline_length_m(&back)).abs() < 1e-6);
    }

    #[test]
    fn disconnected_hubs_are_no_route() {
        let mut b = GraphStoreBuilder::new();
        let h0 = b.add_hub("h0", GeoPoint::new(0.0, 0.0)).unwrap();
        let h1 = b.add_hub("h1", GeoPoint::new(0.01, 0.0)).unwrap();
        let l0 = b.add_location("l0", "L0", LocationCategory::Depot, GeoPoint::new(0.0, 0.001), h0).unwrap();
        let l1 = b.add_location("l1", "L1", LocationCategory::Depot, GeoPoint::new(0.01, 0.001), h1).unwrap();
        let graph = b.build();
        let r = RouteStitcher::new(&graph, &AStarRouter).stitch(l0, l1);
        assert!(matches!(r, Err(GraphError::NoRoute { .. })));
    }

    #[test]
    fn unknown_location_is_reported() {
        let (graph, _, [la, ..]) = super::helpers::line_graph();
        let r = RouteStitcher::new(&graph, &AStarRouter).stitch(la, LocationId(77));
        assert!(matches!(r, Err(GraphError::UnknownLocation(LocationId(77)))));
    }
}
