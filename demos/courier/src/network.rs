//! Synthetic Mobile, AL delivery network.
//!
//! Five hubs, six two-way roads, and a handful of locations, built through
//! the same record path as the JSON loader.  Used when no data directory is
//! given on the command line.

use gdd_graph::{EdgeRecord, GraphResult, GraphStore, HubRecord, LinkRecord, LocationCategory, LocationRecord};

fn hub(id: &str, lng: f64, lat: f64) -> HubRecord {
    HubRecord { id: id.into(), lng, lat }
}

/// Roads are listed once; the loader adds the reverse direction.
/// Durations assume ~45 km/h.
fn road(from: &str, to: &str, distance_m: f64) -> EdgeRecord {
    EdgeRecord {
        from: from.into(),
        to: to.into(),
        distance_m,
        duration_s: distance_m / 12.5,
        polyline: Vec::new(),
    }
}

fn place(id: &str, name: &str, category: LocationCategory, lng: f64, lat: f64, hub: &str) -> LocationRecord {
    LocationRecord {
        id: id.into(),
        name: name.into(),
        category,
        lng,
        lat,
        hub_id: hub.into(),
    }
}

pub fn build_network() -> GraphResult<GraphStore> {
    let hubs = vec![
        hub("north_residential", -88.070, 30.710),
        hub("downtown",          -88.050, 30.695),
        hub("connector",         -88.060, 30.680),
        hub("commerce_park",     -88.030, 30.700),
        hub("south_residential", -88.030, 30.670),
    ];

    let edges = vec![
        road("north_residential", "downtown",      2_900.0),
        road("north_residential", "connector",     3_900.0),
        road("connector",         "downtown",      2_300.0),
        road("south_residential", "connector",     3_500.0),
        road("south_residential", "commerce_park", 3_800.0),
        road("downtown",          "commerce_park", 2_400.0),
    ];

    use LocationCategory::*;
    let locations = vec![
        place("depot",        "Broad St Depot",        Depot,    -88.0615, 30.6812, "connector"),
        place("fuel_north",   "Spring Hill Fuel",      Fuel,     -88.0712, 30.7085, "north_residential"),
        place("fuel_south",   "Dauphin Island Pkwy",   Fuel,     -88.0318, 30.6688, "south_residential"),
        place("bienville",    "Bienville Square",      Business, -88.0495, 30.6938, "downtown"),
        place("port",         "Port Terminal",         Business, -88.0287, 30.7012, "commerce_park"),
        place("tire_shop",    "Airport Blvd Tires",    Garage,   -88.0306, 30.6715, "south_residential"),
        place("clinic",       "Midtown Clinic",        Service,  -88.0688, 30.7110, "north_residential"),
    ];

    // The depot driveway bends around the yard.
    let links = vec![LinkRecord {
        from: "depot".into(),
        to: "connector".into(),
        distance_m: 0.0,
        duration_s: 0.0,
        polyline: vec![[-88.0615, 30.6812], [-88.0608, 30.6806], [-88.0600, 30.6800]],
    }];

    GraphStore::load(hubs, edges, locations, links)
}
