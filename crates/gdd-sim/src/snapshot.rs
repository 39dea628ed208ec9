//! Persisted session state.
//!
//! # Schema
//!
//! ```json
//! {
//!   "vehicle":    { "pos": [lng, lat], "fuel": 72.5, "dur": 98.1, "currentLocationId": "depot" },
//!   "job":        { "id": 1, "from": "depot", "to": "shop", "payout": 80.0, "status": "IN_PROGRESS" },
//!   "mode":       "DELIVERING",
//!   "route":      [[lng, lat], ...],
//!   "routeIndex": 12
//! }
//! ```
//!
//! Writing always produces the full document.  Reading is lenient: every
//! field is checked on its own and only the well-typed ones are applied (see
//! [`SnapshotPatch`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use gdd_core::GeoPoint;

use crate::{JobStatus, VehicleMode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSnapshot {
    pub pos:  [f64; 2],
    pub fuel: f64,
    pub dur:  f64,
    pub current_location_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id:     u32,
    pub from:   String,
    pub to:     String,
    pub payout: f64,
    pub status: JobStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub vehicle:     VehicleSnapshot,
    pub job:         Option<JobSnapshot>,
    pub mode:        VehicleMode,
    pub route:       Vec<[f64; 2]>,
    pub route_index: usize,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ── SnapshotPatch ─────────────────────────────────────────────────────────────

/// The well-typed subset of a stored snapshot.
///
/// `None` means "absent or malformed, keep the current value".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotPatch {
    pub pos:  Option<GeoPoint>,
    pub fuel: Option<f64>,
    pub dur:  Option<f64>,
    pub current_location_id: Option<String>,
    /// `Some(None)` is an explicit `"job": null`.
    pub job:  Option<Option<JobSnapshot>>,
    pub mode: Option<VehicleMode>,
    pub route: Option<Vec<GeoPoint>>,
    pub route_index: Option<usize>,
}

impl SnapshotPatch {
    /// Parse stored text.  Unparseable text yields an empty patch.
    pub fn from_json(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable snapshot");
                Self::default()
            }
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let vehicle = value.get("vehicle");
        let field = |name: &str| vehicle.and_then(|v| v.get(name));

        let job = match value.get("job") {
            None => None,
            Some(Value::Null) => Some(None),
            Some(v) => serde_json::from_value::<JobSnapshot>(v.clone()).ok().map(Some),
        };

        let route = value.get("route").and_then(Value::as_array).and_then(|pts| {
            pts.iter().map(parse_point).collect::<Option<Vec<_>>>()
        });

        Self {
            pos:  field("pos").and_then(parse_point),
            fuel: field("fuel").and_then(parse_number),
            dur:  field("dur").and_then(parse_number),
            current_location_id: field("currentLocationId")
                .and_then(Value::as_str)
                .map(str::to_owned),
            job,
            mode: value
                .get("mode")
                .and_then(|m| serde_json::from_value(m.clone()).ok()),
            route,
            route_index: value
                .get("routeIndex")
                .and_then(Value::as_u64)
                .and_then(|i| usize::try_from(i).ok()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn parse_number(v: &Value) -> Option<f64> {
    v.as_f64().filter(|x| x.is_finite())
}

fn parse_point(v: &Value) -> Option<GeoPoint> {
    match v.as_array()?.as_slice() {
        [lng, lat] => Some(GeoPoint::new(parse_number(lng)?, parse_number(lat)?)),
        _ => None,
    }
}
