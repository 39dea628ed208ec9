//! The live route a vehicle is driving.

use gdd_core::{GeoPoint, LocationId, polyline_length_m};

/// What arriving at the end of a route means.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum LegKind {
    /// Heading to a fuel stop; the tank is filled on arrival.
    Refueling,
    /// Heading to the active job's destination.
    Delivering,
}

impl LegKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LegKind::Refueling  => "REFUELING",
            LegKind::Delivering => "DELIVERING",
        }
    }
}

impl std::fmt::Display for LegKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised by the movement simulator when a route's last point is reached.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ArrivalEvent {
    pub leg:    LegKind,
    pub target: LocationId,
}

/// A stitched polyline being traversed, with a cursor into it.
///
/// `points[cursor]` is where the vehicle currently is (or the last vertex it
/// passed, rewritten to its exact position after a partial segment).
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRoute {
    pub points: Vec<GeoPoint>,
    pub cursor: usize,
    pub leg:    LegKind,
    pub target: LocationId,
}

impl ActiveRoute {
    pub fn new(points: Vec<GeoPoint>, leg: LegKind, target: LocationId) -> Self {
        Self { points, cursor: 0, leg, target }
    }

    /// `true` once the cursor sits on the last point.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.cursor + 1 >= self.points.len()
    }

    /// Geometric distance still to drive, in metres.
    pub fn remaining_m(&self) -> f64 {
        let from = self.cursor.min(self.points.len());
        polyline_length_m(&self.points[from..])
    }

    pub fn destination(&self) -> Option<GeoPoint> {
        self.points.last().copied()
    }

    pub fn arrival(&self) -> ArrivalEvent {
        ArrivalEvent { leg: self.leg, target: self.target }
    }
}
