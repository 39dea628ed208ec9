//! Vehicle state and resource accounting.

use gdd_core::{GeoPoint, LocationId, VehicleSpec};

/// The delivery vehicle.
///
/// `fuel` and `durability` always stay within `[0, spec.fuel_max]` and
/// `[0, spec.dur_max]`; every mutator clamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub pos:        GeoPoint,
    pub fuel:       f64,
    pub durability: f64,
    pub spec:       VehicleSpec,
    /// Last confirmed location.  Origin of the next dispatched leg.
    pub current_location: LocationId,
}

impl Vehicle {
    /// A vehicle parked at `location` with full tanks.
    pub fn new(spec: VehicleSpec, location: LocationId, pos: GeoPoint) -> Self {
        Self {
            pos,
            fuel: spec.fuel_max,
            durability: spec.dur_max,
            spec,
            current_location: location,
        }
    }

    /// Charge fuel and durability for `meters` travelled.
    pub fn deplete(&mut self, meters: f64) {
        let meters = meters.max(0.0);
        self.set_fuel(self.fuel - self.spec.fuel_for(meters));
        self.set_durability(self.durability - self.spec.dur_per_km * meters / 1000.0);
    }

    /// Fill the tank.
    pub fn refuel(&mut self) {
        self.fuel = self.spec.fuel_max;
    }

    pub fn set_fuel(&mut self, fuel: f64) {
        self.fuel = clamp_level(fuel, self.spec.fuel_max);
    }

    pub fn set_durability(&mut self, durability: f64) {
        self.durability = clamp_level(durability, self.spec.dur_max);
    }

    pub fn is_tank_full(&self) -> bool {
        self.fuel >= self.spec.fuel_max
    }

    pub fn is_out_of_fuel(&self) -> bool {
        self.fuel <= 0.0
    }

    pub fn is_worn_out(&self) -> bool {
        self.durability <= 0.0
    }
}

/// Clamp to `[0, max]`; NaN becomes 0.
fn clamp_level(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, max)
    }
}
