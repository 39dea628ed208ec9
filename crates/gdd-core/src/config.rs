//! Simulation configuration.
//!
//! Typically loaded from a JSON file by the application crate and passed to
//! the session.  Every field has a default, so a config file only needs to
//! name what it overrides.

use crate::{CoreError, CoreResult};

/// Fuel units held back when deciding whether a leg needs a refuelling
/// detour first.  Covers estimation error and the gap between great-circle
/// and road length.
pub const DEFAULT_SAFETY_MARGIN: f64 = 10.0;

/// Route segments shorter than this are skipped by the movement simulator
/// without consuming distance or resources.
pub const DEFAULT_SEGMENT_EPSILON_M: f64 = 0.3;

// ── VehicleSpec ───────────────────────────────────────────────────────────────

/// Constant vehicle characteristics: tank sizes and consumption rates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VehicleSpec {
    pub fuel_max:    f64,
    pub dur_max:     f64,
    /// Fuel units burned per kilometre travelled.
    pub fuel_per_km: f64,
    /// Durability lost per kilometre travelled.
    pub dur_per_km:  f64,
    /// Cruise speed in metres per second.
    pub speed_mps:   f64,
}

impl VehicleSpec {
    /// Fuel units needed to drive `meters`.
    #[inline]
    pub fn fuel_for(&self, meters: f64) -> f64 {
        self.fuel_per_km * meters / 1000.0
    }
}

impl Default for VehicleSpec {
    fn default() -> Self {
        Self {
            fuel_max:    100.0,
            dur_max:     100.0,
            fuel_per_km: 1.2,
            dur_per_km:  0.4,
            speed_mps:   22.0, // ~80 km/h
        }
    }
}

// ── DispatchConfig ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatchConfig {
    /// Fuel buffer added to the estimated leg cost.
    pub safety_margin:     f64,
    /// See [`DEFAULT_SEGMENT_EPSILON_M`].
    pub segment_epsilon_m: f64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            safety_margin:     DEFAULT_SAFETY_MARGIN,
            segment_epsilon_m: DEFAULT_SEGMENT_EPSILON_M,
        }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level configuration for one simulation session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always picks the same jobs.
    pub seed:     u64,
    pub vehicle:  VehicleSpec,
    pub dispatch: DispatchConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:     42,
            vehicle:  VehicleSpec::default(),
            dispatch: DispatchConfig::default(),
        }
    }
}

impl SimConfig {
    /// Reject values the simulator cannot run with.
    ///
    /// Consumption rates and the safety margin may be zero; tank sizes and
    /// speed must be strictly positive.
    pub fn validate(&self) -> CoreResult<()> {
        let v = &self.vehicle;
        let positive = [
            ("vehicle.fuel_max", v.fuel_max),
            ("vehicle.dur_max", v.dur_max),
            ("vehicle.speed_mps", v.speed_mps),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CoreError::Config(format!("{name} must be > 0, got {value}")));
            }
        }

        let non_negative = [
            ("vehicle.fuel_per_km", v.fuel_per_km),
            ("vehicle.dur_per_km", v.dur_per_km),
            ("dispatch.safety_margin", self.dispatch.safety_margin),
            ("dispatch.segment_epsilon_m", self.dispatch.segment_epsilon_m),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CoreError::Config(format!("{name} must be >= 0, got {value}")));
            }
        }
        Ok(())
    }
}
