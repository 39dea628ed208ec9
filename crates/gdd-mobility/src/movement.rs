//! Per-tick movement along an [`ActiveRoute`].

use gdd_core::DispatchConfig;

use crate::{ActiveRoute, ArrivalEvent, Vehicle};

/// Outcome of one [`MovementSimulator::advance`] step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Advance {
    /// Distance actually covered this step, in metres.  Skipped short
    /// segments do not count.
    pub travelled_m: f64,
    /// Set when the route's last point was reached during this step.
    pub arrival: Option<ArrivalEvent>,
}

/// Advances a vehicle along its route, charging resources per metre.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MovementSimulator {
    /// Segments shorter than this are stepped over for free.
    pub segment_epsilon_m: f64,
}

impl MovementSimulator {
    pub fn new(segment_epsilon_m: f64) -> Self {
        Self { segment_epsilon_m }
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::new(config.segment_epsilon_m)
    }

    /// Move `vehicle` along `route` for `elapsed_secs` of simulated time.
    ///
    /// Running out of fuel or durability does not stop the vehicle; levels
    /// simply bottom out at zero.  Budget left over after arrival is
    /// discarded.  Negative or non-finite `elapsed_secs` moves nothing.
    pub fn advance(&self, vehicle: &mut Vehicle, route: &mut ActiveRoute, elapsed_secs: f64) -> Advance {
        let mut budget = if elapsed_secs.is_finite() && elapsed_secs > 0.0 {
            vehicle.spec.speed_mps * elapsed_secs
        } else {
            0.0
        };
        let mut travelled_m = 0.0;

        while !route.is_finished() {
            let a = route.points[route.cursor];
            let b = route.points[route.cursor + 1];
            let seg = a.distance_m(b);

            if seg < self.segment_epsilon_m {
                route.cursor += 1;
                vehicle.pos = b;
                continue;
            }
            if budget <= 0.0 {
                break;
            }

            if budget >= seg {
                vehicle.pos = b;
                vehicle.deplete(seg);
                travelled_m += seg;
                budget -= seg;
                route.cursor += 1;
            } else {
                let here = a.lerp(b, budget / seg);
                vehicle.pos = here;
                vehicle.deplete(budget);
                travelled_m += budget;
                route.points[route.cursor] = here;
                break;
            }
        }

        let arrival = route.is_finished().then(|| route.arrival());
        Advance { travelled_m, arrival }
    }
}

impl Default for MovementSimulator {
    fn default() -> Self {
        Self::from_config(&DispatchConfig::default())
    }
}
