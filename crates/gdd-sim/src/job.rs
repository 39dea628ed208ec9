//! Job and vehicle-mode state.

use serde::{Deserialize, Serialize};

use gdd_core::{JobId, LocationId};
use gdd_mobility::LegKind;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[default]
    Available,
    InProgress,
    Done,
}

/// What the vehicle is currently doing.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleMode {
    #[default]
    Idle,
    Refueling,
    Delivering,
}

impl VehicleMode {
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleMode::Idle       => "IDLE",
            VehicleMode::Refueling  => "REFUELING",
            VehicleMode::Delivering => "DELIVERING",
        }
    }

    /// The leg kind a moving mode corresponds to; `None` for `Idle`.
    pub fn leg(self) -> Option<LegKind> {
        match self {
            VehicleMode::Idle       => None,
            VehicleMode::Refueling  => Some(LegKind::Refueling),
            VehicleMode::Delivering => Some(LegKind::Delivering),
        }
    }
}

impl From<LegKind> for VehicleMode {
    fn from(leg: LegKind) -> Self {
        match leg {
            LegKind::Refueling  => VehicleMode::Refueling,
            LegKind::Delivering => VehicleMode::Delivering,
        }
    }
}

impl std::fmt::Display for VehicleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single delivery job.  Status changes only through the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id:          JobId,
    pub origin:      LocationId,
    pub destination: LocationId,
    pub payout:      f64,
    pub status:      JobStatus,
}

impl Job {
    pub fn new(id: JobId, origin: LocationId, destination: LocationId, payout: f64) -> Self {
        Self { id, origin, destination, payout, status: JobStatus::Available }
    }

    #[inline]
    pub fn is_in_progress(&self) -> bool {
        self.status == JobStatus::InProgress
    }
}
