//! Geographic coordinate type and polyline utilities.
//!
//! `GeoPoint` uses `f64`.  The movement simulator skips segments shorter
//! than 0.3 m and overwrites route points with sub-segment positions, which
//! needs better than the ~1 m resolution single precision gives at
//! mid-latitudes.

/// A WGS-84 coordinate.  Input data stores points as `[lng, lat]` pairs;
/// use [`GeoPoint::from_lng_lat`] / [`GeoPoint::to_lng_lat`] at the edges.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    #[inline]
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self { lon: pair[0], lat: pair[1] }
    }

    #[inline]
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// Linear interpolation in coordinate space; `t` is clamped to `[0, 1]`.
    ///
    /// Segments are short enough (street scale) that interpolating lon/lat
    /// directly stays on the great circle to well under a metre.
    #[inline]
    pub fn lerp(self, other: GeoPoint, t: f64) -> GeoPoint {
        let t = t.clamp(0.0, 1.0);
        GeoPoint {
            lon: self.lon + (other.lon - self.lon) * t,
            lat: self.lat + (other.lat - self.lat) * t,
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

/// Sum of great-circle segment lengths along `points`, in metres.
///
/// Returns `0.0` for fewer than two points.
pub fn polyline_length_m(points: &[GeoPoint]) -> f64 {
    points.windows(2).map(|w| w[0].distance_m(w[1])).sum()
}
