//! Geographic primitives: coordinates and great-circle distance.
//!
//! All distances are in kilometers. The clusterer works on raw (lat, lon)
//! degrees with a planar metric; everything else uses [`haversine_km`].

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by every distance in the pipeline.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A (latitude, longitude) pair in decimal degrees.
///
/// Serialized as a two-element array `[lat, lon]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns true when both components are finite and within the valid
    /// latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        // h3o rejects non-finite components; ranges are checked here.
        h3o::LatLng::new(self.lat, self.lon).is_ok()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Squared planar distance on raw (lat, lon) degrees.
    pub fn euclidean_sq(&self, other: &Coordinate) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        dlat * dlat + dlon * dlon
    }

    /// Mean latitude and mean longitude of the given points, `None` when empty.
    pub fn centroid<I>(points: I) -> Option<Coordinate>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let (count, lat_sum, lon_sum) = points
            .into_iter()
            .fold((0usize, 0.0, 0.0), |(n, lat, lon), p| (n + 1, lat + p.lat, lon + p.lon));
        if count == 0 {
            return None;
        }
        Some(Coordinate::new(lat_sum / count as f64, lon_sum / count as f64))
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lat, c.lon]
    }
}

/// Great-circle distance between two coordinates (haversine formula).
///
/// Pure and symmetric. Invalid inputs (NaN, out of range) are not checked and
/// propagate into the result.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
    let sin_dlat = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon = ((lon2 - lon1) * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
