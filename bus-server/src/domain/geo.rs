//! Geographic coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for haversine distances, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a position from two independently optional halves.
    ///
    /// Returns `None` unless both are present and finite: a record with
    /// only one coordinate has no position.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(Self::new(lat, lon))
            }
            _ => None,
        }
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(&self, other: &LatLon) -> f64 {
        haversine_km(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Haversine distance between two points, in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        assert_eq!(haversine_km(21.3069, -157.8583, 21.3069, -157.8583), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        // 2 * pi * 6371 / 360
        let d = haversine_km(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn honolulu_to_kailua() {
        // Downtown Honolulu to Kailua is roughly 17 km as the crow flies.
        let downtown = LatLon::new(21.3069, -157.8583);
        let kailua = LatLon::new(21.4022, -157.7394);
        let d = downtown.distance_km(&kailua);
        assert!(d > 15.0 && d < 17.5, "got {d}");
    }

    #[test]
    fn from_parts_requires_both_halves() {
        assert_eq!(
            LatLon::from_parts(Some(21.3), Some(-157.8)),
            Some(LatLon::new(21.3, -157.8))
        );
        assert_eq!(LatLon::from_parts(Some(21.3), None), None);
        assert_eq!(LatLon::from_parts(None, Some(-157.8)), None);
        assert_eq!(LatLon::from_parts(None, None), None);
        assert_eq!(LatLon::from_parts(Some(f64::NAN), Some(-157.8)), None);
    }
}
