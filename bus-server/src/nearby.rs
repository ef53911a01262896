//! Nearest-stop search over the loaded stop dataset.

use serde::Serialize;

use crate::domain::{LatLon, Stop};

/// Number of stops returned when the caller does not say.
pub const DEFAULT_NEAREST: usize = 10;

/// A stop together with its distance from the search origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyStop {
    #[serde(flatten)]
    pub stop: Stop,
    pub distance_km: f64,
}

/// The `k` stops closest to `origin`, nearest first.
///
/// Equal distances keep their order from `stops`. Fewer than `k` stops
/// means all of them come back, still sorted.
pub fn find_nearest(origin: LatLon, stops: &[Stop], k: usize) -> Vec<NearbyStop> {
    let mut ranked: Vec<NearbyStop> = stops
        .iter()
        .map(|stop| NearbyStop {
            distance_km: origin.distance_km(&stop.location()),
            stop: stop.clone(),
        })
        .collect();

    // `sort_by` is stable.
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    // One degree of latitude is ~111.195 km.
    const KM_PER_DEGREE: f64 = 111.195;

    fn stop(id: &str, lat: f64, lon: f64) -> Stop {
        Stop {
            id: id.to_string(),
            code: id.to_string(),
            name: format!("Stop {id}"),
            latitude: lat,
            longitude: lon,
        }
    }

    /// A stop `km` north of the equator origin.
    fn north(id: &str, km: f64) -> Stop {
        stop(id, km / KM_PER_DEGREE, 0.0)
    }

    fn ids(result: &[NearbyStop]) -> Vec<&str> {
        result.iter().map(|n| n.stop.id.as_str()).collect()
    }

    #[test]
    fn picks_k_closest_in_order() {
        let origin = LatLon::new(0.0, 0.0);
        let stops = vec![north("one", 1.0), north("five", 5.0), north("two", 2.0)];

        let result = find_nearest(origin, &stops, 2);

        assert_eq!(ids(&result), vec!["one", "two"]);
        assert!((result[0].distance_km - 1.0).abs() < 0.01);
        assert!((result[1].distance_km - 2.0).abs() < 0.01);
    }

    #[test]
    fn k_larger_than_input_returns_everything_sorted() {
        let origin = LatLon::new(0.0, 0.0);
        let stops = vec![north("one", 1.0), north("five", 5.0), north("two", 2.0)];

        let result = find_nearest(origin, &stops, DEFAULT_NEAREST);

        assert_eq!(ids(&result), vec!["one", "two", "five"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let origin = LatLon::new(0.0, 0.0);
        // Same distance north and south.
        let stops = vec![
            stop("south", -0.01, 0.0),
            stop("far", 1.0, 0.0),
            stop("north", 0.01, 0.0),
        ];

        let result = find_nearest(origin, &stops, 2);

        assert_eq!(ids(&result), vec!["south", "north"]);
    }

    #[test]
    fn empty_inputs() {
        let origin = LatLon::new(21.3, -157.8);
        assert!(find_nearest(origin, &[], 5).is_empty());
        assert!(find_nearest(origin, &[stop("a", 21.3, -157.8)], 0).is_empty());
    }
}
