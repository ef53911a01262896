//! Static stop and route geometry records.
//!
//! These come from bulk reference datasets rather than live endpoints.
//! Once loaded they are shared read-only for the rest of the session.

use std::collections::BTreeMap;

use serde::Serialize;

use super::geo::LatLon;

/// A bus stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub id: String,
    /// Rider-facing stop number. Empty when the feed has none.
    pub code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Stop {
    pub fn location(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }
}

/// A stop as it appears at a position along one shape of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequencedStop {
    #[serde(flatten)]
    pub stop: Stop,
    pub sequence: u32,
}

/// The drawable geometry of a route: one polyline per shape variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteShape {
    pub route_id: String,
    pub display_name: String,
    pub long_name: String,
    /// Six hex digits without a leading `#`.
    pub color_hex: Option<String>,
    /// Shape id → ordered `[lat, lon]` points.
    pub shapes: BTreeMap<String, Vec<[f64; 2]>>,
}

impl RouteShape {
    /// Total number of points across every shape.
    pub fn point_count(&self) -> usize {
        self.shapes.values().map(Vec::len).sum()
    }
}

/// The stops served by each shape of a route, in travel order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStopSequence {
    pub route_id: String,
    pub display_name: String,
    pub long_name: String,
    pub shapes: BTreeMap<String, Vec<SequencedStop>>,
}

impl RouteStopSequence {
    /// Distinct stops across all shapes, in first-seen order.
    pub fn distinct_stops(&self) -> Vec<&Stop> {
        let mut seen = std::collections::HashSet::new();
        self.shapes
            .values()
            .flatten()
            .map(|s| &s.stop)
            .filter(|s| seen.insert(s.id.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: &str) -> Stop {
        Stop {
            id: id.to_string(),
            code: id.to_string(),
            name: format!("Stop {id}"),
            latitude: 21.3,
            longitude: -157.8,
        }
    }

    #[test]
    fn distinct_stops_deduplicates_across_shapes() {
        let mut shapes = BTreeMap::new();
        shapes.insert(
            "a".to_string(),
            vec![
                SequencedStop { stop: stop("1"), sequence: 1 },
                SequencedStop { stop: stop("2"), sequence: 2 },
            ],
        );
        shapes.insert(
            "b".to_string(),
            vec![
                SequencedStop { stop: stop("2"), sequence: 1 },
                SequencedStop { stop: stop("3"), sequence: 2 },
            ],
        );
        let seq = RouteStopSequence {
            route_id: "2".to_string(),
            display_name: "2".to_string(),
            long_name: "Waikiki".to_string(),
            shapes,
        };

        let ids: Vec<&str> = seq.distinct_stops().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn sequenced_stop_serializes_flat() {
        let s = SequencedStop { stop: stop("7"), sequence: 4 };
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["sequence"], 4);
    }

    #[test]
    fn point_count_sums_shapes() {
        let mut shapes = BTreeMap::new();
        shapes.insert("a".to_string(), vec![[21.0, -157.0], [21.1, -157.1]]);
        shapes.insert("b".to_string(), vec![[21.2, -157.2]]);
        let shape = RouteShape {
            route_id: "r".to_string(),
            display_name: "2".to_string(),
            long_name: String::new(),
            color_hex: None,
            shapes,
        };
        assert_eq!(shape.point_count(), 3);
    }
}
