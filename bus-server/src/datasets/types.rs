//! On-disk shapes of the static datasets.
//!
//! These are produced offline from the GTFS feed: `stops.json` is an array,
//! the two route files are maps keyed by route.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::domain::{RouteShape, RouteStopSequence, SequencedStop, Stop};

#[derive(Debug, Clone, Deserialize)]
pub struct StopRecord {
    pub id: String,
    #[serde(default)]
    pub code: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Entry of `routes-shapes.json`, keyed by route short name.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteShapeRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub color: String,
    pub shapes: BTreeMap<String, Vec<[f64; 2]>>,
}

/// Entry of `route-stops.json`, keyed by route id.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteStopsRecord {
    pub name: String,
    #[serde(default)]
    pub long_name: String,
    pub shapes: BTreeMap<String, Vec<SequencedStopRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SequencedStopRecord {
    #[serde(flatten)]
    pub stop: StopRecord,
    pub sequence: u32,
}

impl From<StopRecord> for Stop {
    fn from(r: StopRecord) -> Self {
        Stop {
            id: r.id,
            code: r.code,
            name: r.name,
            latitude: r.lat,
            longitude: r.lon,
        }
    }
}

impl From<SequencedStopRecord> for SequencedStop {
    fn from(r: SequencedStopRecord) -> Self {
        SequencedStop {
            stop: r.stop.into(),
            sequence: r.sequence,
        }
    }
}

/// Convert shape records; the map stays keyed by route short name.
pub fn route_shapes(records: HashMap<String, RouteShapeRecord>) -> HashMap<String, RouteShape> {
    records
        .into_iter()
        .map(|(key, r)| {
            let shape = RouteShape {
                route_id: r.id,
                display_name: r.name,
                long_name: r.long_name,
                color_hex: normalize_color(&r.color),
                shapes: r.shapes,
            };
            (key, shape)
        })
        .collect()
}

/// Convert stop-sequence records; the map key is the route id.
pub fn route_stop_sequences(
    records: HashMap<String, RouteStopsRecord>,
) -> HashMap<String, RouteStopSequence> {
    records
        .into_iter()
        .map(|(route_id, r)| {
            let shapes = r
                .shapes
                .into_iter()
                .map(|(shape_id, stops)| {
                    let mut stops: Vec<SequencedStop> = stops.into_iter().map(Into::into).collect();
                    stops.sort_by_key(|s| s.sequence);
                    (shape_id, stops)
                })
                .collect();
            let sequence = RouteStopSequence {
                route_id: route_id.clone(),
                display_name: r.name,
                long_name: r.long_name,
                shapes,
            };
            (route_id, sequence)
        })
        .collect()
}

/// GTFS colours are bare hex; tolerate a leading `#` and treat blank as absent.
fn normalize_color(raw: &str) -> Option<String> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.is_empty() {
        None
    } else {
        Some(hex.to_ascii_uppercase())
    }
}
