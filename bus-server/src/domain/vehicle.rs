//! Live vehicle positions.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::geo::LatLon;

/// Format of the service's `last_message` timestamps, e.g. `1/7/2024 10:15:32 AM`.
const LAST_MESSAGE_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// A tracked vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    pub number: String,
    pub route_short_name: Option<String>,
    pub headsign: Option<String>,
    /// Signed offset from schedule; negative means early.
    pub adherence_seconds: Option<i32>,
    pub driver: Option<String>,
    pub last_message: Option<String>,
    /// Present only when both coordinates were reported.
    pub position: Option<LatLon>,
    pub trip_id: Option<String>,
}

impl Vehicle {
    /// Whether this vehicle can be placed on a map.
    pub fn has_position(&self) -> bool {
        self.position.is_some()
    }

    /// Parse `last_message` as a local timestamp.
    pub fn last_message_at(&self) -> Option<NaiveDateTime> {
        let text = self.last_message.as_deref()?;
        NaiveDateTime::parse_from_str(text.trim(), LAST_MESSAGE_FORMAT).ok()
    }
}

/// Result of a vehicle lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleReport {
    /// Document-level timestamp, when the service sent one.
    pub timestamp: Option<String>,
    pub vehicles: Vec<Vehicle>,
}

impl VehicleReport {
    /// Vehicles that can be drawn on a map.
    pub fn positioned(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter().filter(|v| v.has_position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn vehicle() -> Vehicle {
        Vehicle {
            number: "249".to_string(),
            route_short_name: Some("2".to_string()),
            headsign: None,
            adherence_seconds: Some(-1),
            driver: None,
            last_message: Some("1/7/2024 10:15:32 PM".to_string()),
            position: None,
            trip_id: None,
        }
    }

    #[test]
    fn parses_last_message() {
        let at = vehicle().last_message_at().unwrap();
        assert_eq!(at.year(), 2024);
        assert_eq!(at.month(), 1);
        assert_eq!(at.day(), 7);
        assert_eq!(at.hour(), 22);
        assert_eq!(at.minute(), 15);
    }

    #[test]
    fn unparseable_last_message_is_none() {
        let mut v = vehicle();
        v.last_message = Some("yesterday".to_string());
        assert!(v.last_message_at().is_none());
        v.last_message = None;
        assert!(v.last_message_at().is_none());
    }

    #[test]
    fn positioned_filters_unplaceable() {
        let mut placed = vehicle();
        placed.position = Some(LatLon::new(21.3, -157.8));
        let report = VehicleReport {
            timestamp: None,
            vehicles: vec![vehicle(), placed],
        };
        assert_eq!(report.positioned().count(), 1);
    }
}
