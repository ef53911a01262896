//! Upcoming arrivals at a stop.

use serde::Serialize;

use super::geo::LatLon;

/// A predicted or scheduled arrival.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrival {
    pub route: String,
    pub headsign: String,
    /// Clock time as reported, e.g. `10:15 AM`.
    pub scheduled_time: String,
    pub date: Option<String>,
    /// True when the time comes from real-time tracking rather than the timetable.
    pub estimated: bool,
    pub vehicle_number: Option<String>,
    pub direction: Option<String>,
    pub canceled: bool,
    pub trip_id: Option<String>,
    pub shape_id: Option<String>,
    pub position: Option<LatLon>,
}

/// All arrivals reported for one stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopArrivals {
    pub stop: String,
    pub timestamp: Option<String>,
    pub arrivals: Vec<Arrival>,
}

impl StopArrivals {
    /// Arrivals that have not been canceled.
    pub fn running(&self) -> impl Iterator<Item = &Arrival> {
        self.arrivals.iter().filter(|a| !a.canceled)
    }
}
