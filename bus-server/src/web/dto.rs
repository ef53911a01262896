//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Arrival, Route, StopArrivals, Vehicle, VehicleReport};
use crate::nearby::NearbyStop;

/// Shown when a route search matches nothing.
pub const NO_ROUTES: &str = "No routes found. Try a different search.";

/// Shown when a vehicle lookup returns no vehicles.
pub const NO_VEHICLES: &str = "No vehicle data available. Check the vehicle number and try again.";

/// Shown when a stop has no upcoming arrivals.
pub const NO_ARRIVALS: &str = "No upcoming arrivals reported for this stop.";

/// Credential passed as a query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialParam {
    pub key: Option<String>,
}

/// Request to search routes.
#[derive(Debug, Deserialize)]
pub struct RouteSearchRequest {
    /// Route number (e.g., "2", "E")
    pub route: Option<String>,

    /// Optional headsign to narrow the search
    pub headsign: Option<String>,
}

/// Request to track a vehicle.
#[derive(Debug, Deserialize)]
pub struct VehicleRequest {
    /// Fleet number
    pub num: Option<String>,
}

/// Request for arrivals at a stop.
#[derive(Debug, Deserialize)]
pub struct ArrivalsRequest {
    /// Stop number
    pub stop: Option<String>,
}

/// Request for stops near a location.
#[derive(Debug, Deserialize)]
pub struct NearbyRequest {
    pub lat: Option<f64>,
    pub lon: Option<f64>,

    /// Maximum number of stops (defaults to 10)
    pub k: Option<usize>,
}

/// Route search results.
#[derive(Debug, Serialize)]
pub struct RouteSearchResult {
    pub routes: Vec<Route>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl From<Vec<Route>> for RouteSearchResult {
    fn from(routes: Vec<Route>) -> Self {
        let message = routes.is_empty().then_some(NO_ROUTES);
        Self { routes, message }
    }
}

/// Vehicle tracking results.
#[derive(Debug, Serialize)]
pub struct VehicleResult {
    /// Server timestamp of the report
    pub timestamp: Option<String>,

    pub vehicles: Vec<Vehicle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl From<VehicleReport> for VehicleResult {
    fn from(report: VehicleReport) -> Self {
        let message = report.vehicles.is_empty().then_some(NO_VEHICLES);
        Self {
            timestamp: report.timestamp,
            vehicles: report.vehicles,
            message,
        }
    }
}

/// Arrivals at one stop.
#[derive(Debug, Serialize)]
pub struct ArrivalsResult {
    pub stop: String,
    pub timestamp: Option<String>,
    pub arrivals: Vec<Arrival>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl From<StopArrivals> for ArrivalsResult {
    fn from(arrivals: StopArrivals) -> Self {
        let message = arrivals.arrivals.is_empty().then_some(NO_ARRIVALS);
        Self {
            stop: arrivals.stop,
            timestamp: arrivals.timestamp,
            arrivals: arrivals.arrivals,
            message,
        }
    }
}

/// Nearest stops, closest first.
#[derive(Debug, Serialize)]
pub struct NearbyResult {
    pub stops: Vec<NearbyStop>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteVariant, Stop};

    fn route() -> Route {
        Route {
            id: "2".into(),
            display_name: "2".into(),
            long_name: None,
            variants: vec![RouteVariant {
                headsign: "WAIKIKI".into(),
                shape_id: Some("20059".into()),
                first_stop: None,
            }],
        }
    }

    #[test]
    fn empty_route_search_has_message() {
        let result = RouteSearchResult::from(Vec::new());
        assert_eq!(result.message, Some(NO_ROUTES));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["message"], NO_ROUTES);
        assert_eq!(json["routes"], serde_json::json!([]));
    }

    #[test]
    fn non_empty_result_omits_message() {
        let result = RouteSearchResult::from(vec![route()]);
        assert_eq!(result.message, None);

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("message").is_none());
        assert_eq!(json["routes"][0]["variants"][0]["headsign"], "WAIKIKI");
    }

    #[test]
    fn empty_vehicle_report_has_message() {
        let report = VehicleReport {
            timestamp: Some("1/7/2024 10:15:40 AM".into()),
            vehicles: Vec::new(),
        };
        let result = VehicleResult::from(report);

        assert_eq!(result.message, Some(NO_VEHICLES));
        assert_eq!(result.timestamp.as_deref(), Some("1/7/2024 10:15:40 AM"));
    }

    #[test]
    fn empty_arrivals_have_message() {
        let result = ArrivalsResult::from(StopArrivals {
            stop: "1".into(),
            timestamp: None,
            arrivals: Vec::new(),
        });
        assert_eq!(result.message, Some(NO_ARRIVALS));
        assert_eq!(result.stop, "1");
    }

    #[test]
    fn nearby_stop_is_flattened() {
        let result = NearbyResult {
            stops: vec![NearbyStop {
                stop: Stop {
                    id: "1".into(),
                    code: "1".into(),
                    name: "ALAKEA ST + HOTEL ST".into(),
                    latitude: 21.3102,
                    longitude: -157.8621,
                },
                distance_km: 0.25,
            }],
        };

        let json = serde_json::to_value(&result).unwrap();
        let stop = &json["stops"][0];
        assert_eq!(stop["id"], "1");
        assert_eq!(stop["name"], "ALAKEA ST + HOTEL ST");
        assert_eq!(stop["latitude"], 21.3102);
        assert_eq!(stop["distance_km"], 0.25);
    }
}
