//! Normalization of decoded payloads into domain records.
//!
//! Unknown fields are ignored and missing optional fields become `None`.
//! Individual records that lack an identifying field are skipped with a
//! warning rather than failing the whole response.

use serde_json::Value;
use tracing::warn;

use crate::domain::{Arrival, LatLon, Route, RouteVariant, StopArrivals, Vehicle, VehicleReport};

use super::client::Payload;
use super::types::{ArrivalEntry, ArrivalsResponse, RouteEntry, RoutesResponse};
use super::xml::{VehicleDocument, VehicleFields};

/// Error during payload to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Payload was in a different wire format than the endpoint produces
    #[error("expected a {expected} payload")]
    WrongFormat { expected: &'static str },

    /// JSON did not have the expected structure
    #[error("unexpected JSON structure: {0}")]
    Structure(String),
}

/// Normalize a route search payload.
///
/// Entries are grouped by route number in first-seen order; each entry
/// becomes one variant of its route.
pub fn routes_from_payload(payload: Payload) -> Result<Vec<Route>, ConversionError> {
    let response: RoutesResponse = from_json(payload)?;
    Ok(group_routes(response.route))
}

fn group_routes(entries: Vec<RouteEntry>) -> Vec<Route> {
    let mut routes: Vec<Route> = Vec::new();

    for entry in entries {
        let Some(number) = entry.route_num else {
            warn!("skipping route entry without a route number");
            continue;
        };

        let variant = RouteVariant {
            headsign: entry.headsign.unwrap_or_default(),
            shape_id: entry.shape_id,
            first_stop: entry.first_stop,
        };

        match routes.iter_mut().find(|r| r.id == number) {
            Some(route) => route.variants.push(variant),
            None => routes.push(Route {
                display_name: number.clone(),
                id: number,
                long_name: None,
                variants: vec![variant],
            }),
        }
    }

    routes
}

/// Normalize a vehicle lookup payload.
pub fn vehicles_from_payload(payload: Payload) -> Result<VehicleReport, ConversionError> {
    match payload {
        Payload::Xml(doc) => Ok(vehicles_from_document(doc)),
        Payload::Json(_) => Err(ConversionError::WrongFormat { expected: "XML" }),
    }
}

fn vehicles_from_document(doc: VehicleDocument) -> VehicleReport {
    let vehicles = doc
        .vehicles
        .into_iter()
        .filter_map(|mut fields| {
            let vehicle = vehicle_from_fields(&mut fields);
            if vehicle.is_none() {
                warn!("skipping vehicle element without a number");
            }
            vehicle
        })
        .collect();

    VehicleReport {
        timestamp: doc.timestamp,
        vehicles,
    }
}

fn vehicle_from_fields(fields: &mut VehicleFields) -> Option<Vehicle> {
    let mut take = |name: &str| fields.remove(name).flatten();

    let number = take("number")?;
    let latitude = take("latitude").and_then(|s| s.parse().ok());
    let longitude = take("longitude").and_then(|s| s.parse().ok());

    Some(Vehicle {
        number,
        route_short_name: take("route_short_name"),
        headsign: take("headsign"),
        adherence_seconds: take("adherence").and_then(|s| parse_signed(&s)),
        driver: take("driver"),
        last_message: take("last_message"),
        position: LatLon::from_parts(latitude, longitude),
        trip_id: take("trip"),
    })
}

/// Parse a signed whole number, tolerating a fractional part.
fn parse_signed(text: &str) -> Option<i32> {
    let value: f64 = text.trim().parse().ok()?;
    if value.is_finite() {
        Some(value.round() as i32)
    } else {
        None
    }
}

/// Normalize an arrivals payload.
pub fn arrivals_from_payload(payload: Payload) -> Result<StopArrivals, ConversionError> {
    let response: ArrivalsResponse = from_json(payload)?;

    let arrivals = response
        .arrivals
        .into_iter()
        .filter_map(|entry| {
            let arrival = arrival_from_entry(entry);
            if arrival.is_none() {
                warn!("skipping arrival without a route");
            }
            arrival
        })
        .collect();

    Ok(StopArrivals {
        stop: response.stop.unwrap_or_default(),
        timestamp: response.timestamp,
        arrivals,
    })
}

fn arrival_from_entry(entry: ArrivalEntry) -> Option<Arrival> {
    let route = entry.route?;
    let latitude = entry.latitude.and_then(|s| s.parse().ok());
    let longitude = entry.longitude.and_then(|s| s.parse().ok());

    Some(Arrival {
        route,
        headsign: entry.headsign.unwrap_or_default(),
        scheduled_time: entry.stop_time.unwrap_or_default(),
        date: entry.date,
        estimated: entry.estimated,
        vehicle_number: entry.vehicle.filter(|v| v != "???"),
        direction: entry.direction,
        canceled: entry.canceled,
        trip_id: entry.trip,
        shape_id: entry.shape,
        position: LatLon::from_parts(latitude, longitude),
    })
}

fn from_json<T: serde::de::DeserializeOwned>(payload: Payload) -> Result<T, ConversionError> {
    match payload {
        Payload::Json(value) => from_value(value),
        Payload::Xml(_) => Err(ConversionError::WrongFormat { expected: "JSON" }),
    }
}

fn from_value<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ConversionError> {
    serde_json::from_value(value).map_err(|e| ConversionError::Structure(e.to_string()))
}
