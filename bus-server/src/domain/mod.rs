//! Domain types for the transit client.
//!
//! Records here are format-agnostic: nothing in a `Vehicle` or `Arrival`
//! reveals whether it was decoded from JSON or XML. Types that carry an
//! invariant (credentials, positions) enforce it at construction.

mod arrival;
mod credential;
mod geo;
mod route;
mod stop;
mod vehicle;

pub use arrival::{Arrival, StopArrivals};
pub use credential::{
    Credential, CredentialRejection, MAX_CREDENTIAL_LEN, MIN_CREDENTIAL_LEN, validate,
};
pub use geo::{EARTH_RADIUS_KM, LatLon, haversine_km};
pub use route::{Route, RouteVariant};
pub use stop::{RouteShape, RouteStopSequence, SequencedStop, Stop};
pub use vehicle::{Vehicle, VehicleReport};
