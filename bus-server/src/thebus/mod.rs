//! TheBus live data client.
//!
//! This module provides an HTTP client for the Honolulu TheBus API, which
//! provides route search, vehicle tracking, and stop arrivals.
//!
//! Key characteristics of the service:
//! - The vehicle endpoint answers in **XML**; route and arrival endpoints
//!   answer in JSON
//! - Errors are reported in-band (`errorMessage`) with a success status
//! - Direct calls are intermittently blocked, so a CORS relay serves as a
//!   one-hop fallback

mod client;
mod convert;
mod endpoint;
mod error;
mod transport;
mod types;
mod xml;

pub use client::{
    ConfigError, DEFAULT_BASE_URL, DEFAULT_RELAY_URL, Payload, ProxyConfig, TransitClient,
    TransitConfig,
};
pub use convert::ConversionError;
pub use endpoint::{Endpoint, WireFormat};
pub use error::TransitError;
pub use transport::{OutboundRequest, RawResponse, ReqwestTransport, Transport, TransportError};
pub use types::{ArrivalEntry, ArrivalsResponse, RouteEntry, RoutesResponse};
pub use xml::{VehicleDocument, VehicleFields, XmlError, parse_vehicle_document};
