//! Upstream endpoint identities.

use std::fmt;

/// How an endpoint encodes its response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    Json,
    Xml,
}

/// A live endpoint of the transit service.
///
/// The wire format is fixed per endpoint: the vehicle lookup answers in XML,
/// everything else in JSON. No content negotiation takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Route search by route number and optional headsign.
    Routes,
    /// Vehicle lookup by fleet number.
    Vehicle,
    /// Upcoming arrivals at a stop.
    Arrivals,
}

impl Endpoint {
    /// Path segment under the service base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Routes => "routeJSON",
            Endpoint::Vehicle => "vehicle",
            Endpoint::Arrivals => "arrivalsJSON",
        }
    }

    pub fn format(&self) -> WireFormat {
        match self {
            Endpoint::Vehicle => WireFormat::Xml,
            Endpoint::Routes | Endpoint::Arrivals => WireFormat::Json,
        }
    }

    /// Message shown when both the direct and relayed attempts fail.
    pub fn unavailable_message(&self) -> &'static str {
        match self {
            Endpoint::Vehicle => "vehicle data temporarily unavailable",
            Endpoint::Routes | Endpoint::Arrivals => "unexpected response from transit service",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
