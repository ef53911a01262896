//! Route search results.

use serde::Serialize;

/// A route and the trip patterns (variants) that run under its number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub id: String,
    pub display_name: String,
    pub long_name: Option<String>,
    pub variants: Vec<RouteVariant>,
}

/// One direction/pattern of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteVariant {
    pub headsign: String,
    pub shape_id: Option<String>,
    pub first_stop: Option<String>,
}

impl Route {
    /// Distinct headsigns served by this route, in variant order.
    pub fn headsigns(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for v in &self.variants {
            if !out.contains(&v.headsign.as_str()) {
                out.push(&v.headsign);
            }
        }
        out
    }
}
