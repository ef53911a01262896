//! Transit service HTTP client.
//!
//! Every logical request is a two-step pipeline: a direct GET, and, only if
//! that fails at the transport level, one immediate retry through a CORS
//! relay. Service-reported errors are returned as soon as they are seen.

use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{Credential, Route, StopArrivals, VehicleReport};

use super::convert::{arrivals_from_payload, routes_from_payload, vehicles_from_payload};
use super::endpoint::{Endpoint, WireFormat};
use super::error::{AttemptError, TransitError};
use super::transport::{OutboundRequest, Transport};
use super::types::service_error_message;
use super::xml::{VehicleDocument, XmlError, parse_vehicle_document};

/// Default base URL for the transit service.
pub const DEFAULT_BASE_URL: &str = "https://api.thebus.org";

/// Default CORS relay.
pub const DEFAULT_RELAY_URL: &str = "https://api.allorigins.win/raw";

/// Query parameter carrying the credential.
const CREDENTIAL_PARAM: &str = "key";

/// Configuration for the relay used as a fallback transport.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Relay endpoint
    pub relay_url: String,
    /// Relay query parameter that carries the encoded target URL
    pub url_param: String,
    /// Header identifying this client to the relay
    pub client_header: String,
    /// Value sent in `client_header`
    pub client_id: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            relay_url: DEFAULT_RELAY_URL.to_string(),
            url_param: "url".to_string(),
            client_header: "x-requested-with".to_string(),
            client_id: "find-a-bus".to_string(),
        }
    }
}

impl ProxyConfig {
    /// Set a custom relay URL.
    pub fn with_relay_url(mut self, url: impl Into<String>) -> Self {
        self.relay_url = url.into();
        self
    }

    /// Set the identifier sent to the relay.
    pub fn with_client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = id.into();
        self
    }
}

/// Configuration for the transit client.
#[derive(Debug, Clone)]
pub struct TransitConfig {
    /// Base URL for the service
    pub base_url: String,
    /// Fallback relay
    pub proxy: ProxyConfig,
    /// Request timeout in seconds; `None` leaves it to the transport
    pub timeout_secs: Option<u64>,
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            proxy: ProxyConfig::default(),
            timeout_secs: None,
        }
    }
}

impl TransitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Replace the relay configuration.
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = proxy;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// Invalid client configuration.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid {name} URL {url:?}: {reason}")]
pub struct ConfigError {
    pub name: &'static str,
    pub url: String,
    pub reason: String,
}

/// A decoded response body, before normalization into domain records.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Xml(VehicleDocument),
}

/// Transit service client.
#[derive(Debug, Clone)]
pub struct TransitClient<T> {
    transport: T,
    base_url: Url,
    relay_url: Url,
    proxy: ProxyConfig,
}

impl<T: Transport> TransitClient<T> {
    /// Create a client sending requests through `transport`.
    pub fn new(config: TransitConfig, transport: T) -> Result<Self, ConfigError> {
        let base_url = parse_base("service", &config.base_url)?;
        let relay_url = parse_base("relay", &config.proxy.relay_url)?;

        Ok(Self {
            transport,
            base_url,
            relay_url,
            proxy: config.proxy,
        })
    }

    /// The transport requests are sent through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Search routes by number, optionally narrowed to one headsign.
    pub async fn search_routes(
        &self,
        credential: &str,
        route: &str,
        headsign: Option<&str>,
    ) -> Result<Vec<Route>, TransitError> {
        let payload = self
            .request(
                credential,
                Endpoint::Routes,
                &[("route", Some(route)), ("headsign", headsign)],
            )
            .await?;
        routes_from_payload(payload).map_err(|e| malformed(Endpoint::Routes, e))
    }

    /// Look up a vehicle by fleet number.
    pub async fn track_vehicle(
        &self,
        credential: &str,
        number: &str,
    ) -> Result<VehicleReport, TransitError> {
        let payload = self
            .request(credential, Endpoint::Vehicle, &[("num", Some(number))])
            .await?;
        vehicles_from_payload(payload).map_err(|e| malformed(Endpoint::Vehicle, e))
    }

    /// Upcoming arrivals at a stop.
    pub async fn get_arrivals(
        &self,
        credential: &str,
        stop: &str,
    ) -> Result<StopArrivals, TransitError> {
        let payload = self
            .request(credential, Endpoint::Arrivals, &[("stop", Some(stop))])
            .await?;
        arrivals_from_payload(payload).map_err(|e| malformed(Endpoint::Arrivals, e))
    }

    /// Perform one logical request and return the decoded payload.
    ///
    /// The credential is validated before anything is sent. Parameters whose
    /// value is absent or blank are left out of the query string.
    pub async fn request(
        &self,
        credential: &str,
        endpoint: Endpoint,
        params: &[(&str, Option<&str>)],
    ) -> Result<Payload, TransitError> {
        let credential = Credential::parse(credential)?;
        let target = self.endpoint_url(endpoint, &credential, params);

        debug!(%endpoint, url = %redacted(&target), "direct request");
        let failure = match self.attempt(endpoint, OutboundRequest::get(target.as_str())).await {
            Ok(payload) => return Ok(payload),
            Err(e) if !e.is_retryable() => {
                debug!(%endpoint, error = %e, "service reported an error");
                return Err(e.into_transit_error(endpoint));
            }
            Err(e) => e,
        };

        warn!(%endpoint, error = %failure, "direct request failed, retrying through relay");
        let relayed = self.relayed_request(&target);
        match self.attempt(endpoint, relayed).await {
            Ok(payload) => {
                debug!(%endpoint, "relayed request succeeded");
                Ok(payload)
            }
            Err(e) => {
                warn!(%endpoint, error = %e, "relayed request failed");
                Err(e.into_transit_error(endpoint))
            }
        }
    }

    /// Send one request and classify the outcome.
    async fn attempt(
        &self,
        endpoint: Endpoint,
        request: OutboundRequest,
    ) -> Result<Payload, AttemptError> {
        let response = self
            .transport
            .get(&request)
            .await
            .map_err(|e| AttemptError::Network(e.message))?;

        if !response.is_success() {
            return Err(AttemptError::Status(response.status));
        }

        decode(endpoint, &response.body)
    }

    fn endpoint_url(
        &self,
        endpoint: Endpoint,
        credential: &Credential,
        params: &[(&str, Option<&str>)],
    ) -> Url {
        let mut url = self.base_url.clone();
        // Base URLs are checked to be hierarchical in `parse_base`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(endpoint.path());
        }
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(CREDENTIAL_PARAM, credential.as_str());
            for (name, value) in params {
                if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
                    query.append_pair(name, value);
                }
            }
        }
        url
    }

    fn relayed_request(&self, target: &Url) -> OutboundRequest {
        let mut url = self.relay_url.clone();
        url.query_pairs_mut()
            .append_pair(&self.proxy.url_param, target.as_str());
        OutboundRequest::get(url.as_str())
            .with_header(self.proxy.client_header.as_str(), self.proxy.client_id.as_str())
    }
}

/// Decode a successful body in the endpoint's wire format.
fn decode(endpoint: Endpoint, body: &str) -> Result<Payload, AttemptError> {
    match endpoint.format() {
        WireFormat::Json => {
            let value: Value =
                serde_json::from_str(body).map_err(|e| AttemptError::Unparseable(e.to_string()))?;
            match service_error_message(&value) {
                Some(message) => Err(AttemptError::Logical(message)),
                None => Ok(Payload::Json(value)),
            }
        }
        WireFormat::Xml => match parse_vehicle_document(body) {
            Ok(doc) => Ok(Payload::Xml(doc)),
            Err(XmlError::Malformed(message)) => Err(AttemptError::Unparseable(message)),
            Err(XmlError::Service(message)) => Err(AttemptError::Logical(message)),
        },
    }
}

fn malformed(endpoint: Endpoint, err: impl std::fmt::Display) -> TransitError {
    warn!(%endpoint, error = %err, "response could not be normalized");
    TransitError::MalformedResponse { endpoint }
}

fn parse_base(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let err = |reason: String| ConfigError {
        name,
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| err(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(err("not a hierarchical URL".to_string()));
    }
    Ok(url)
}

/// The URL with the credential masked, for logging.
fn redacted(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == CREDENTIAL_PARAM {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod client_tests;
