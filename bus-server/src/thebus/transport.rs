//! The outbound HTTP seam.
//!
//! The client only ever issues plain GETs and needs the status and body text
//! back, so the seam is that narrow. Tests substitute scripted transports.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// A GET request ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl OutboundRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The exchange produced no response at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the credential.
        TransportError {
            message: err.without_url().to_string(),
        }
    }
}

/// Something that can perform a GET.
pub trait Transport: Send + Sync {
    fn get(
        &self,
        request: &OutboundRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport. Without a timeout, requests wait as long as the
    /// underlying connection does.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| TransportError {
                message: format!("invalid header name {name:?}"),
            })?;
            let value = HeaderValue::from_str(value).map_err(|_| TransportError {
                message: "invalid header value".to_string(),
            })?;
            headers.insert(name, value);
        }

        let response = self.http.get(&request.url).headers(headers).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        let ok = |status| RawResponse {
            status,
            body: String::new(),
        };
        assert!(ok(200).is_success());
        assert!(ok(204).is_success());
        assert!(!ok(304).is_success());
        assert!(!ok(500).is_success());
    }

    #[test]
    fn builder_collects_headers() {
        let req = OutboundRequest::get("http://localhost/x").with_header("x-requested-with", "app");
        assert_eq!(
            req.headers,
            vec![("x-requested-with".to_string(), "app".to_string())]
        );
    }

    #[test]
    fn transport_creation() {
        assert!(ReqwestTransport::new(None).is_ok());
        assert!(ReqwestTransport::new(Some(Duration::from_secs(5))).is_ok());
    }

    #[tokio::test]
    async fn connection_error_omits_request_url() {
        const KEY: &str = "a-valid-looking-key-01";
        let transport = ReqwestTransport::new(Some(Duration::from_secs(5))).unwrap();
        // Nothing listens on the discard port.
        let request = OutboundRequest::get(format!("http://127.0.0.1:9/vehicle?key={KEY}&num=249"));

        let err = transport.get(&request).await.unwrap_err();

        assert!(!err.message.is_empty());
        assert!(!err.message.contains(KEY), "leaked: {}", err.message);
        assert!(!err.to_string().contains("127.0.0.1:9/vehicle"));
    }
}
