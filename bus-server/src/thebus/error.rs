//! Transit client error types.

use std::fmt;

use crate::domain::CredentialRejection;

use super::endpoint::Endpoint;

/// Errors raised by the transit client.
///
/// Transport and parse failures are only raised after the relayed retry has
/// also failed. Their messages name the affected data rather than the
/// underlying transport fault, which is logged instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitError {
    /// The credential failed validation; nothing was sent.
    #[error("please provide a valid API key ({0})")]
    CredentialInvalid(#[from] CredentialRejection),

    /// Both attempts failed at the network or HTTP level.
    #[error("{}", unavailable(.endpoint))]
    TransportFailure {
        endpoint: Endpoint,
        /// Last HTTP status seen; `None` when no response arrived at all.
        status: Option<u16>,
    },

    /// The service answered with its own error message. Never retried.
    #[error("{0}")]
    LogicalServiceError(String),

    /// Both attempts returned bodies that could not be parsed.
    #[error("{}", unavailable(.endpoint))]
    MalformedResponse { endpoint: Endpoint },
}

fn unavailable(endpoint: &Endpoint) -> &'static str {
    endpoint.unavailable_message()
}

impl TransitError {
    /// HTTP status of the final failed attempt, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransitError::TransportFailure { status, .. } => *status,
            _ => None,
        }
    }
}

/// Why a single attempt (direct or relayed) failed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AttemptError {
    /// No response: DNS, connection reset, blocked by CORS, etc.
    Network(String),
    /// A response arrived with a non-success status.
    Status(u16),
    /// A success status whose body did not parse in the expected format.
    Unparseable(String),
    /// A well-formed body carrying a service-reported error.
    Logical(String),
}

impl AttemptError {
    /// Transport-level faults are worth one relayed retry; logical ones are not.
    pub(crate) fn is_retryable(&self) -> bool {
        !matches!(self, AttemptError::Logical(_))
    }

    pub(crate) fn into_transit_error(self, endpoint: Endpoint) -> TransitError {
        match self {
            AttemptError::Network(_) => TransitError::TransportFailure {
                endpoint,
                status: None,
            },
            AttemptError::Status(status) => TransitError::TransportFailure {
                endpoint,
                status: Some(status),
            },
            AttemptError::Unparseable(_) => TransitError::MalformedResponse { endpoint },
            AttemptError::Logical(message) => TransitError::LogicalServiceError(message),
        }
    }
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Network(message) => write!(f, "network error: {message}"),
            AttemptError::Status(status) => write!(f, "HTTP status {status}"),
            AttemptError::Unparseable(message) => write!(f, "unparseable body: {message}"),
            AttemptError::Logical(message) => write!(f, "service error: {message}"),
        }
    }
}
