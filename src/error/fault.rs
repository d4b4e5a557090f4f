//! Transport faults and their classification.
//!
//! A [`TransportFault`] is the raw evidence of a failed gateway exchange:
//! the HTTP status and body when the gateway answered, or the underlying
//! `reqwest` error when it did not. Faults never cross the crate boundary
//! directly; components map them to [`GatewayError`](super::GatewayError)
//! variants after consulting [`FaultClass`].

use thiserror::Error;

/// A failed exchange with the gateway, prior to domain classification.
#[derive(Debug, Error)]
pub enum TransportFault {
    /// The gateway answered with a non-success status code.
    #[error("gateway returned HTTP {status}: {body}")]
    Status {
        /// The HTTP status code returned.
        status: u16,
        /// The response body, captured for diagnostics.
        body: String,
    },

    /// The request never produced a usable response (connect failure,
    /// timeout, or a body that could not be decoded).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl TransportFault {
    /// The HTTP status code, when the gateway answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// The captured response body, when one exists.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            Self::Request(_) => None,
        }
    }
}

/// Domain classification of a transport fault.
///
/// The gateway overloads its status codes: 404 means the addressed resource
/// does not exist, while the activation endpoints answer in the 5xx range
/// when asked for a transition the resource is already in. Everything else,
/// including authorization and validation failures, is `Other` and must
/// never be reinterpreted as "not found".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FaultClass {
    /// The addressed resource does not exist (HTTP 404).
    NotFound,
    /// The resource is already in the requested state (HTTP 5xx).
    StateConflict,
    /// Any other failure, network faults included.
    Other,
}

impl FaultClass {
    /// Classifies a fault by its HTTP status.
    pub(crate) fn of(fault: &TransportFault) -> Self {
        match fault.status() {
            Some(404) => Self::NotFound,
            Some(status) if status >= 500 => Self::StateConflict,
            _ => Self::Other,
        }
    }
}
