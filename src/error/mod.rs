//! Error taxonomy for gateway operations.
//!
//! Every transport fault is caught at a component boundary, logged with its
//! status and body, and re-raised as one of the [`GatewayError`] variants
//! below. Callers branch on the variant (or on [`GatewayError::is_not_found`])
//! rather than matching message strings; search keys and resource ids travel
//! as structured fields.

mod fault;

pub(crate) use fault::FaultClass;
pub use fault::TransportFault;

use std::path::PathBuf;

use thiserror::Error;

use crate::model::ApiState;

/// Errors surfaced by gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The session was used before `configure` or after `clear`.
    #[error("gateway session is not configured")]
    NotConfigured,

    /// The configured gateway URL could not be parsed.
    #[error("invalid gateway URL `{url}`: {source}")]
    InvalidUrl {
        /// The URL as supplied by the caller.
        url: String,
        /// The parse failure.
        source: url::ParseError,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("failed to initialize the HTTP client: {source}")]
    Init {
        /// The construction failure.
        source: reqwest::Error,
    },

    /// No API with the given name exists on the gateway.
    #[error("no API named `{name}` exists on the gateway")]
    ApiNameNotFound {
        /// The name that was searched for.
        name: String,
    },

    /// APIs with the given name exist, but none with the given version.
    #[error("no API named `{name}` with version `{version}` exists on the gateway")]
    ApiVersionNotFound {
        /// The name that was searched for.
        name: String,
        /// The version that was searched for.
        version: String,
    },

    /// No API with the given id exists on the gateway.
    #[error("no API with ID `{api_id}` exists on the gateway")]
    ApiIdNotFound {
        /// The id that was addressed.
        api_id: String,
    },

    /// No stage with the given name exists on the gateway.
    #[error("stage `{name}` does not exist on the gateway")]
    StageNotFound {
        /// The stage name that was searched for.
        name: String,
    },

    /// The gateway reports the API already in the requested activation
    /// state and the caller demanded strictness.
    #[error("API `{api_id}` is already {desired}")]
    ActivationConflict {
        /// The addressed API.
        api_id: String,
        /// The activation state that was requested.
        desired: ApiState,
    },

    /// A specification reference resolved neither locally nor remotely.
    #[error("specification `{reference}` was not found locally or remotely")]
    SourceNotFound {
        /// The path or URL as supplied by the caller.
        reference: String,
    },

    /// A specification file could not be used: wrong extension for its
    /// declared format, or contents that cannot be inspected.
    #[error("unsupported specification `{}`: {reason}", .path.display())]
    UnsupportedFormat {
        /// The offending file.
        path: PathBuf,
        /// What made it unusable.
        reason: String,
    },

    /// A gateway call failed and no recovery path applied.
    #[error("failed to {operation}{}", .api_id.as_ref().map(|id| format!(" API `{id}`")).unwrap_or_default())]
    OperationFailed {
        /// The operation that was attempted, e.g. `create` or `delete`.
        operation: String,
        /// The addressed API, when the operation targets one.
        api_id: Option<String>,
        /// The underlying transport fault.
        #[source]
        source: TransportFault,
    },

    /// The gateway rejected a promotion submission.
    #[error("failed to promote `{name}` to the target stage")]
    PromotionFailed {
        /// The promotion name.
        name: String,
        /// The underlying transport fault.
        #[source]
        source: TransportFault,
    },

    /// A local file read failed.
    #[error("failed to read `{}`: {source}", .path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The I/O failure.
        source: std::io::Error,
    },
}

impl GatewayError {
    /// Returns `true` for the not-found family: name, name+version, id, and
    /// stage lookups that matched nothing.
    ///
    /// The reconciler uses this to tell "the lineage does not exist yet"
    /// apart from genuine failures; everything outside this family
    /// propagates unchanged.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ApiNameNotFound { .. }
                | Self::ApiVersionNotFound { .. }
                | Self::ApiIdNotFound { .. }
                | Self::StageNotFound { .. }
        )
    }
}
