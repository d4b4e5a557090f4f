//! Gateway session context: management endpoint and credentials.
//!
//! A [`Session`] is an explicit value owned by the client, with an explicit
//! `configure`/`clear` lifecycle. Operations invoked on an unconfigured
//! session fail fast with [`GatewayError::NotConfigured`]; there is no
//! anonymous fallback.

use url::Url;

use crate::error::GatewayError;

/// Path suffix of the gateway's management REST interface, appended to the
/// configured base URL.
const MANAGEMENT_PATH: &str = "rest/apigateway";

/// Basic-auth credential pair for the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a new credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The basic-auth username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The basic-auth password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Connection context for a single gateway instance.
///
/// Holds the derived management endpoint (base URL plus the fixed
/// `rest/apigateway` suffix) and the credential pair used for every call.
///
/// A `Session` serves one gateway at a time. Reconfiguring or clearing it
/// while requests built from it are still in flight is not guarded against;
/// callers that share a client across tasks must serialize reconfiguration
/// themselves.
///
/// ## Examples
///
/// ```rust
/// use apigw_client::Session;
///
/// let mut session = Session::new();
/// assert!(session.endpoint().is_err());
///
/// session.configure("http://localhost:5555", "Administrator", "manage").unwrap();
/// assert_eq!(
///     session.endpoint().unwrap().as_str(),
///     "http://localhost:5555/rest/apigateway"
/// );
///
/// session.clear();
/// assert!(session.credentials().is_err());
/// ```
#[derive(Debug, Default)]
pub struct Session {
    state: Option<SessionState>,
}

#[derive(Debug)]
struct SessionState {
    endpoint: Url,
    credentials: Credentials,
}

impl Session {
    /// Creates an unconfigured session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the gateway connection: derives the management endpoint from
    /// `url` and keeps the credential pair for basic auth.
    ///
    /// ## Errors
    ///
    /// Returns [`GatewayError::InvalidUrl`] if `url` does not parse as an
    /// absolute URL.
    pub fn configure(
        &mut self,
        url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<(), GatewayError> {
        let derived = format!("{}/{MANAGEMENT_PATH}", url.trim_end_matches('/'));
        let endpoint = Url::parse(&derived).map_err(|source| GatewayError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        self.state = Some(SessionState {
            endpoint,
            credentials: Credentials::new(username, password),
        });
        Ok(())
    }

    /// Discards the stored endpoint and credentials.
    pub fn clear(&mut self) {
        self.state = None;
    }

    /// Returns `true` once `configure` has succeeded and `clear` has not
    /// been called since.
    pub fn is_configured(&self) -> bool {
        self.state.is_some()
    }

    /// The management endpoint, failing if the session is not configured.
    pub fn endpoint(&self) -> Result<&Url, GatewayError> {
        self.state
            .as_ref()
            .map(|state| &state.endpoint)
            .ok_or(GatewayError::NotConfigured)
    }

    /// The credential pair, failing if the session is not configured.
    pub fn credentials(&self) -> Result<&Credentials, GatewayError> {
        self.state
            .as_ref()
            .map(|state| &state.credentials)
            .ok_or(GatewayError::NotConfigured)
    }
}
