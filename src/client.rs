//! Gateway client construction and shared request plumbing.

use tracing::error;
use url::Url;

use crate::error::{GatewayError, TransportFault};
use crate::session::{Credentials, Session};
use crate::transport::Transport;

/// Async client for a single API gateway instance.
///
/// All operations hang off this type: inventory queries, lifecycle
/// reconciliation, activation, deletion, and promotion. The client owns a
/// [`Session`] (endpoint + credentials) and a pooled HTTP transport;
/// construct one per gateway and share it.
///
/// ## Examples
///
/// ```rust,no_run
/// use apigw_client::{GatewayClient, SpecResolver};
///
/// # async fn demo() -> Result<(), apigw_client::GatewayError> {
/// let client = GatewayClient::connect("http://localhost:5555", "Administrator", "manage")?;
///
/// let resolver = SpecResolver::new()?;
/// let spec = resolver.descriptor("petstore.openapi.json").await?;
///
/// let api = client.reconcile(&spec).await?;
/// let api = client.activate(&api.id, false).await?;
/// assert!(api.is_active);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GatewayClient {
    pub(crate) session: Session,
    pub(crate) transport: Transport,
}

impl GatewayClient {
    /// Creates a client around an existing session.
    ///
    /// The session may still be unconfigured; operations will fail with
    /// [`GatewayError::NotConfigured`] until it is.
    pub fn new(session: Session) -> Result<Self, GatewayError> {
        Ok(Self {
            session,
            transport: Transport::new()?,
        })
    }

    /// Creates a client with a freshly configured session.
    pub fn connect(
        url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let mut session = Session::new();
        session.configure(url, username, password)?;
        Self::new(session)
    }

    /// The session this client operates with.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access to the session, for reconfiguration or teardown.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Builds a management URL for `path`, relative to the session endpoint.
    pub(crate) fn request_url(&self, path: &str) -> Result<Url, GatewayError> {
        let endpoint = self.session.endpoint()?;
        let joined = format!("{endpoint}/{path}");
        Url::parse(&joined).map_err(|source| GatewayError::InvalidUrl {
            url: joined,
            source,
        })
    }

    pub(crate) fn auth(&self) -> Result<&Credentials, GatewayError> {
        self.session.credentials()
    }

    /// Logs a fault with its full diagnostic detail and wraps it as
    /// [`GatewayError::OperationFailed`].
    pub(crate) fn operation_failed(
        &self,
        operation: &str,
        api_id: Option<&str>,
        fault: TransportFault,
    ) -> GatewayError {
        error!(
            status = ?fault.status(),
            body = fault.body().unwrap_or_default(),
            "gateway call failed: {operation}"
        );
        GatewayError::OperationFailed {
            operation: operation.to_string(),
            api_id: api_id.map(Into::into),
            source: fault,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_extends_the_management_endpoint() {
        let client =
            GatewayClient::connect("http://localhost:5555", "admin", "manage").unwrap();

        let url = client.request_url("apis/a1/versions").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5555/rest/apigateway/apis/a1/versions"
        );
    }

    #[test]
    fn unconfigured_client_fails_fast() {
        let client = GatewayClient::new(Session::new()).unwrap();

        assert!(matches!(
            client.request_url("apis"),
            Err(GatewayError::NotConfigured)
        ));
    }

    #[test]
    fn cleared_session_fails_fast() {
        let mut client =
            GatewayClient::connect("http://localhost:5555", "admin", "manage").unwrap();
        client.session_mut().clear();

        assert!(matches!(
            client.auth(),
            Err(GatewayError::NotConfigured)
        ));
    }
}
