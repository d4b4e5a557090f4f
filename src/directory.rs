//! Resource directory: queries against the gateway's API inventory.
//!
//! The gateway's list endpoint is the only reliable source of truth, so
//! name/version lookups fetch the full inventory once and filter
//! client-side rather than relying on undocumented server-side filter
//! parameters.

use crate::client::GatewayClient;
use crate::error::{FaultClass, GatewayError};
use crate::model::{ApiEnvelope, ApiListEnvelope, ApiResource};

impl GatewayClient {
    /// Fetches all lineage members of a known API id.
    ///
    /// ## Errors
    ///
    /// [`GatewayError::ApiIdNotFound`] if the gateway reports no such id;
    /// [`GatewayError::OperationFailed`] for any other fault.
    pub async fn list_versions(&self, api_id: &str) -> Result<Vec<ApiResource>, GatewayError> {
        let url = self.request_url(&format!("apis/{api_id}/versions"))?;

        match self.transport.get::<ApiListEnvelope>(url, self.auth()?).await {
            Ok(envelope) => Ok(envelope.into_resources()),
            Err(fault) if FaultClass::of(&fault) == FaultClass::NotFound => {
                Err(GatewayError::ApiIdNotFound {
                    api_id: api_id.to_string(),
                })
            }
            Err(fault) => Err(self.operation_failed("list versions of", Some(api_id), fault)),
        }
    }

    /// Finds all APIs with `name`, optionally narrowed to an exact
    /// `version`.
    ///
    /// Fetches the full inventory once and filters client-side. Matches are
    /// returned in the order the gateway listed them, never re-sorted.
    ///
    /// ## Errors
    ///
    /// An empty result is [`GatewayError::ApiNameNotFound`] when no version
    /// was given and [`GatewayError::ApiVersionNotFound`] when one was; the
    /// two are distinct so callers can tell a missing lineage from a
    /// missing version. A fault on the inventory fetch itself (including
    /// authorization failures) is [`GatewayError::OperationFailed`] and is
    /// never reported as not-found.
    pub async fn find_by_name_and_version(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> Result<Vec<ApiResource>, GatewayError> {
        let url = self.request_url("apis")?;

        let envelope = self
            .transport
            .get::<ApiListEnvelope>(url, self.auth()?)
            .await
            .map_err(|fault| self.operation_failed("query the API inventory", None, fault))?;

        let mut matches: Vec<ApiResource> = envelope
            .into_resources()
            .into_iter()
            .filter(|api| api.name == name)
            .collect();

        if let Some(version) = version {
            matches.retain(|api| api.version == version);
        }

        if matches.is_empty() {
            return Err(match version {
                None => GatewayError::ApiNameNotFound {
                    name: name.to_string(),
                },
                Some(version) => GatewayError::ApiVersionNotFound {
                    name: name.to_string(),
                    version: version.to_string(),
                },
            });
        }

        Ok(matches)
    }

    /// Fetches a single API by id.
    pub async fn find_by_id(&self, api_id: &str) -> Result<ApiResource, GatewayError> {
        let url = self.request_url(&format!("apis/{api_id}"))?;

        match self.transport.get::<ApiEnvelope>(url, self.auth()?).await {
            Ok(envelope) => Ok(envelope.api_response.api),
            Err(fault) if FaultClass::of(&fault) == FaultClass::NotFound => {
                Err(GatewayError::ApiIdNotFound {
                    api_id: api_id.to_string(),
                })
            }
            Err(fault) => Err(self.operation_failed("find", Some(api_id), fault)),
        }
    }
}
