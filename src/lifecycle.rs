//! Lifecycle reconciliation: create, version, update, activate, delete.
//!
//! [`GatewayClient::reconcile`] is the decision core. Given a resolved
//! specification it re-derives the gateway state from a fresh inventory
//! query on every call (the gateway may be modified out-of-band, so nothing
//! is cached) and picks exactly one of three actions: create a new API,
//! update an existing version in place, or branch a new version off the
//! latest lineage member and then update it.

use serde::Serialize;
use tracing::{debug, error, instrument};

use crate::client::GatewayClient;
use crate::error::{FaultClass, GatewayError};
use crate::model::{
    ApiEnvelope, ApiResource, ApiState, DeleteEnvelope, DELETE_SUCCESS,
};
use crate::spec::SpecDescriptor;
use crate::transport::spec_form;

/// Request body for branching a new version off an existing API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewVersionRequest<'a> {
    new_api_version: &'a str,
    retain_applications: bool,
}

impl GatewayClient {
    /// Brings the gateway in line with `spec`: creates the API if its name
    /// is unknown, updates the matching version in place if one exists, or
    /// branches a new version off the latest lineage member and replaces
    /// its content.
    ///
    /// The branch-then-update path is two sequential round trips with no
    /// compensation: if the update fails after the branch succeeded, the
    /// new version remains on the gateway with the base version's content.
    ///
    /// Reads and writes are not serialized against other clients. Two
    /// concurrent `reconcile` calls for the same name and version can race
    /// into a double create or double branch; callers that need that
    /// guarantee must serialize externally.
    ///
    /// ## Errors
    ///
    /// Lookup faults other than the not-found family propagate unchanged,
    /// so an authorization failure never turns into a create attempt.
    #[instrument(skip(self, spec), fields(api_name = %spec.name, api_version = %spec.version))]
    pub async fn reconcile(&self, spec: &SpecDescriptor) -> Result<ApiResource, GatewayError> {
        let lineage = match self.find_by_name_and_version(&spec.name, None).await {
            Ok(lineage) => lineage,
            Err(err) if err.is_not_found() => {
                debug!("no existing lineage, creating a new API");
                return self.create_api(spec).await;
            }
            Err(err) => return Err(err),
        };

        if let Some(existing) = lineage.iter().find(|api| api.version == spec.version) {
            debug!(api_id = %existing.id, "exact version match, updating in place");
            return self.update_api(&existing.id, spec).await;
        }

        let base = latest_member(&lineage).ok_or_else(|| GatewayError::ApiNameNotFound {
            name: spec.name.clone(),
        })?;
        debug!(base_id = %base.id, base_version = %base.version, "branching a new version");

        let branched = self.create_api_version(&base.id, &spec.version, true).await?;
        self.update_api(&branched.id, spec).await
    }

    /// Registers `spec` as a brand-new API.
    ///
    /// ## Errors
    ///
    /// [`GatewayError::UnsupportedFormat`] if the file extension does not
    /// fit the declared format; the mismatch is caught before any request
    /// is made.
    pub async fn create_api(&self, spec: &SpecDescriptor) -> Result<ApiResource, GatewayError> {
        spec.check_extension()?;
        let form = spec_form(&spec.local_path, spec.format).await?;
        let url = self.request_url("apis")?;

        match self
            .transport
            .post_multipart::<ApiEnvelope>(url, self.auth()?, form)
            .await
        {
            Ok(envelope) => Ok(envelope.api_response.api),
            Err(fault) => Err(self.operation_failed("create", None, fault)),
        }
    }

    /// Replaces the stored specification of an existing API version,
    /// preserving its id.
    pub async fn update_api(
        &self,
        api_id: &str,
        spec: &SpecDescriptor,
    ) -> Result<ApiResource, GatewayError> {
        spec.check_extension()?;
        let form = spec_form(&spec.local_path, spec.format).await?;
        let url = self.request_url(&format!("apis/{api_id}"))?;

        match self
            .transport
            .put_multipart::<ApiEnvelope>(url, self.auth()?, form)
            .await
        {
            Ok(envelope) => Ok(envelope.api_response.api),
            Err(fault) => Err(self.operation_failed("update", Some(api_id), fault)),
        }
    }

    /// Branches a new version, tagged `new_version`, off the latest member
    /// of the lineage that `api_id` belongs to.
    ///
    /// The lineage is re-derived from the gateway first, so `api_id` may
    /// name any member, not necessarily the latest. With
    /// `retain_applications` the gateway carries existing application
    /// associations over to the new version.
    pub async fn create_api_version(
        &self,
        api_id: &str,
        new_version: &str,
        retain_applications: bool,
    ) -> Result<ApiResource, GatewayError> {
        let versions = self.list_versions(api_id).await?;
        let base = latest_member(&versions).ok_or_else(|| GatewayError::ApiIdNotFound {
            api_id: api_id.to_string(),
        })?;

        let url = self.request_url(&format!("apis/{}/versions", base.id))?;
        let body = NewVersionRequest {
            new_api_version: new_version,
            retain_applications,
        };

        match self
            .transport
            .post_json::<ApiEnvelope, _>(url, self.auth()?, &body)
            .await
        {
            Ok(envelope) => Ok(envelope.api_response.api),
            Err(fault) => {
                Err(self.operation_failed("create a new version of", Some(api_id), fault))
            }
        }
    }

    /// Activates an API.
    ///
    /// With `fail_if_active` unset, a gateway complaint that the API is
    /// already active is tolerated: the current resource is re-fetched and
    /// returned. With it set, the same complaint surfaces as
    /// [`GatewayError::ActivationConflict`].
    pub async fn activate(
        &self,
        api_id: &str,
        fail_if_active: bool,
    ) -> Result<ApiResource, GatewayError> {
        self.set_activation(api_id, ApiState::Active, fail_if_active)
            .await
    }

    /// Deactivates an API; the mirror of [`GatewayClient::activate`].
    pub async fn deactivate(
        &self,
        api_id: &str,
        fail_if_inactive: bool,
    ) -> Result<ApiResource, GatewayError> {
        self.set_activation(api_id, ApiState::Inactive, fail_if_inactive)
            .await
    }

    /// Shared activation/deactivation path.
    ///
    /// The gateway signals "already in the requested state" with a 5xx
    /// response on these endpoints; genuine errors come back as 4xx. Only
    /// the former has a recovery path, and only when the caller tolerates
    /// it.
    async fn set_activation(
        &self,
        api_id: &str,
        desired: ApiState,
        fail_if_current: bool,
    ) -> Result<ApiResource, GatewayError> {
        let action = desired.action();
        let url = self.request_url(&format!("apis/{api_id}/{action}"))?;

        match self.transport.put_empty::<ApiEnvelope>(url, self.auth()?).await {
            Ok(envelope) => Ok(envelope.api_response.api),
            Err(fault) if FaultClass::of(&fault) == FaultClass::StateConflict => {
                if fail_if_current {
                    error!(
                        status = ?fault.status(),
                        body = fault.body().unwrap_or_default(),
                        "API `{api_id}` is already {desired}"
                    );
                    Err(GatewayError::ActivationConflict {
                        api_id: api_id.to_string(),
                        desired,
                    })
                } else {
                    debug!("gateway reports API `{api_id}` already {desired}, returning current state");
                    self.find_by_id(api_id).await
                }
            }
            Err(fault) => Err(self.operation_failed(action, Some(api_id), fault)),
        }
    }

    /// Deletes an API, optionally forcing removal while applications still
    /// reference it.
    ///
    /// The gateway can answer HTTP 200 with a per-item failure payload, so
    /// success means the first per-item `responseStatus` equals the
    /// `SUCCESS` sentinel, not merely a 2xx response. Transport faults are
    /// surfaced as errors, never as `false`.
    pub async fn delete(&self, api_id: &str, force: bool) -> Result<bool, GatewayError> {
        let mut url = self.request_url("apis")?;
        url.query_pairs_mut()
            .append_pair("apiIds", api_id)
            .append_pair("forceDelete", if force { "true" } else { "false" });

        match self
            .transport
            .delete::<DeleteEnvelope>(url, self.auth()?)
            .await
        {
            Ok(envelope) => Ok(envelope
                .api_response
                .first()
                .is_some_and(|item| item.response_status == DELETE_SUCCESS)),
            Err(fault) => Err(self.operation_failed("delete", Some(api_id), fault)),
        }
    }
}

/// Picks the lineage member with the highest `system_version`. Duplicate
/// maxima should not occur under gateway invariants; if they do, the first
/// occurrence wins.
fn latest_member(lineage: &[ApiResource]) -> Option<&ApiResource> {
    lineage.iter().fold(None, |best, api| match best {
        Some(current) if current.system_version >= api.system_version => Some(current),
        _ => Some(api),
    })
}
