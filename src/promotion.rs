//! Stage lookup and API promotion.

use serde::Serialize;
use tracing::{debug, error};

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::model::{Promotion, PromotionEnvelope, Stage, StagesEnvelope};

/// Policy flags for a promotion, all of which the gateway defaults would
/// otherwise leave off. Everything defaults to `true` here.
#[derive(Debug, Clone, Copy)]
pub struct PromoteOptions {
    /// Overwrite existing assets on the target stage (aliases excepted).
    pub overwrite: bool,
    /// Overwrite existing aliases on the target stage.
    pub overwrite_alias: bool,
    /// Fix missing versions of the API on the target stage.
    pub fix_missing_versions: bool,
}

impl Default for PromoteOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            overwrite_alias: true,
            fix_missing_versions: true,
        }
    }
}

/// Request body for a promotion submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PromotionRequest<'a> {
    name: &'a str,
    destination_stages: Vec<&'a str>,
    promoted_assets: Vec<&'a str>,
}

impl GatewayClient {
    /// Resolves a deployment stage by exact name.
    ///
    /// ## Errors
    ///
    /// [`GatewayError::StageNotFound`] when no stage carries `name`;
    /// [`GatewayError::OperationFailed`] when the stage list itself could
    /// not be fetched.
    pub async fn find_stage(&self, name: &str) -> Result<Stage, GatewayError> {
        let url = self.request_url("stages")?;

        let envelope = self
            .transport
            .get::<StagesEnvelope>(url, self.auth()?)
            .await
            .map_err(|fault| self.operation_failed("query the stage catalog", None, fault))?;

        envelope
            .stages
            .into_iter()
            .find(|stage| stage.name == name)
            .ok_or_else(|| GatewayError::StageNotFound {
                name: name.to_string(),
            })
    }

    /// Submits a promotion bundling one API to one destination stage.
    ///
    /// The three policy flags travel as query parameters; the body names
    /// the promotion and lists the asset and stage ids. Returns the
    /// promotion as echoed by the gateway.
    pub async fn promote(
        &self,
        name: &str,
        api_id: &str,
        stage_id: &str,
        options: PromoteOptions,
    ) -> Result<Promotion, GatewayError> {
        let mut url = self.request_url("promotion")?;
        url.query_pairs_mut()
            .append_pair("overwrite", bool_str(options.overwrite))
            .append_pair("overwriteAlias", bool_str(options.overwrite_alias))
            .append_pair("fixMissingVersions", bool_str(options.fix_missing_versions));

        let body = PromotionRequest {
            name,
            destination_stages: vec![stage_id],
            promoted_assets: vec![api_id],
        };

        debug!(stage_id, api_id, "submitting promotion `{name}`");
        match self
            .transport
            .post_json::<PromotionEnvelope, _>(url, self.auth()?, &body)
            .await
        {
            Ok(envelope) => Ok(envelope.promotion),
            Err(fault) => {
                error!(
                    status = ?fault.status(),
                    body = fault.body().unwrap_or_default(),
                    "promotion `{name}` was rejected"
                );
                Err(GatewayError::PromotionFailed {
                    name: name.to_string(),
                    source: fault,
                })
            }
        }
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
