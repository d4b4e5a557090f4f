//! Data model for gateway resources, plus the wire envelopes the gateway
//! wraps them in.
//!
//! Everything here is owned by the gateway; the client deserializes and
//! never mutates. Gateway timestamps are vendor-formatted strings and are
//! passed through verbatim.

use serde::Deserialize;
use strum::Display;

/// An API definition registered on the gateway.
///
/// A set of resources sharing one `name` forms a version lineage. The
/// user-facing `version` string follows whatever ordering the vendor gives
/// it; `system_version` is the gateway-assigned monotonic counter that
/// identifies the latest lineage member.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResource {
    /// Unique id assigned by the gateway.
    pub id: String,
    /// Logical API name shared across the lineage.
    #[serde(rename = "apiName")]
    pub name: String,
    /// User-facing version string, opaque to the client.
    #[serde(rename = "apiVersion")]
    pub version: String,
    /// Monotonic creation counter within the lineage.
    #[serde(default)]
    pub system_version: i64,
    /// Whether the API is currently active on the gateway.
    #[serde(default)]
    pub is_active: bool,
    /// Gateway-formatted creation timestamp.
    #[serde(rename = "creationDate", default)]
    pub created: Option<String>,
    /// Gateway-formatted last-modification timestamp.
    #[serde(rename = "lastModified", default)]
    pub modified: Option<String>,
}

/// Activation state of an API resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ApiState {
    /// The API accepts traffic.
    Active,
    /// The API is registered but not serving.
    Inactive,
}

impl ApiState {
    /// The gateway endpoint segment that requests this state.
    pub(crate) fn action(self) -> &'static str {
        match self {
            Self::Active => "activate",
            Self::Inactive => "deactivate",
        }
    }
}

/// A named deployment target to which APIs can be promoted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Stage {
    /// Unique id assigned by the gateway.
    pub id: String,
    /// Stage name, matched exactly during lookup.
    pub name: String,
}

/// A one-shot request, accepted by the gateway, to copy API assets to one
/// or more stages. Immutable once created.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// Id assigned by the gateway, when echoed back.
    #[serde(default)]
    pub id: Option<String>,
    /// Promotion name as submitted.
    pub name: String,
    /// Destination stage ids.
    #[serde(default)]
    pub destination_stages: Vec<String>,
}

/// Sentinel the gateway uses in per-item delete responses.
pub(crate) const DELETE_SUCCESS: &str = "SUCCESS";

// Wire envelopes. The gateway wraps single resources as
// `{"apiResponse": {"api": {...}}}` and lists as
// `{"apiResponse": [{"api": {...}}, ...]}`; list entries without an `api`
// key do occur and are skipped.

#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope {
    #[serde(rename = "apiResponse")]
    pub api_response: ApiItem,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiItem {
    pub api: ApiResource,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiListEnvelope {
    #[serde(rename = "apiResponse", default)]
    pub api_response: Vec<ApiListItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiListItem {
    #[serde(default)]
    pub api: Option<ApiResource>,
}

impl ApiListEnvelope {
    /// Unwraps the list entries, skipping any without an `api` payload.
    pub(crate) fn into_resources(self) -> Vec<ApiResource> {
        self.api_response
            .into_iter()
            .filter_map(|item| item.api)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteEnvelope {
    #[serde(rename = "apiResponse", default)]
    pub api_response: Vec<DeleteItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteItem {
    #[serde(rename = "responseStatus", default)]
    pub response_status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StagesEnvelope {
    #[serde(default)]
    pub stages: Vec<Stage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PromotionEnvelope {
    pub promotion: Promotion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_single_api_envelope() {
        let raw = r#"{
            "apiResponse": {
                "api": {
                    "id": "5f2b",
                    "apiName": "Swagger Petstore",
                    "apiVersion": "1.0.6",
                    "systemVersion": 1,
                    "isActive": true,
                    "creationDate": "2024-01-15 10:30:00 GMT",
                    "type": "swagger"
                }
            }
        }"#;

        let envelope: ApiEnvelope = serde_json::from_str(raw).unwrap();
        let api = envelope.api_response.api;

        assert_eq!(api.id, "5f2b");
        assert_eq!(api.name, "Swagger Petstore");
        assert_eq!(api.version, "1.0.6");
        assert_eq!(api.system_version, 1);
        assert!(api.is_active);
        assert_eq!(api.created.as_deref(), Some("2024-01-15 10:30:00 GMT"));
        assert_eq!(api.modified, None);
    }

    #[test]
    fn list_envelope_skips_entries_without_api_payload() {
        let raw = r#"{
            "apiResponse": [
                {"api": {"id": "a1", "apiName": "Petstore", "apiVersion": "1.0"}},
                {"responseStatus": "ERROR"},
                {"api": {"id": "a2", "apiName": "Petstore", "apiVersion": "2.0"}}
            ]
        }"#;

        let envelope: ApiListEnvelope = serde_json::from_str(raw).unwrap();
        let apis = envelope.into_resources();

        assert_eq!(apis.len(), 2);
        assert_eq!(apis[0].id, "a1");
        assert_eq!(apis[1].id, "a2");
    }

    #[test]
    fn empty_list_envelope_is_tolerated() {
        let envelope: ApiListEnvelope = serde_json::from_str(r#"{"apiResponse": []}"#).unwrap();
        assert!(envelope.into_resources().is_empty());
    }

    #[test]
    fn api_state_display() {
        assert_eq!(ApiState::Active.to_string(), "active");
        assert_eq!(ApiState::Inactive.to_string(), "inactive");
        assert_eq!(ApiState::Active.action(), "activate");
        assert_eq!(ApiState::Inactive.action(), "deactivate");
    }

    #[test]
    fn deserializes_delete_envelope() {
        let raw = r#"{"apiResponse": [{"responseStatus": "SUCCESS"}]}"#;
        let envelope: DeleteEnvelope = serde_json::from_str(raw).unwrap();

        assert_eq!(envelope.api_response.len(), 1);
        assert_eq!(envelope.api_response[0].response_status, DELETE_SUCCESS);
    }
}
