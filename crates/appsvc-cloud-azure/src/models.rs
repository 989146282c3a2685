//! Azure Resource Manager wire types

use appsvc_cloud::{HostingPlan, ResourceGroup, Site, Sku};
use serde::{Deserialize, Serialize};

// ============ Requests ============

#[derive(Debug, Serialize)]
pub(crate) struct ResourceGroupRequest<'a> {
    pub location: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ServerFarmRequest<'a> {
    pub location: &'a str,
    pub sku: &'a Sku,
}

#[derive(Debug, Serialize)]
pub(crate) struct SiteRequest<'a> {
    pub location: &'a str,
    pub properties: SiteRequestProperties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SiteRequestProperties<'a> {
    pub server_farm_id: &'a str,
}

// ============ Responses ============

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceGroupResponse {
    pub name: String,
    pub location: String,
}

impl From<ResourceGroupResponse> for ResourceGroup {
    fn from(r: ResourceGroupResponse) -> Self {
        Self {
            name: r.name,
            location: r.location,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServerFarmResponse {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub sku: Option<Sku>,
}

impl From<ServerFarmResponse> for HostingPlan {
    fn from(r: ServerFarmResponse) -> Self {
        Self {
            id: r.id,
            name: r.name,
            location: r.location,
            sku: r.sku,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SiteResponse {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub properties: SiteResponseProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SiteResponseProperties {
    #[serde(default)]
    pub host_names: Vec<String>,
    #[serde(default)]
    pub default_host_name: Option<String>,
    #[serde(default)]
    pub server_farm_id: Option<String>,
}

impl From<SiteResponse> for Site {
    fn from(r: SiteResponse) -> Self {
        let SiteResponseProperties {
            mut host_names,
            default_host_name,
            server_farm_id,
        } = r.properties;

        // hostNames can lag behind defaultHostName right after creation
        if host_names.is_empty() {
            host_names.extend(default_host_name);
        }

        Self {
            name: r.name,
            location: r.location,
            plan_id: server_farm_id,
            hostnames: host_names,
        }
    }
}

/// ARM error envelope: `{"error": {"code": "...", "message": "..."}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ArmErrorResponse {
    pub error: ArmErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArmErrorBody {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Microsoft identity platform token response
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Microsoft identity platform error: `{"error": "...", "error_description": "..."}`
#[derive(Debug, Deserialize)]
pub(crate) struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_request_shape() {
        let body = SiteRequest {
            location: "westus",
            properties: SiteRequestProperties {
                server_farm_id: "/subscriptions/sub1/farm",
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "location": "westus",
                "properties": { "serverFarmId": "/subscriptions/sub1/farm" }
            })
        );
    }

    #[test]
    fn test_server_farm_request_shape() {
        let sku = Sku::new("S1", "Standard", 1);
        let json = serde_json::to_value(ServerFarmRequest {
            location: "westus",
            sku: &sku,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "location": "westus",
                "sku": { "name": "S1", "tier": "Standard", "capacity": 1 }
            })
        );
    }

    #[test]
    fn test_site_response_falls_back_to_default_host_name() {
        let response: SiteResponse = serde_json::from_value(serde_json::json!({
            "name": "sample-site-name-7",
            "location": "West US",
            "properties": {
                "hostNames": [],
                "defaultHostName": "sample-site-name-7.azurewebsites.net"
            }
        }))
        .unwrap();

        let site = Site::from(response);
        assert_eq!(site.hostnames, vec!["sample-site-name-7.azurewebsites.net"]);
        assert_eq!(site.plan_id, None);
    }

    #[test]
    fn test_site_response_without_properties() {
        let response: SiteResponse =
            serde_json::from_value(serde_json::json!({ "name": "bare" })).unwrap();
        let site = Site::from(response);
        assert!(site.hostnames.is_empty());
    }
}
