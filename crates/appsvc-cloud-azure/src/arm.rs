//! Azure Resource Manager REST client
//!
//! Direct ARM API implementation for resource groups, App Service plans
//! (`Microsoft.Web/serverfarms`) and web apps (`Microsoft.Web/sites`).

use crate::error::{AzureError, Result};
use crate::models::{
    ArmErrorResponse, ResourceGroupRequest, ResourceGroupResponse, ServerFarmRequest,
    ServerFarmResponse, SiteRequest, SiteRequestProperties, SiteResponse,
};
use appsvc_cloud::{HostingPlan, ManagementClient, ResourceGroup, SessionToken, Site, Sku};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;

pub const RESOURCES_API_VERSION: &str = "2021-04-01";
pub const WEB_API_VERSION: &str = "2022-03-01";

/// ARM client scoped to one subscription
pub struct AzureManagementClient {
    client: reqwest::Client,
    endpoint: String,
    subscription_id: String,
}

impl AzureManagementClient {
    /// Create a client against `endpoint` (e.g., `https://management.azure.com`)
    pub fn new(endpoint: impl Into<String>, subscription_id: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let subscription_id = subscription_id.into();

        if subscription_id.trim().is_empty() {
            return Err(AzureError::InvalidConfig(
                "subscription id must not be empty".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            subscription_id,
        })
    }

    fn group_path(&self, group: &str) -> String {
        format!(
            "/subscriptions/{}/resourcegroups/{}",
            self.subscription_id, group
        )
    }

    /// ARM resource ID of a `Microsoft.Web` resource
    fn web_path(&self, group: &str, kind: &str, name: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Web/{}/{}",
            self.subscription_id, group, kind, name
        )
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        api_version: &str,
        session: &SessionToken,
    ) -> RequestBuilder {
        let url = format!("{}{}", self.endpoint, path);
        tracing::debug!("{} {}?api-version={}", method, url, api_version);

        self.client
            .request(method, &url)
            .query(&[("api-version", api_version)])
            .bearer_auth(session.bearer())
    }

    /// Send a request and return the response body, mapping non-2xx to [`AzureError::Api`]
    async fn send(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_str::<ArmErrorResponse>(&body) {
                Ok(e) => (e.error.code, e.error.message),
                Err(_) => (
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string(),
                    body,
                ),
            };
            return Err(AzureError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        Ok(body)
    }

    async fn put<B: Serialize>(
        &self,
        session: &SessionToken,
        path: &str,
        api_version: &str,
        body: &B,
    ) -> Result<String> {
        let request = self
            .request(Method::PUT, path, api_version, session)
            .json(body);
        self.send(request).await
    }

    /// Create or update a resource group
    pub async fn put_resource_group(
        &self,
        session: &SessionToken,
        group: &str,
        location: &str,
    ) -> Result<ResourceGroup> {
        tracing::info!("Creating resource group {} in {}", group, location);

        let body = self
            .put(
                session,
                &self.group_path(group),
                RESOURCES_API_VERSION,
                &ResourceGroupRequest { location },
            )
            .await?;

        let response: ResourceGroupResponse = serde_json::from_str(&body)?;
        Ok(response.into())
    }

    /// Create or update an App Service plan
    pub async fn put_server_farm(
        &self,
        session: &SessionToken,
        group: &str,
        plan: &str,
        location: &str,
        sku: &Sku,
    ) -> Result<HostingPlan> {
        tracing::info!("Creating server farm {} ({}) in {}", plan, sku, group);

        let path = self.web_path(group, "serverfarms", plan);
        let body = self
            .put(
                session,
                &path,
                WEB_API_VERSION,
                &ServerFarmRequest { location, sku },
            )
            .await?;

        // 202 Accepted carries no body; the resource ID is deterministic
        if body.trim().is_empty() {
            return Ok(HostingPlan {
                id: path,
                name: plan.to_string(),
                location: location.to_string(),
                sku: Some(sku.clone()),
            });
        }

        let response: ServerFarmResponse = serde_json::from_str(&body)?;
        Ok(response.into())
    }

    /// Create or update a web app on the given plan
    pub async fn put_site(
        &self,
        session: &SessionToken,
        group: &str,
        site: &str,
        location: &str,
        plan_id: &str,
    ) -> Result<Site> {
        tracing::info!("Creating site {} in {}", site, group);

        let body = self
            .put(
                session,
                &self.web_path(group, "sites", site),
                WEB_API_VERSION,
                &SiteRequest {
                    location,
                    properties: SiteRequestProperties {
                        server_farm_id: plan_id,
                    },
                },
            )
            .await?;

        if body.trim().is_empty() {
            return Ok(Site {
                name: site.to_string(),
                location: Some(location.to_string()),
                plan_id: Some(plan_id.to_string()),
                hostnames: Vec::new(),
            });
        }

        let response: SiteResponse = serde_json::from_str(&body)?;
        Ok(response.into())
    }

    /// Get a web app by name
    pub async fn fetch_site(&self, session: &SessionToken, group: &str, site: &str) -> Result<Site> {
        let request = self.request(
            Method::GET,
            &self.web_path(group, "sites", site),
            WEB_API_VERSION,
            session,
        );
        let body = self.send(request).await?;

        let response: SiteResponse = serde_json::from_str(&body)?;
        Ok(response.into())
    }

    /// Delete a web app
    pub async fn remove_site(&self, session: &SessionToken, group: &str, site: &str) -> Result<()> {
        tracing::info!("Deleting site {} in {}", site, group);

        let request = self.request(
            Method::DELETE,
            &self.web_path(group, "sites", site),
            WEB_API_VERSION,
            session,
        );
        self.send(request).await?;
        Ok(())
    }

    /// Delete a resource group
    ///
    /// ARM answers 202 and finishes the deletion asynchronously; this does not
    /// poll for completion.
    pub async fn remove_resource_group(&self, session: &SessionToken, group: &str) -> Result<()> {
        tracing::info!("Deleting resource group {}", group);

        let request = self.request(
            Method::DELETE,
            &self.group_path(group),
            RESOURCES_API_VERSION,
            session,
        );
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl ManagementClient for AzureManagementClient {
    fn name(&self) -> &str {
        "azure"
    }

    async fn create_or_update_resource_group(
        &self,
        session: &SessionToken,
        name: &str,
        location: &str,
    ) -> appsvc_cloud::Result<ResourceGroup> {
        Ok(self.put_resource_group(session, name, location).await?)
    }

    async fn create_or_update_hosting_plan(
        &self,
        session: &SessionToken,
        group: &str,
        plan: &str,
        location: &str,
        sku: &Sku,
    ) -> appsvc_cloud::Result<HostingPlan> {
        Ok(self
            .put_server_farm(session, group, plan, location, sku)
            .await?)
    }

    async fn create_or_update_site(
        &self,
        session: &SessionToken,
        group: &str,
        site: &str,
        location: &str,
        plan_id: &str,
    ) -> appsvc_cloud::Result<Site> {
        Ok(self
            .put_site(session, group, site, location, plan_id)
            .await?)
    }

    async fn get_site(
        &self,
        session: &SessionToken,
        group: &str,
        site: &str,
    ) -> appsvc_cloud::Result<Site> {
        Ok(self.fetch_site(session, group, site).await?)
    }

    async fn delete_site(
        &self,
        session: &SessionToken,
        group: &str,
        site: &str,
    ) -> appsvc_cloud::Result<()> {
        Ok(self.remove_site(session, group, site).await?)
    }

    async fn delete_resource_group(
        &self,
        session: &SessionToken,
        group: &str,
    ) -> appsvc_cloud::Result<()> {
        Ok(self.remove_resource_group(session, group).await?)
    }
}
