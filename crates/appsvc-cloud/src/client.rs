//! Management client and authenticator traits

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Produces a session credential usable by every [`ManagementClient`] call.
///
/// The Azure client-secret flow is one implementation; other backends
/// (managed identity, CLI login, a test double) plug in here without the
/// workflow changing.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns the authenticator name (e.g., "client-secret")
    fn name(&self) -> &str;

    /// Exchange the configured credentials for a session token
    async fn authenticate(&self) -> Result<SessionToken>;
}

/// Resource-group, hosting-plan and site operations of a cloud management API
///
/// Every call is a single request/response round trip. Implementations do not
/// retry.
#[async_trait]
pub trait ManagementClient: Send + Sync {
    /// Returns the provider name (e.g., "azure")
    fn name(&self) -> &str;

    /// Create the resource group, or update it if it already exists
    async fn create_or_update_resource_group(
        &self,
        session: &SessionToken,
        name: &str,
        location: &str,
    ) -> Result<ResourceGroup>;

    /// Create or update a hosting plan inside an existing resource group
    async fn create_or_update_hosting_plan(
        &self,
        session: &SessionToken,
        group: &str,
        plan: &str,
        location: &str,
        sku: &Sku,
    ) -> Result<HostingPlan>;

    /// Create or update a site bound to the hosting plan `plan_id`
    async fn create_or_update_site(
        &self,
        session: &SessionToken,
        group: &str,
        site: &str,
        location: &str,
        plan_id: &str,
    ) -> Result<Site>;

    /// Read a site back by name
    async fn get_site(&self, session: &SessionToken, group: &str, site: &str) -> Result<Site>;

    /// Delete a site by name
    async fn delete_site(&self, session: &SessionToken, group: &str, site: &str) -> Result<()>;

    /// Delete a resource group and everything inside it
    async fn delete_resource_group(&self, session: &SessionToken, group: &str) -> Result<()>;
}

/// One remote operation of the provisioning workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Authenticate,
    CreateResourceGroup,
    CreateHostingPlan,
    CreateSite,
    GetSite,
    DeleteSite,
    DeleteResourceGroup,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Authenticate => write!(f, "authenticate"),
            Operation::CreateResourceGroup => write!(f, "create-resource-group"),
            Operation::CreateHostingPlan => write!(f, "create-hosting-plan"),
            Operation::CreateSite => write!(f, "create-site"),
            Operation::GetSite => write!(f, "get-site"),
            Operation::DeleteSite => write!(f, "delete-site"),
            Operation::DeleteResourceGroup => write!(f, "delete-resource-group"),
        }
    }
}

/// Tokens this close to expiry are replaced before use
pub const REFRESH_MARGIN_SECS: i64 = 300;

/// Bearer session credential
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    access_token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl SessionToken {
    pub fn new(access_token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// Raw token for the `Authorization: Bearer` header
    pub fn bearer(&self) -> &str {
        &self.access_token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the token has passed its expiry. Tokens without one never expire.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }

    /// Whether the token expires within [`REFRESH_MARGIN_SECS`]
    pub fn needs_refresh(&self) -> bool {
        self.expires_at
            .is_some_and(|at| at - Duration::seconds(REFRESH_MARGIN_SECS) <= Utc::now())
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Pricing tier and capacity of a hosting plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sku {
    /// SKU name (e.g., "S1")
    pub name: String,

    /// Tier (e.g., "Standard")
    pub tier: String,

    /// Number of instances
    #[serde(default)]
    pub capacity: u32,
}

impl Sku {
    pub fn new(name: impl Into<String>, tier: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            tier: tier.into(),
            capacity,
        }
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} x{})", self.name, self.tier, self.capacity)
    }
}

/// Resource group as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroup {
    pub name: String,
    pub location: String,
}

/// Hosting plan as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostingPlan {
    /// Provider-assigned resource ID, referenced by sites
    pub id: String,
    pub name: String,
    pub location: String,
    pub sku: Option<Sku>,
}

/// Site as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub name: String,
    pub location: Option<String>,

    /// ID of the hosting plan the site runs on
    pub plan_id: Option<String>,

    /// Public hostnames, in provider order
    pub hostnames: Vec<String>,
}

impl Site {
    /// First public hostname, if the provider reported any
    pub fn primary_hostname(&self) -> Option<&str> {
        self.hostnames
            .iter()
            .map(String::as_str)
            .find(|h| !h.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_debug_redacts() {
        let token = SessionToken::new("super-secret", None);
        let debug = format!("{:?}", token);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
        assert_eq!(token.bearer(), "super-secret");
    }

    #[test]
    fn test_session_token_expiry() {
        let past = SessionToken::new("t", Some(Utc::now() - Duration::minutes(5)));
        let future = SessionToken::new("t", Some(Utc::now() + Duration::minutes(5)));
        let never = SessionToken::new("t", None);

        assert!(past.is_expired());
        assert!(!future.is_expired());
        assert!(!never.is_expired());
    }

    #[test]
    fn test_session_token_needs_refresh_near_expiry() {
        let soon = SessionToken::new("t", Some(Utc::now() + Duration::seconds(60)));
        let later = SessionToken::new("t", Some(Utc::now() + Duration::hours(1)));
        let now = SessionToken::new("t", Some(Utc::now()));

        assert!(soon.needs_refresh());
        assert!(!soon.is_expired());
        assert!(!later.needs_refresh());
        assert!(now.needs_refresh());
        assert!(!SessionToken::new("t", None).needs_refresh());
    }

    #[test]
    fn test_primary_hostname() {
        let mut site = Site {
            name: "sample-site-name-42".to_string(),
            location: None,
            plan_id: None,
            hostnames: vec![],
        };
        assert_eq!(site.primary_hostname(), None);

        site.hostnames = vec![
            "".to_string(),
            "sample-site-name-42.azurewebsites.net".to_string(),
            "www.example.com".to_string(),
        ];
        assert_eq!(
            site.primary_hostname(),
            Some("sample-site-name-42.azurewebsites.net")
        );
    }

    #[test]
    fn test_sku_display() {
        assert_eq!(Sku::new("S1", "Standard", 1).to_string(), "S1 (Standard x1)");
    }
}
