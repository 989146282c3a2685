pub mod error;

pub use error::*;

use appsvc_cloud::Sku;

pub const TENANT_ID_VAR: &str = "AZURE_TENANT_ID";
pub const CLIENT_ID_VAR: &str = "AZURE_CLIENT_ID";
pub const SECRET_VAR: &str = "AZURE_SECRET";
pub const SUBSCRIPTION_ID_VAR: &str = "AZURE_SUBSCRIPTION_ID";

pub const AUTHORITY_HOST_VAR: &str = "AZURE_AUTHORITY_HOST";
pub const RESOURCE_MANAGER_VAR: &str = "AZURE_RESOURCE_MANAGER_URL";

pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub const DEFAULT_RESOURCE_MANAGER: &str = "https://management.azure.com";

/// Service principal credentials and the subscription to provision into
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub tenant_id: String,
    pub client_id: String,
    pub secret: String,
    pub subscription_id: String,
}

impl Credentials {
    /// 環境変数から読み込む
    ///
    /// All four of `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`, `AZURE_SECRET` and
    /// `AZURE_SUBSCRIPTION_ID` must be set and non-empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through an arbitrary variable lookup
    ///
    /// Empty values count as missing; any other value, whitespace included, is
    /// taken as is. The error lists every missing variable, not just the first.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut read = |name: &'static str| match lookup(name) {
            Some(value) if !value.is_empty() => value,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let tenant_id = read(TENANT_ID_VAR);
        let client_id = read(CLIENT_ID_VAR);
        let secret = read(SECRET_VAR);
        let subscription_id = read(SUBSCRIPTION_ID_VAR);

        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials(missing));
        }

        Ok(Self {
            tenant_id,
            client_id,
            secret,
            subscription_id,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("secret", &"<redacted>")
            .field("subscription_id", &self.subscription_id)
            .finish()
    }
}

/// Identity and management API base URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub authority_host: String,
    pub resource_manager: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            resource_manager: DEFAULT_RESOURCE_MANAGER.to_string(),
        }
    }
}

impl Endpoints {
    /// Public cloud endpoints, overridable via `AZURE_AUTHORITY_HOST` and
    /// `AZURE_RESOURCE_MANAGER_URL`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |var: &'static str, default: &str| -> Result<String> {
            match lookup(var) {
                Some(value) if !value.trim().is_empty() => {
                    let value = value.trim();
                    if !(value.starts_with("https://") || value.starts_with("http://")) {
                        return Err(ConfigError::InvalidEndpoint {
                            var,
                            value: value.to_string(),
                        });
                    }
                    tracing::debug!("{} overridden: {}", var, value);
                    Ok(value.trim_end_matches('/').to_string())
                }
                _ => Ok(default.to_string()),
            }
        };

        Ok(Self {
            authority_host: resolve(AUTHORITY_HOST_VAR, DEFAULT_AUTHORITY_HOST)?,
            resource_manager: resolve(RESOURCE_MANAGER_VAR, DEFAULT_RESOURCE_MANAGER)?,
        })
    }

    /// OAuth2 scope for the management API
    pub fn management_scope(&self) -> String {
        format!("{}/.default", self.resource_manager)
    }
}

/// Names, region and SKU of the sample resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSettings {
    pub resource_group: String,
    pub location: String,
    pub hosting_plan: String,
    pub sku: Sku,

    /// Prefix the random numeric suffix is appended to
    pub site_prefix: String,

    pub portal_url: String,
}

impl Default for SampleSettings {
    fn default() -> Self {
        Self {
            resource_group: "sample-dotnet-app-service-group".to_string(),
            location: "westus".to_string(),
            hosting_plan: "sample-server-farm".to_string(),
            sku: Sku::new("S1", "Standard", 1),
            site_prefix: "sample-site-name-".to_string(),
            portal_url: "https://portal.azure.com".to_string(),
        }
    }
}
