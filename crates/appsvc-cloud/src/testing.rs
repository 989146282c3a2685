//! Recording test double for [`Authenticator`] and [`ManagementClient`]
//!
//! Every call is appended to a shared log before it is answered, so a test can
//! assert on the exact sequence of operations, including the one that failed.

use crate::client::{
    Authenticator, HostingPlan, ManagementClient, Operation, ResourceGroup, SessionToken, Site,
    Sku,
};
use crate::error::{CloudError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};

/// A call received by [`RecordingClient`], with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Authenticate,
    CreateResourceGroup {
        name: String,
        location: String,
    },
    CreateHostingPlan {
        group: String,
        plan: String,
        location: String,
        sku: Sku,
    },
    CreateSite {
        group: String,
        site: String,
        location: String,
        plan_id: String,
    },
    GetSite {
        group: String,
        site: String,
    },
    DeleteSite {
        group: String,
        site: String,
    },
    DeleteResourceGroup {
        group: String,
    },
}

impl Call {
    pub fn operation(&self) -> Operation {
        match self {
            Call::Authenticate => Operation::Authenticate,
            Call::CreateResourceGroup { .. } => Operation::CreateResourceGroup,
            Call::CreateHostingPlan { .. } => Operation::CreateHostingPlan,
            Call::CreateSite { .. } => Operation::CreateSite,
            Call::GetSite { .. } => Operation::GetSite,
            Call::DeleteSite { .. } => Operation::DeleteSite,
            Call::DeleteResourceGroup { .. } => Operation::DeleteResourceGroup,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<Call>,
    fail_on: Vec<Operation>,
    site: Option<Site>,
    expiring_tokens: bool,
}

/// Authenticator and management client double that succeeds unless told otherwise
///
/// Clones share one call log.
#[derive(Debug, Clone, Default)]
pub struct RecordingClient {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call to `operation` with [`CloudError::ApiError`]
    pub fn failing_on(self, operation: Operation) -> Self {
        self.lock().fail_on.push(operation);
        self
    }

    /// Answer `get_site` with this site instead of echoing the requested name
    pub fn with_site(self, name: impl Into<String>, hostnames: Vec<String>) -> Self {
        self.lock().site = Some(Site {
            name: name.into(),
            location: None,
            plan_id: None,
            hostnames,
        });
        self
    }

    /// Issue tokens that are already due for refresh
    pub fn issuing_expiring_tokens(self) -> Self {
        self.lock().expiring_tokens = true;
        self
    }

    /// Every call received so far
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Operations received so far, in order
    pub fn operations(&self) -> Vec<Operation> {
        self.lock().calls.iter().map(Call::operation).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("recording client lock poisoned")
    }

    fn record(&self, call: Call) -> Result<()> {
        let operation = call.operation();
        let mut inner = self.lock();
        inner.calls.push(call);
        if inner.fail_on.contains(&operation) {
            return Err(CloudError::ApiError(format!("injected failure: {}", operation)));
        }
        Ok(())
    }
}

#[async_trait]
impl Authenticator for RecordingClient {
    fn name(&self) -> &str {
        "recording"
    }

    async fn authenticate(&self) -> Result<SessionToken> {
        self.record(Call::Authenticate)?;
        let expires_at = self.lock().expiring_tokens.then(Utc::now);
        Ok(SessionToken::new("recording-token", expires_at))
    }
}

#[async_trait]
impl ManagementClient for RecordingClient {
    fn name(&self) -> &str {
        "recording"
    }

    async fn create_or_update_resource_group(
        &self,
        _session: &SessionToken,
        name: &str,
        location: &str,
    ) -> Result<ResourceGroup> {
        self.record(Call::CreateResourceGroup {
            name: name.to_string(),
            location: location.to_string(),
        })?;
        Ok(ResourceGroup {
            name: name.to_string(),
            location: location.to_string(),
        })
    }

    async fn create_or_update_hosting_plan(
        &self,
        _session: &SessionToken,
        group: &str,
        plan: &str,
        location: &str,
        sku: &Sku,
    ) -> Result<HostingPlan> {
        self.record(Call::CreateHostingPlan {
            group: group.to_string(),
            plan: plan.to_string(),
            location: location.to_string(),
            sku: sku.clone(),
        })?;
        Ok(HostingPlan {
            id: format!("/resourceGroups/{}/serverfarms/{}", group, plan),
            name: plan.to_string(),
            location: location.to_string(),
            sku: Some(sku.clone()),
        })
    }

    async fn create_or_update_site(
        &self,
        _session: &SessionToken,
        group: &str,
        site: &str,
        location: &str,
        plan_id: &str,
    ) -> Result<Site> {
        self.record(Call::CreateSite {
            group: group.to_string(),
            site: site.to_string(),
            location: location.to_string(),
            plan_id: plan_id.to_string(),
        })?;
        Ok(Site {
            name: site.to_string(),
            location: Some(location.to_string()),
            plan_id: Some(plan_id.to_string()),
            hostnames: Vec::new(),
        })
    }

    async fn get_site(&self, _session: &SessionToken, group: &str, site: &str) -> Result<Site> {
        self.record(Call::GetSite {
            group: group.to_string(),
            site: site.to_string(),
        })?;
        let canned = self.lock().site.clone();
        Ok(canned.unwrap_or_else(|| Site {
            name: site.to_string(),
            location: None,
            plan_id: None,
            hostnames: vec![format!("{}.azurewebsites.net", site)],
        }))
    }

    async fn delete_site(&self, _session: &SessionToken, group: &str, site: &str) -> Result<()> {
        self.record(Call::DeleteSite {
            group: group.to_string(),
            site: site.to_string(),
        })
    }

    async fn delete_resource_group(&self, _session: &SessionToken, group: &str) -> Result<()> {
        self.record(Call::DeleteResourceGroup {
            group: group.to_string(),
        })
    }
}
