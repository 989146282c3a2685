//! Provisioning workflow
//!
//! Authenticate, create a resource group, a hosting plan and a site, print the
//! site's address, wait for the operator, then delete the site and the group.
//! Every step depends on the one before it and runs only after it returned.

use crate::naming;
use crate::pause::{Pause, PauseOutcome};
use appsvc_cloud::{
    Authenticator, CloudError, ManagementClient, Operation, ResourceKind, ResourceLedger,
    ResourceRef, SessionToken,
};
use appsvc_config::SampleSettings;
use rand::RngCore;
use std::io::{self, Write};
use thiserror::Error;

/// What happens to already-created resources when a step fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RollbackPolicy {
    /// Leave them in place and report them
    #[default]
    Leave,
    /// Delete the site, then the resource group; rollback failures are only logged
    BestEffort,
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("{operation} failed: {source}")]
    Remote {
        operation: Operation,
        source: CloudError,
        /// Resources still alive when the run stopped
        leftovers: Vec<ResourceRef>,
    },

    #[error("Operator wait failed: {source}")]
    Pause {
        source: io::Error,
        leftovers: Vec<ResourceRef>,
    },

    #[error("Failed to write output: {source}")]
    Output {
        source: io::Error,
        leftovers: Vec<ResourceRef>,
    },
}

impl WorkflowError {
    /// Remote operation that failed, if the failure was remote
    pub fn operation(&self) -> Option<Operation> {
        match self {
            WorkflowError::Remote { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    pub fn leftovers(&self) -> &[ResourceRef] {
        match self {
            WorkflowError::Remote { leftovers, .. }
            | WorkflowError::Pause { leftovers, .. }
            | WorkflowError::Output { leftovers, .. } => leftovers,
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Why a step stopped the run, before leftovers are attached
#[derive(Debug)]
enum Failure {
    Remote {
        operation: Operation,
        source: CloudError,
    },
    Pause(io::Error),
    Output(io::Error),
}

impl From<io::Error> for Failure {
    fn from(e: io::Error) -> Self {
        Failure::Output(e)
    }
}

impl Failure {
    fn operation(&self) -> Option<Operation> {
        match self {
            Failure::Remote { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    fn with_leftovers(self, leftovers: Vec<ResourceRef>) -> WorkflowError {
        match self {
            Failure::Remote { operation, source } => WorkflowError::Remote {
                operation,
                source,
                leftovers,
            },
            Failure::Pause(source) => WorkflowError::Pause { source, leftovers },
            Failure::Output(source) => WorkflowError::Output { source, leftovers },
        }
    }
}

fn remote(operation: Operation) -> impl FnOnce(CloudError) -> Failure {
    move |source| Failure::Remote { operation, source }
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub site_name: String,

    /// `http://<first hostname>`, if the site reported one
    pub url: Option<String>,

    pub pause: PauseOutcome,
}

/// One provisioning-and-teardown run against a management client
pub struct Workflow<'a> {
    authenticator: &'a dyn Authenticator,
    client: &'a dyn ManagementClient,
    settings: SampleSettings,
    rollback: RollbackPolicy,
}

impl<'a> Workflow<'a> {
    pub fn new(
        authenticator: &'a dyn Authenticator,
        client: &'a dyn ManagementClient,
        settings: SampleSettings,
    ) -> Self {
        Self {
            authenticator,
            client,
            settings,
            rollback: RollbackPolicy::default(),
        }
    }

    pub fn with_rollback(mut self, rollback: RollbackPolicy) -> Self {
        self.rollback = rollback;
        self
    }

    /// Run every step in order, writing one status line per step to `out`
    ///
    /// The first failing step stops the run. What was already created is
    /// handled according to the [`RollbackPolicy`] and listed in the error.
    /// A token close to expiry is replaced before teardown and before
    /// rollback, which costs one extra authentication.
    pub async fn run(
        &self,
        rng: &mut dyn RngCore,
        pause: &mut dyn Pause,
        out: &mut dyn Write,
    ) -> Result<Outcome> {
        let mut ledger = ResourceLedger::new();
        let mut session = None;

        let failure = match self
            .execute(rng, pause, out, &mut ledger, &mut session)
            .await
        {
            Ok(outcome) => return Ok(outcome),
            Err(failure) => failure,
        };

        if let (RollbackPolicy::BestEffort, Some(session)) = (self.rollback, session.as_mut()) {
            if ledger.is_empty() {
                tracing::debug!("Nothing to roll back");
            } else {
                match self.refresh(session).await {
                    Ok(()) => self.roll_back(session, failure.operation(), &mut ledger).await,
                    Err(_) => tracing::warn!("Could not re-authenticate, skipping rollback"),
                }
            }
        }
        self.report_leftovers(&ledger);
        Err(failure.with_leftovers(ledger.live().to_vec()))
    }

    async fn execute(
        &self,
        rng: &mut dyn RngCore,
        pause: &mut dyn Pause,
        out: &mut dyn Write,
        ledger: &mut ResourceLedger,
        session_slot: &mut Option<SessionToken>,
    ) -> std::result::Result<Outcome, Failure> {
        let s = &self.settings;

        writeln!(out, "Authenticating ({})", self.authenticator.name())?;
        let session = self
            .authenticator
            .authenticate()
            .await
            .map_err(remote(Operation::Authenticate))?;
        let session = session_slot.insert(session);

        writeln!(
            out,
            "Creating resource group {} in {}",
            s.resource_group, s.location
        )?;
        self.client
            .create_or_update_resource_group(session, &s.resource_group, &s.location)
            .await
            .map_err(remote(Operation::CreateResourceGroup))?;
        ledger.created(ResourceRef::new(
            ResourceKind::ResourceGroup,
            &s.resource_group,
        ));

        writeln!(
            out,
            "Creating Server Farm named {} in resource group {}",
            s.hosting_plan, s.resource_group
        )?;
        let plan = self
            .client
            .create_or_update_hosting_plan(
                session,
                &s.resource_group,
                &s.hosting_plan,
                &s.location,
                &s.sku,
            )
            .await
            .map_err(remote(Operation::CreateHostingPlan))?;
        ledger.created(ResourceRef::new(ResourceKind::HostingPlan, &plan.name));

        let site_name = naming::site_name(&s.site_prefix, rng);
        writeln!(
            out,
            "Creating Site named {} in server farm {}",
            site_name, plan.name
        )?;
        self.client
            .create_or_update_site(session, &s.resource_group, &site_name, &s.location, &plan.id)
            .await
            .map_err(remote(Operation::CreateSite))?;
        ledger.created(ResourceRef::new(ResourceKind::Site, &site_name));

        writeln!(out, "Getting a site by name")?;
        let site = self
            .client
            .get_site(session, &s.resource_group, &site_name)
            .await
            .map_err(remote(Operation::GetSite))?;
        writeln!(out, "Found site named {}", site.name)?;

        let url = site.primary_hostname().map(|host| format!("http://{}", host));
        match &url {
            Some(url) => writeln!(out, "You can visit your newly created site at {}", url)?,
            None => writeln!(out, "Site {} has no public hostname yet", site.name)?,
        }
        writeln!(out, "You can also find it in the Azure Portal via {}", s.portal_url)?;

        if let Some(prompt) = pause.prompt() {
            writeln!(out, "{}", prompt)?;
        }
        out.flush()?;
        let paused = pause.wait().await.map_err(Failure::Pause)?;
        if paused == PauseOutcome::Cancelled {
            writeln!(out, "Wait cancelled, deleting the sample resources")?;
        }

        // The pause has no time limit
        self.refresh(session).await?;

        writeln!(out, "Deleting the Site named {}", site_name)?;
        self.client
            .delete_site(session, &s.resource_group, &site_name)
            .await
            .map_err(remote(Operation::DeleteSite))?;
        ledger.deleted(ResourceKind::Site, &site_name);

        writeln!(out, "Deleting resource group {}", s.resource_group)?;
        self.client
            .delete_resource_group(session, &s.resource_group)
            .await
            .map_err(remote(Operation::DeleteResourceGroup))?;
        ledger.deleted(ResourceKind::ResourceGroup, &s.resource_group);

        Ok(Outcome {
            site_name,
            url,
            pause: paused,
        })
    }

    /// Re-authenticate when the held token is about to expire
    async fn refresh(&self, session: &mut SessionToken) -> std::result::Result<(), Failure> {
        if session.needs_refresh() {
            tracing::info!(
                "Session token expires at {:?}, re-authenticating",
                session.expires_at()
            );
            *session = self
                .authenticator
                .authenticate()
                .await
                .map_err(remote(Operation::Authenticate))?;
        }
        Ok(())
    }

    /// Delete what the ledger still holds. The resource whose deletion just
    /// failed is not tried again.
    async fn roll_back(
        &self,
        session: &SessionToken,
        failed: Option<Operation>,
        ledger: &mut ResourceLedger,
    ) {
        let group = &self.settings.resource_group;

        if failed != Some(Operation::DeleteSite) {
            let sites: Vec<String> = ledger
                .by_kind(ResourceKind::Site)
                .into_iter()
                .map(|r| r.name.clone())
                .collect();
            for site in sites {
                tracing::warn!("Rolling back site {}", site);
                match self.client.delete_site(session, group, &site).await {
                    Ok(()) => ledger.deleted(ResourceKind::Site, &site),
                    Err(e) => tracing::warn!("Rollback of site {} failed: {}", site, e),
                }
            }
        }

        if failed != Some(Operation::DeleteResourceGroup)
            && ledger.contains(ResourceKind::ResourceGroup, group)
        {
            tracing::warn!("Rolling back resource group {}", group);
            match self.client.delete_resource_group(session, group).await {
                Ok(()) => ledger.deleted(ResourceKind::ResourceGroup, group),
                Err(e) => tracing::warn!("Rollback of resource group {} failed: {}", group, e),
            }
        }
    }

    fn report_leftovers(&self, ledger: &ResourceLedger) {
        if !ledger.is_empty() {
            tracing::warn!("Run stopped early; still provisioned: {}", ledger);
        }
    }
}
