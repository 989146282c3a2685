//! App Service demo: cloud management abstraction
//!
//! This crate defines the narrow interface the provisioning workflow talks to,
//! so the workflow never depends on a concrete cloud SDK.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  appsvc-demo                     │
//! │            (provision → pause → teardown)        │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 appsvc-cloud                     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  trait Authenticator    { authenticate }  │   │
//! │  │  trait ManagementClient { group/plan/site}│   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │   Ledger     │  │  test-utils  │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼──────────────┐
//! │  appsvc-cloud-azure  │
//! │  (ARM REST + OAuth2) │
//! └──────────────────────┘
//! ```

pub mod client;
pub mod error;
pub mod ledger;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-exports
pub use client::{
    Authenticator, HostingPlan, ManagementClient, Operation, ResourceGroup, SessionToken, Site,
    Sku,
};
pub use error::{CloudError, Result};
pub use ledger::{ResourceKind, ResourceLedger, ResourceRef};
