//! Azure provider for the App Service demo
//!
//! This crate implements the `Authenticator` and `ManagementClient` traits
//! against Azure: the Microsoft identity platform for tokens and the Azure
//! Resource Manager REST API for resources.
//!
//! # Requirements
//!
//! - A service principal: `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`, `AZURE_SECRET`
//! - The subscription to provision into: `AZURE_SUBSCRIPTION_ID`
//!
//! # Example
//!
//! ```ignore
//! use appsvc_cloud::{Authenticator, ManagementClient, Sku};
//! use appsvc_cloud_azure::{AzureManagementClient, ClientSecretCredential};
//!
//! let credential = ClientSecretCredential::new(
//!     "https://login.microsoftonline.com",
//!     tenant_id,
//!     client_id,
//!     secret,
//!     "https://management.azure.com/.default",
//! );
//! let session = credential.authenticate().await?;
//!
//! let client = AzureManagementClient::new("https://management.azure.com", subscription_id)?;
//! client.create_or_update_resource_group(&session, "my-group", "westus").await?;
//! ```

pub mod arm;
pub mod credential;
pub mod error;
mod models;

pub use arm::{AzureManagementClient, RESOURCES_API_VERSION, WEB_API_VERSION};
pub use credential::ClientSecretCredential;
pub use error::{AzureError, Result};
