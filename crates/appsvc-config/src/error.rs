use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "Please provide ENV vars for AZURE_TENANT_ID, AZURE_CLIENT_ID, AZURE_SECRET and AZURE_SUBSCRIPTION_ID. \
        Missing: {}",
        .0.join(", ")
    )]
    MissingCredentials(Vec<&'static str>),

    #[error("Invalid endpoint in {var}: {value} (expected an http:// or https:// URL)")]
    InvalidEndpoint { var: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
