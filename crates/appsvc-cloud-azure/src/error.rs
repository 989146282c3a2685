//! Azure client error types

use appsvc_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AzureError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Azure API error ({status}) {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Token request failed ({status}) {code}: {message}")]
    Token {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl AzureError {
    /// HTTP status of the failed call, if it got as far as a response
    pub fn status(&self) -> Option<u16> {
        match self {
            AzureError::Api { status, .. } | AzureError::Token { status, .. } => Some(*status),
            AzureError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<AzureError> for CloudError {
    fn from(err: AzureError) -> Self {
        match err {
            AzureError::Token { .. } => CloudError::AuthenticationFailed(err.to_string()),
            AzureError::Api { status, .. } => match status {
                401 | 403 => CloudError::AuthenticationFailed(err.to_string()),
                404 => CloudError::ResourceNotFound(err.to_string()),
                409 => CloudError::Conflict(err.to_string()),
                _ => CloudError::ApiError(err.to_string()),
            },
            AzureError::Http(_) => CloudError::Transport(err.to_string()),
            AzureError::InvalidConfig(msg) => CloudError::InvalidConfig(msg),
            AzureError::JsonError(e) => CloudError::Json(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, AzureError>;
