//! Service principal authentication
//!
//! OAuth2 client-credentials grant against the Microsoft identity platform
//! (`{authority}/{tenant}/oauth2/v2.0/token`).

use crate::error::{AzureError, Result};
use crate::models::{TokenErrorResponse, TokenResponse};
use appsvc_cloud::{Authenticator, SessionToken};
use async_trait::async_trait;
use chrono::{Duration, Utc};

/// Client ID + secret credential for a service principal
pub struct ClientSecretCredential {
    client: reqwest::Client,
    authority_host: String,
    tenant_id: String,
    client_id: String,
    secret: String,
    scope: String,
}

impl ClientSecretCredential {
    pub fn new(
        authority_host: impl Into<String>,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        secret: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            authority_host: authority_host.into().trim_end_matches('/').to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            secret: secret.into(),
            scope: scope.into(),
        }
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host, self.tenant_id
        )
    }

    /// Request a token for the configured scope
    pub async fn request_token(&self) -> Result<SessionToken> {
        let url = self.token_url();
        tracing::debug!("Requesting token from {}", url);

        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.secret.as_str()),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(e) => (e.error, e.error_description),
                Err(_) => ("unknown".to_string(), body),
            };
            return Err(AzureError::Token {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        let expires_at = token
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));

        tracing::info!("Authenticated as client {}", self.client_id);
        Ok(SessionToken::new(token.access_token, expires_at))
    }
}

#[async_trait]
impl Authenticator for ClientSecretCredential {
    fn name(&self) -> &str {
        "client-secret"
    }

    async fn authenticate(&self) -> appsvc_cloud::Result<SessionToken> {
        Ok(self.request_token().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_url() {
        let credential = ClientSecretCredential::new(
            "https://login.microsoftonline.com/",
            "t1",
            "c1",
            "s1",
            "https://management.azure.com/.default",
        );
        assert_eq!(
            credential.token_url(),
            "https://login.microsoftonline.com/t1/oauth2/v2.0/token"
        );
    }
}
