//! Service-principal OAuth client-credentials exchange.
//!
//! One grant type, one endpoint. The exchanged token is request-scoped like
//! every other token in the system; nothing here caches or refreshes.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use showroom_core::defaults::OAUTH_TIMEOUT_SECS;
use showroom_core::{Error, Result};

use crate::config::WarehouseConfig;
use crate::token::{AccessToken, TokenSource};

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client for exchanging service-principal credentials for a bearer token.
pub struct ServicePrincipal {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
}

impl ServicePrincipal {
    /// Build from configuration. `None` when the deployment has no
    /// service-principal credentials, which disables this strategy.
    pub fn from_config(config: &WarehouseConfig) -> Option<Self> {
        let client_id = config.client_id.clone()?;
        let client_secret = config.client_secret.clone()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(OAUTH_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Some(Self {
            client,
            token_url: config.token_url(),
            client_id,
            client_secret,
            scope: config.oauth_scope.clone(),
        })
    }

    /// Run the client-credentials grant and return the resulting token,
    /// unverified. Verification is the resolver's job.
    #[instrument(skip(self), fields(subsystem = "auth", component = "oauth", op = "exchange"))]
    pub async fn exchange(&self) -> Result<AccessToken> {
        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Unauthorized(format!(
                "Token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse token response: {}", e)))?;

        let token = AccessToken::new(token.access_token, TokenSource::ServicePrincipal);
        debug!(
            token_fingerprint = %token.fingerprint(),
            "Service principal exchange succeeded"
        );
        Ok(token)
    }
}
