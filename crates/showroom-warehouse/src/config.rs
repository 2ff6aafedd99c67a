//! Warehouse connection configuration.
//!
//! All settings come from environment variables at the edge; nothing here
//! reads configuration files. Credentials are optional because each of the
//! three resolution strategies is optional on its own; `validate()` only
//! insists on what every deployment needs.

use showroom_core::defaults::{DEFAULT_RECORDS_TABLE, OAUTH_SCOPE, STATEMENT_TIMEOUT_SECS};
use showroom_core::{Error, Result};

/// Environment variable names.
pub const ENV_HOST: &str = "SHOWROOM_WAREHOUSE_HOST";
pub const ENV_WAREHOUSE_ID: &str = "SHOWROOM_WAREHOUSE_ID";
pub const ENV_STATIC_TOKEN: &str = "SHOWROOM_STATIC_TOKEN";
pub const ENV_CLIENT_ID: &str = "SHOWROOM_OAUTH_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SHOWROOM_OAUTH_CLIENT_SECRET";
pub const ENV_OAUTH_SCOPE: &str = "SHOWROOM_OAUTH_SCOPE";
pub const ENV_RECORDS_TABLE: &str = "SHOWROOM_RECORDS_TABLE";
pub const ENV_ASSISTANT_ENDPOINT: &str = "SHOWROOM_ASSISTANT_ENDPOINT";
pub const ENV_TIMEOUT_SECS: &str = "SHOWROOM_STATEMENT_TIMEOUT_SECS";

/// Configuration for the warehouse statement API and its credential paths.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// Warehouse hostname, with or without an explicit scheme.
    pub host: String,
    /// SQL warehouse to route statements to.
    pub warehouse_id: String,
    /// Fallback token for local/offline operation. Used unverified.
    pub static_token: Option<String>,
    /// Service-principal credentials for the OAuth exchange.
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Scope requested in the client-credentials exchange.
    pub oauth_scope: String,
    /// Fully qualified table holding catalog records.
    pub records_table: String,
    /// Chat/completion serving endpoint, if deployed.
    pub assistant_endpoint: Option<String>,
    /// Client timeout for statement calls, in seconds.
    pub timeout_seconds: u64,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            warehouse_id: String::new(),
            static_token: None,
            client_id: None,
            client_secret: None,
            oauth_scope: OAUTH_SCOPE.to_string(),
            records_table: DEFAULT_RECORDS_TABLE.to_string(),
            assistant_endpoint: None,
            timeout_seconds: STATEMENT_TIMEOUT_SECS,
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl WarehouseConfig {
    /// Create from environment variables, falling back to defaults for
    /// everything optional.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_opt(ENV_HOST).unwrap_or(defaults.host),
            warehouse_id: env_opt(ENV_WAREHOUSE_ID).unwrap_or(defaults.warehouse_id),
            static_token: env_opt(ENV_STATIC_TOKEN),
            client_id: env_opt(ENV_CLIENT_ID),
            client_secret: env_opt(ENV_CLIENT_SECRET),
            oauth_scope: env_opt(ENV_OAUTH_SCOPE).unwrap_or(defaults.oauth_scope),
            records_table: env_opt(ENV_RECORDS_TABLE).unwrap_or(defaults.records_table),
            assistant_endpoint: env_opt(ENV_ASSISTANT_ENDPOINT),
            timeout_seconds: env_opt(ENV_TIMEOUT_SECS)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_seconds),
        }
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config(format!("{} is required", ENV_HOST)));
        }
        if self.warehouse_id.trim().is_empty() {
            return Err(Error::Config(format!("{} is required", ENV_WAREHOUSE_ID)));
        }
        if self.client_id.is_some() != self.client_secret.is_some() {
            return Err(Error::Config(
                "OAuth client id and secret must be configured together".to_string(),
            ));
        }
        if self.records_table.trim().is_empty()
            || !self
                .records_table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            return Err(Error::Config(format!(
                "records table is not a valid identifier: {}",
                self.records_table
            )));
        }
        Ok(())
    }

    /// Base URL with scheme. Hosts given without a scheme get `https://`;
    /// an explicit scheme (e.g. local test servers) is kept as-is.
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }

    /// Statement execution endpoint.
    pub fn statements_url(&self) -> String {
        format!("{}/api/2.0/sql/statements", self.base_url())
    }

    /// OAuth token endpoint.
    pub fn token_url(&self) -> String {
        format!("{}/oidc/v1/token", self.base_url())
    }

    /// True when both service-principal credentials are present.
    pub fn has_service_principal(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}
