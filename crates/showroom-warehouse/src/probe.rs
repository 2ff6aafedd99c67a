//! Token permission probe.
//!
//! Possession of a bearer token says nothing about whether the warehouse
//! will accept it. The probe runs the cheapest possible read and maps every
//! failure, transport or backend alike, to "not permitted". Fail closed.

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::executor::{Statement, StatementExecutor};
use crate::token::AccessToken;

/// Statement used to test a candidate token.
pub const PROBE_STATEMENT: &str = "SELECT 1 AS probe";

/// Verifies that a candidate token actually carries usable permissions.
pub struct PermissionProbe {
    executor: Arc<StatementExecutor>,
}

impl PermissionProbe {
    pub fn new(executor: Arc<StatementExecutor>) -> Self {
        Self { executor }
    }

    /// True only when the probe statement succeeds and returns a
    /// well-formed, non-empty result. Errors are logged and swallowed;
    /// the caller only learns "not permitted".
    #[instrument(skip(self, token), fields(subsystem = "auth", component = "probe", op = "verify", token_source = %token.source()))]
    pub async fn verify(&self, token: &AccessToken) -> bool {
        match self.executor.execute(token, &Statement::new(PROBE_STATEMENT)).await {
            Ok(rows) if !rows.is_empty() => {
                debug!(
                    token_fingerprint = %token.fingerprint(),
                    "Probe succeeded"
                );
                true
            }
            Ok(_) => {
                debug!(
                    token_fingerprint = %token.fingerprint(),
                    "Probe returned no rows, treating token as unusable"
                );
                false
            }
            Err(e) => {
                debug!(
                    token_fingerprint = %token.fingerprint(),
                    error = %e,
                    "Probe failed, treating token as unusable"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_statement_is_trivial_read() {
        assert!(PROBE_STATEMENT.starts_with("SELECT"));
        assert!(!PROBE_STATEMENT.contains("FROM"));
    }
}
