//! Per-request credential resolution.
//!
//! The warehouse authenticates every statement independently, so each
//! inbound request resolves its own token. Three strategies are tried in
//! fixed priority order: the caller's forwarded token, a service-principal
//! exchange, then a static fallback. The first two must pass the permission
//! probe; the static fallback is used unverified so local and offline
//! deployments keep working without a live credential path.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use showroom_core::identity::RequestContext;
use showroom_core::{Error, Result};

use crate::config::WarehouseConfig;
use crate::executor::StatementExecutor;
use crate::oauth::ServicePrincipal;
use crate::probe::PermissionProbe;
use crate::token::{AccessToken, TokenSource};

/// One credential strategy in the priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CredentialStrategy {
    UserForwarded,
    ServicePrincipal,
    Static,
}

/// The fixed priority order. Resolution walks this list and returns the
/// first strategy that yields a usable token.
const STRATEGY_ORDER: &[CredentialStrategy] = &[
    CredentialStrategy::UserForwarded,
    CredentialStrategy::ServicePrincipal,
    CredentialStrategy::Static,
];

/// Resolves a usable bearer token for one inbound request.
pub struct CredentialResolver {
    probe: PermissionProbe,
    service_principal: Option<ServicePrincipal>,
    static_token: Option<String>,
}

impl CredentialResolver {
    pub fn new(executor: Arc<StatementExecutor>, config: &WarehouseConfig) -> Self {
        Self {
            probe: PermissionProbe::new(executor),
            service_principal: ServicePrincipal::from_config(config),
            static_token: config.static_token.clone(),
        }
    }

    /// Resolve a token for this request, or fail when every strategy is
    /// exhausted. Runs per request; results are never cached.
    #[instrument(skip(self, ctx), fields(subsystem = "auth", component = "resolver", op = "resolve", request_id = %ctx.request_id))]
    pub async fn resolve(&self, ctx: &RequestContext) -> Result<AccessToken> {
        for strategy in STRATEGY_ORDER {
            if let Some(token) = self.attempt(*strategy, ctx).await {
                info!(
                    token_source = %token.source(),
                    token_fingerprint = %token.fingerprint(),
                    verified = token.is_verified(),
                    "Credential resolved"
                );
                return Ok(token);
            }
        }
        Err(Error::Unauthorized(
            "no usable credential: forwarded token absent or unverified, \
             service principal unavailable, no static fallback configured"
                .to_string(),
        ))
    }

    /// Try one strategy. `None` means "move on to the next"; strategies
    /// never abort resolution, they only decline.
    async fn attempt(
        &self,
        strategy: CredentialStrategy,
        ctx: &RequestContext,
    ) -> Option<AccessToken> {
        match strategy {
            CredentialStrategy::UserForwarded => {
                let forwarded = ctx.forwarded_token.as_ref()?;
                let candidate = AccessToken::new(forwarded.clone(), TokenSource::UserForwarded);
                if self.probe.verify(&candidate).await {
                    Some(candidate.verified())
                } else {
                    warn!(
                        token_fingerprint = %candidate.fingerprint(),
                        "Forwarded token failed verification, trying next strategy"
                    );
                    None
                }
            }
            CredentialStrategy::ServicePrincipal => {
                let sp = self.service_principal.as_ref()?;
                match sp.exchange().await {
                    Ok(candidate) => {
                        if self.probe.verify(&candidate).await {
                            Some(candidate.verified())
                        } else {
                            warn!(
                                token_fingerprint = %candidate.fingerprint(),
                                "Service principal token failed verification, trying next strategy"
                            );
                            None
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Service principal exchange failed, trying next strategy");
                        None
                    }
                }
            }
            CredentialStrategy::Static => {
                let secret = self.static_token.as_ref()?;
                debug!("Using static fallback token unverified");
                Some(AccessToken::new(secret.clone(), TokenSource::Static))
            }
        }
    }
}
