//! Request-scoped access tokens.
//!
//! A token lives for exactly one inbound request. It is never persisted,
//! never cached across requests, and never appears verbatim in logs; log
//! lines carry a short fingerprint instead.

use sha2::{Digest, Sha256};

/// Which credential strategy produced a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// Forwarded by the auth proxy on behalf of the calling user.
    UserForwarded,
    /// Obtained via the service-principal client-credentials exchange.
    ServicePrincipal,
    /// Statically configured fallback, used unverified.
    Static,
}

impl TokenSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserForwarded => "user_forwarded",
            Self::ServicePrincipal => "service_principal",
            Self::Static => "static",
        }
    }
}

impl std::fmt::Display for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bearer token resolved for one request, tagged with its provenance.
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    source: TokenSource,
    verified: bool,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>, source: TokenSource) -> Self {
        Self {
            secret: secret.into(),
            source,
            verified: false,
        }
    }

    /// Mark the token as having passed the permission probe.
    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }

    /// The raw secret, for constructing the Authorization header.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn source(&self) -> TokenSource {
        self.source
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Short stable fingerprint of the secret, safe for log fields.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        let digest = hex::encode(hasher.finalize());
        digest[..12].to_string()
    }
}

// Manual impl so the secret never leaks through Debug formatting.
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("fingerprint", &self.fingerprint())
            .field("source", &self.source)
            .field("verified", &self.verified)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_source_as_str() {
        assert_eq!(TokenSource::UserForwarded.as_str(), "user_forwarded");
        assert_eq!(TokenSource::ServicePrincipal.as_str(), "service_principal");
        assert_eq!(TokenSource::Static.as_str(), "static");
    }

    #[test]
    fn test_new_token_is_unverified() {
        let token = AccessToken::new("secret", TokenSource::Static);
        assert!(!token.is_verified());
        assert_eq!(token.source(), TokenSource::Static);
        assert_eq!(token.secret(), "secret");
    }

    #[test]
    fn test_verified_flips_flag() {
        let token = AccessToken::new("secret", TokenSource::UserForwarded).verified();
        assert!(token.is_verified());
    }

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        let a = AccessToken::new("secret", TokenSource::Static);
        let b = AccessToken::new("secret", TokenSource::UserForwarded);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 12);
    }

    #[test]
    fn test_fingerprint_differs_per_secret() {
        let a = AccessToken::new("secret-a", TokenSource::Static);
        let b = AccessToken::new("secret-b", TokenSource::Static);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let token = AccessToken::new("super-secret-value", TokenSource::Static);
        let debug = format!("{:?}", token);
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("<redacted>"));
    }
}
