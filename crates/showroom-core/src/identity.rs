//! Per-request caller identity.
//!
//! The warehouse has no session concept, so every inbound request resolves
//! its own identity from forwarded proxy headers. Absence of any forwarded
//! identity degrades to the anonymous system identity rather than failing.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use uuid::Uuid;

/// Identity reported when no forwarded email header is present.
pub const ANONYMOUS_EMAIL: &str = "unknown@showroom.internal";

/// Proxy headers carrying the caller's email, in lookup order.
pub const IDENTITY_HEADERS: &[&str] = &[
    "x-forwarded-email",
    "x-forwarded-user",
    "x-forwarded-preferred-username",
];

/// Proxy header carrying the caller's access token.
pub const FORWARDED_TOKEN_HEADER: &str = "x-forwarded-access-token";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    // Shape check only. Deliverability is not our problem.
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap()
});

/// True when `s` looks like an email address.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Identity and credentials attached to one inbound request.
///
/// Built once at the edge from forwarded headers and threaded through every
/// call for that request. Never cached across requests.
#[derive(Clone)]
pub struct RequestContext {
    /// Correlation id for log lines belonging to this request.
    pub request_id: Uuid,
    /// Email resolved from the identity headers, if any carried one.
    pub forwarded_email: Option<String>,
    /// Bearer token forwarded by the auth proxy, if present.
    pub forwarded_token: Option<String>,
}

impl RequestContext {
    pub fn new(forwarded_email: Option<String>, forwarded_token: Option<String>) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            forwarded_email: forwarded_email.filter(|e| !e.trim().is_empty()),
            forwarded_token: forwarded_token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// A context with no forwarded identity at all.
    pub fn anonymous() -> Self {
        Self::new(None, None)
    }

    /// Resolve identity from forwarded proxy headers.
    ///
    /// Email lookup walks [`IDENTITY_HEADERS`] in priority order, so
    /// `x-forwarded-email` wins no matter where the proxy placed it. The
    /// token comes from the forwarded-token header, with an
    /// `authorization: Bearer <token>` value as the fallback source.
    pub fn from_headers<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut values: HashMap<String, &'a str> = HashMap::new();
        for (name, value) in headers {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            // First occurrence wins for a repeated header name.
            values.entry(name.to_ascii_lowercase()).or_insert(value);
        }

        let email = IDENTITY_HEADERS
            .iter()
            .find_map(|header| values.get(*header))
            .map(|v| v.to_string());
        let token = values
            .get(FORWARDED_TOKEN_HEADER)
            .map(|v| v.to_string())
            .or_else(|| {
                values
                    .get("authorization")
                    .and_then(|v| v.strip_prefix("Bearer "))
                    .map(|bearer| bearer.trim().to_string())
            });
        Self::new(email, token)
    }

    /// The caller's email, or the anonymous identity when none was forwarded.
    pub fn caller_email(&self) -> &str {
        self.forwarded_email.as_deref().unwrap_or(ANONYMOUS_EMAIL)
    }

    pub fn is_anonymous(&self) -> bool {
        self.forwarded_email.is_none()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

// Manual impl so a forwarded secret never leaks through Debug formatting.
impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("forwarded_email", &self.forwarded_email)
            .field(
                "forwarded_token",
                &self.forwarded_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
