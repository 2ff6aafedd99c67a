//! Structured logging schema and field name constants for showroom.
//!
//! All crates use these constants for consistent structured logging fields.
//! This ensures log aggregation tools can query by standardized field names
//! across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Operation completions, credential resolution outcomes |
//! | DEBUG | Decision points, statement dispatch, probe results |
//! | TRACE | Per-row iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across one inbound request's calls.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "warehouse", "catalog", "auth"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "executor", "probe", "resolver", "store", "reconciler"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "execute", "resolve", "list", "insert", "authorize"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Catalog record identifier being operated on.
pub const RECORD_ID: &str = "record_id";

/// Warehouse table a statement targets.
pub const TABLE: &str = "table";

/// Requested listing page number.
pub const PAGE: &str = "page";

// ─── Credential fields ─────────────────────────────────────────────────────

/// Which strategy produced the token: "user_forwarded",
/// "service_principal", "static".
pub const TOKEN_SOURCE: &str = "token_source";

/// Short fingerprint of a token secret. Never the secret itself.
pub const TOKEN_FINGERPRINT: &str = "token_fingerprint";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned by a statement.
pub const ROW_COUNT: &str = "row_count";

/// Number of records returned by a listing.
pub const RESULT_COUNT: &str = "result_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Slow operation threshold exceeded.
pub const SLOW: &str = "slow";
