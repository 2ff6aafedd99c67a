//! Centralized default constants for the showroom system.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates should reference these constants instead of defining
//! their own magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// PAGINATION
// =============================================================================

/// Fixed number of records per listing page.
pub const PAGE_SIZE: i64 = 10;

/// Column used when a requested sort column is not in the allow-list.
pub const DEFAULT_SORT_COLUMN: &str = "created_at";

// =============================================================================
// WAREHOUSE
// =============================================================================

/// Fully qualified table holding catalog records.
pub const DEFAULT_RECORDS_TABLE: &str = "main.showroom.demos";

/// Client timeout for statement execution calls, in seconds.
pub const STATEMENT_TIMEOUT_SECS: u64 = 60;

/// Statements slower than this get a warn-level log line.
pub const SLOW_STATEMENT_MS: u128 = 5_000;

// =============================================================================
// OAUTH
// =============================================================================

/// Scope requested in the client-credentials exchange.
pub const OAUTH_SCOPE: &str = "all-apis";

/// Client timeout for the token exchange, in seconds.
pub const OAUTH_TIMEOUT_SECS: u64 = 30;
