//! Core data models for showroom.
//!
//! These types are shared across all showroom crates and represent
//! the catalog domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_SORT_COLUMN, PAGE_SIZE};

// =============================================================================
// RECORD ENUMS
// =============================================================================

/// Publication status of a catalog record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Work in progress, not yet reviewed.
    #[default]
    Draft,
    /// Submitted and awaiting review.
    InReview,
    /// Live in the catalog.
    Published,
    /// Retired but kept for reference.
    Archived,
}

impl RecordStatus {
    /// Parse a warehouse cell value, degrading to [`RecordStatus::Draft`]
    /// when the stored string is unknown. Old rows predate the enum.
    pub fn from_wire(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::InReview => write!(f, "in_review"),
            Self::Published => write!(f, "published"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "in_review" => Ok(Self::InReview),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("Invalid record status: {}", s)),
        }
    }
}

/// Audience classification of a catalog record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidentiality {
    /// Safe to show outside the company.
    Public,
    /// Internal audiences only. The conservative default.
    #[default]
    Internal,
}

impl Confidentiality {
    /// Parse a warehouse cell value, degrading to
    /// [`Confidentiality::Internal`] when the stored string is unknown.
    pub fn from_wire(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for Confidentiality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

impl std::str::FromStr for Confidentiality {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "internal" => Ok(Self::Internal),
            _ => Err(format!("Invalid confidentiality: {}", s)),
        }
    }
}

// =============================================================================
// CATALOG RECORDS
// =============================================================================

/// Complete catalog record as stored in the warehouse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Warehouse-assigned identifier. Assigned once, immutable thereafter.
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub description_md: String,
    /// Authorization anchor: mutations are gated on this identity.
    pub owner_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_email: Option<String>,
    pub status: RecordStatus,
    pub demo_url: String,
    pub repo_url: String,
    pub products: Vec<String>,
    pub confidentiality: Confidentiality,
    pub remarks: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Composite rendered document embedding every other field. Regenerated
    /// on each mutation; only requested on internal detail reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_md: Option<String>,
}

/// Listing row for a catalog record. Excludes the long-form description and
/// the composite document, which only detail reads carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub owner_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_email: Option<String>,
    pub status: RecordStatus,
    pub demo_url: String,
    pub repo_url: String,
    pub products: Vec<String>,
    pub confidentiality: Confidentiality,
    pub remarks: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Outcome of a create operation.
///
/// The warehouse does not return generated keys, so identification happens
/// in a separate read after the insert. When that read yields nothing the
/// record still exists; only its identifier is unknown to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Record created and identified.
    Created(i64),
    /// Record created, identifier could not be resolved. Partial success.
    CreatedIdUnknown,
}

impl CreateOutcome {
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Created(id) => Some(*id),
            Self::CreatedIdUnknown => None,
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Sort direction for listing queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Lenient parse: anything other than asc/desc (case-insensitive)
    /// falls back to ascending.
    pub fn from_wire(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "desc" => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Columns that listing queries may sort by. Identifiers are interpolated
/// into statement text, so the set is closed; anything else falls back to
/// the default column.
pub const SORT_COLUMNS: &[&str] = &[
    "id",
    "title",
    "summary",
    "owner_email",
    "status",
    "demo_url",
    "repo_url",
    "products",
    "confidentiality",
    "remarks",
    "created_at",
    "updated_at",
];

/// A validated listing window: page number, sort column, sort direction.
/// Computed per call, never stored. Page size is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    page: i64,
    sort_by: &'static str,
    direction: SortDirection,
}

impl PaginationWindow {
    /// Build a window from untrusted inputs. Invalid values degrade
    /// silently: unknown sort column to the default column, unknown
    /// direction to ascending, page below 1 to 1.
    pub fn sanitize(page: i64, sort_by: &str, sort_order: &str) -> Self {
        let sort_by = SORT_COLUMNS
            .iter()
            .find(|c| **c == sort_by)
            .copied()
            .unwrap_or(DEFAULT_SORT_COLUMN);
        Self {
            page: page.max(1),
            sort_by,
            direction: SortDirection::from_wire(sort_order),
        }
    }

    /// Build a window from raw query-string values. A missing or
    /// non-numeric page counts as page 1.
    pub fn from_query(page: Option<&str>, sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
        let page = page.and_then(|p| p.trim().parse::<i64>().ok()).unwrap_or(1);
        Self::sanitize(page, sort_by.unwrap_or(DEFAULT_SORT_COLUMN), sort_order.unwrap_or(""))
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn sort_by(&self) -> &'static str {
        self.sort_by
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        // Pages are never clamped, so any numeric page survives sanitize;
        // saturate instead of overflowing on astronomical values.
        (self.page - 1).saturating_mul(PAGE_SIZE)
    }
}

impl Default for PaginationWindow {
    fn default() -> Self {
        Self::sanitize(1, DEFAULT_SORT_COLUMN, "")
    }
}
