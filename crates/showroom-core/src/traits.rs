//! Core traits for showroom abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::identity::is_valid_email;
use crate::models::*;

// =============================================================================
// RECORD STORE
// =============================================================================

/// Field values for creating or fully updating a catalog record.
///
/// Identifier, timestamps, and the composite document are never supplied by
/// callers; the store derives them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordDraft {
    pub title: String,
    pub summary: String,
    pub description_md: String,
    pub owner_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_email: Option<String>,
    pub status: RecordStatus,
    pub demo_url: String,
    pub repo_url: String,
    pub products: Vec<String>,
    pub confidentiality: Confidentiality,
    pub remarks: String,
}

impl RecordDraft {
    /// Boundary validation. Runs before any statement is built; a failure
    /// here means no backend call is attempted.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("title is required".to_string()));
        }
        if self.owner_email.trim().is_empty() {
            return Err(Error::InvalidInput("owner email is required".to_string()));
        }
        if !is_valid_email(self.owner_email.trim()) {
            return Err(Error::InvalidInput(format!(
                "owner email is not a valid address: {}",
                self.owner_email
            )));
        }
        if let Some(creator) = &self.creator_email {
            if !creator.trim().is_empty() && !is_valid_email(creator.trim()) {
                return Err(Error::InvalidInput(format!(
                    "creator email is not a valid address: {}",
                    creator
                )));
            }
        }
        if self.demo_url.trim().is_empty() {
            return Err(Error::InvalidInput("demo URL is required".to_string()));
        }
        Ok(())
    }
}

/// Response for listing records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRecordsResponse {
    pub records: Vec<RecordSummary>,
    pub total: i64,
}

/// Store for catalog record CRUD operations.
///
/// Implementations own statement construction and value binding; callers
/// never see SQL. A single underlying execution failure surfaces as-is,
/// with no automatic retry.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List one page of records plus the unfiltered total count.
    async fn list(&self, window: &PaginationWindow) -> Result<ListRecordsResponse>;

    /// Fetch a record by identifier. `include_internal` adds the composite
    /// document, which external reads never carry.
    async fn get(&self, id: i64, include_internal: bool) -> Result<Option<CatalogRecord>>;

    /// Create a record. The backend returns no generated key, so the
    /// outcome may be a partial success with the identifier unknown.
    async fn insert(&self, draft: &RecordDraft) -> Result<CreateOutcome>;

    /// Replace every caller-supplied field of an existing record.
    async fn update(&self, id: i64, draft: &RecordDraft) -> Result<()>;

    /// Delete a record permanently. No tombstone.
    async fn delete(&self, id: i64) -> Result<()>;
}
