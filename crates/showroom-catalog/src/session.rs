//! Per-session browse state.
//!
//! The UI remembers two things between interactions: the listing it last
//! showed, so a clicked row index resolves back to a record identifier, and
//! the last detail it fetched, so re-selecting the same row costs nothing.
//! Both live in this explicit session object threaded through calls; there
//! is no process-wide state. One session serves one viewer, which is the
//! accepted limit of the design.

use tracing::debug;

use showroom_core::{CatalogRecord, RecordStore, Result};

use crate::view::CatalogPage;

/// Single-slot memo of the most recently fetched record detail.
///
/// Populated on the first detail fetch after each listing reload, reused
/// only on an exact identifier match, and unconditionally dropped whenever
/// the listing reloads. Holds at most one entry; this is a memo, not a
/// cache layer.
#[derive(Debug, Default)]
pub struct DetailCache {
    slot: Option<(i64, CatalogRecord)>,
}

impl DetailCache {
    pub fn get(&self, id: i64) -> Option<&CatalogRecord> {
        match &self.slot {
            Some((cached_id, record)) if *cached_id == id => Some(record),
            _ => None,
        }
    }

    pub fn put(&mut self, id: i64, record: CatalogRecord) {
        self.slot = Some((id, record));
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Identifier currently held, if any.
    pub fn cached_id(&self) -> Option<i64> {
        self.slot.as_ref().map(|(id, _)| *id)
    }
}

/// Browse state for one viewer: the last listing plus the detail memo.
#[derive(Debug, Default)]
pub struct BrowseSession {
    listing: Option<CatalogPage>,
    cache: DetailCache,
}

impl BrowseSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly loaded listing. Always drops the detail memo,
    /// even if the new listing shows the same records.
    pub fn set_listing(&mut self, page: CatalogPage) {
        self.cache.clear();
        self.listing = Some(page);
    }

    pub fn listing(&self) -> Option<&CatalogPage> {
        self.listing.as_ref()
    }

    /// Resolve a clicked row index against the last shown listing.
    pub fn record_id_at(&self, row: usize) -> Option<i64> {
        self.listing
            .as_ref()
            .and_then(|page| page.records.get(row))
            .map(|record| record.id)
    }

    /// Fetch a record's external detail, reusing the memo on an exact
    /// identifier match. A successful fetch replaces the memo; a miss or a
    /// failed call leaves it untouched.
    pub async fn detail(
        &mut self,
        store: &dyn RecordStore,
        id: i64,
    ) -> Result<Option<CatalogRecord>> {
        if let Some(hit) = self.cache.get(id) {
            debug!(record_id = id, "Detail served from session memo");
            return Ok(Some(hit.clone()));
        }
        match store.get(id, false).await? {
            Some(record) => {
                self.cache.put(id, record.clone());
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}
