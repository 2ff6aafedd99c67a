//! Paginated catalog listing.

use serde::Serialize;

use showroom_core::defaults::PAGE_SIZE;
use showroom_core::{PaginationWindow, RecordStore, RecordSummary, Result, SortDirection};

/// One rendered catalog page.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogPage {
    pub records: Vec<RecordSummary>,
    /// Unfiltered record count at the time of the count statement. Count
    /// and page come from separate statements, so they can disagree under
    /// concurrent writes.
    pub total_count: i64,
    pub page: i64,
    pub total_pages: i64,
    pub sort_by: &'static str,
    pub direction: SortDirection,
}

impl CatalogPage {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Total pages for a record count at the fixed page size. Never less than
/// one, so a UI always has a page to stand on.
pub fn total_pages(total_count: i64) -> i64 {
    (total_count.saturating_add(PAGE_SIZE - 1) / PAGE_SIZE).max(1)
}

/// Listing facade: sanitizes paging inputs, runs the windowed query, and
/// shapes the result for display.
pub struct CatalogView<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> CatalogView<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// List one page from raw query inputs.
    ///
    /// Invalid values degrade silently: unknown sort column to the default,
    /// unknown direction to ascending, missing or non-numeric page to 1.
    /// An out-of-range page is not clamped; it comes back as an empty slice
    /// next to a total the count statement reported, since no shared
    /// snapshot exists that clamping could trust.
    pub async fn list(
        &self,
        page: Option<&str>,
        sort_by: Option<&str>,
        sort_order: Option<&str>,
    ) -> Result<CatalogPage> {
        self.list_window(&PaginationWindow::from_query(page, sort_by, sort_order))
            .await
    }

    /// List one page for an already sanitized window.
    pub async fn list_window(&self, window: &PaginationWindow) -> Result<CatalogPage> {
        let response = self.store.list(window).await?;
        Ok(CatalogPage {
            records: response.records,
            total_count: response.total,
            page: window.page(),
            total_pages: total_pages(response.total),
            sort_by: window.sort_by(),
            direction: window.direction(),
        })
    }
}
