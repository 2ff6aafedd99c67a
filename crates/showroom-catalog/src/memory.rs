//! In-memory record store for tests and offline runs.
//!
//! Mirrors the warehouse store's observable behavior without a network:
//! identifier assignment, document regeneration, timestamp handling, and
//! the same validation and not-found errors. Keys are assigned locally, so
//! creation needs no post-insert lookup and always reports its identifier.
//! The store keeps a log of the operations it served so tests can assert
//! what was, and was not, called.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use showroom_core::{
    render_info_md, CatalogRecord, CreateOutcome, Error, ListRecordsResponse, PaginationWindow,
    RecordDraft, RecordStore, RecordSummary, Result, SortDirection,
};

/// In-memory [`RecordStore`] with a call log.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    records: BTreeMap<i64, CatalogRecord>,
    calls: Vec<String>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing records, keyed by their identifiers.
    pub fn with_records(records: Vec<CatalogRecord>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock().unwrap();
            for record in records {
                state.records.insert(record.id, record);
            }
        }
        store
    }

    /// Seed one record from a draft, assigning the next identifier.
    /// Synchronous setup convenience; does not appear in the call log.
    pub fn seed_draft(&self, draft: RecordDraft) -> i64 {
        let now = Utc::now();
        let mut state = self.state.lock().unwrap();
        let id = next_id(&state.records);
        state
            .records
            .insert(id, record_from_draft(id, &draft, Some(now), now));
        id
    }

    /// Operations served so far, oldest first.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn next_id(records: &BTreeMap<i64, CatalogRecord>) -> i64 {
    records.keys().next_back().copied().unwrap_or(0) + 1
}

fn record_from_draft(
    id: i64,
    draft: &RecordDraft,
    created_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
) -> CatalogRecord {
    CatalogRecord {
        id,
        title: draft.title.clone(),
        summary: draft.summary.clone(),
        description_md: draft.description_md.clone(),
        owner_email: draft.owner_email.clone(),
        creator_email: draft.creator_email.clone().filter(|c| !c.trim().is_empty()),
        status: draft.status,
        demo_url: draft.demo_url.clone(),
        repo_url: draft.repo_url.clone(),
        products: draft.products.clone(),
        confidentiality: draft.confidentiality,
        remarks: draft.remarks.clone(),
        created_at,
        updated_at: Some(updated_at),
        info_md: Some(render_info_md(Some(id), draft, created_at, Some(updated_at))),
    }
}

fn summarize(record: &CatalogRecord) -> RecordSummary {
    RecordSummary {
        id: record.id,
        title: record.title.clone(),
        summary: record.summary.clone(),
        owner_email: record.owner_email.clone(),
        creator_email: record.creator_email.clone(),
        status: record.status,
        demo_url: record.demo_url.clone(),
        repo_url: record.repo_url.clone(),
        products: record.products.clone(),
        confidentiality: record.confidentiality,
        remarks: record.remarks.clone(),
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

fn compare(a: &CatalogRecord, b: &CatalogRecord, sort_by: &str) -> std::cmp::Ordering {
    match sort_by {
        "id" => a.id.cmp(&b.id),
        "title" => a.title.cmp(&b.title),
        "summary" => a.summary.cmp(&b.summary),
        "owner_email" => a.owner_email.cmp(&b.owner_email),
        "status" => a.status.to_string().cmp(&b.status.to_string()),
        "demo_url" => a.demo_url.cmp(&b.demo_url),
        "repo_url" => a.repo_url.cmp(&b.repo_url),
        "products" => a.products.join(",").cmp(&b.products.join(",")),
        "confidentiality" => a
            .confidentiality
            .to_string()
            .cmp(&b.confidentiality.to_string()),
        "remarks" => a.remarks.cmp(&b.remarks),
        "updated_at" => a.updated_at.cmp(&b.updated_at),
        _ => a.created_at.cmp(&b.created_at),
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list(&self, window: &PaginationWindow) -> Result<ListRecordsResponse> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("list page={}", window.page()));
        let total = state.records.len() as i64;

        let mut ordered: Vec<&CatalogRecord> = state.records.values().collect();
        ordered.sort_by(|a, b| {
            let ordering = compare(a, b, window.sort_by());
            match window.direction() {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let records = ordered
            .into_iter()
            .skip(window.offset().max(0) as usize)
            .take(window.limit() as usize)
            .map(summarize)
            .collect();
        Ok(ListRecordsResponse { records, total })
    }

    async fn get(&self, id: i64, include_internal: bool) -> Result<Option<CatalogRecord>> {
        if id <= 0 {
            return Err(Error::InvalidInput(format!(
                "record id must be positive, got {}",
                id
            )));
        }
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("get {}", id));
        Ok(state.records.get(&id).map(|record| {
            let mut record = record.clone();
            if !include_internal {
                record.info_md = None;
            }
            record
        }))
    }

    async fn insert(&self, draft: &RecordDraft) -> Result<CreateOutcome> {
        draft.validate()?;
        let now = Utc::now();
        let mut state = self.state.lock().unwrap();
        state.calls.push("insert".to_string());

        let id = next_id(&state.records);
        state
            .records
            .insert(id, record_from_draft(id, draft, Some(now), now));
        Ok(CreateOutcome::Created(id))
    }

    async fn update(&self, id: i64, draft: &RecordDraft) -> Result<()> {
        if id <= 0 {
            return Err(Error::InvalidInput(format!(
                "record id must be positive, got {}",
                id
            )));
        }
        draft.validate()?;
        let now = Utc::now();
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("update {}", id));

        let created_at = match state.records.get(&id) {
            Some(existing) => existing.created_at,
            None => return Err(Error::RecordNotFound(id)),
        };
        state
            .records
            .insert(id, record_from_draft(id, draft, created_at, now));
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        if id <= 0 {
            return Err(Error::InvalidInput(format!(
                "record id must be positive, got {}",
                id
            )));
        }
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete {}", id));
        if state.records.remove(&id).is_none() {
            return Err(Error::RecordNotFound(id));
        }
        Ok(())
    }
}
