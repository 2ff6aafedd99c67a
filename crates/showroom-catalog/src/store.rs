//! Warehouse implementation of the record store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::{debug, info, warn};

use showroom_core::defaults::DEFAULT_RECORDS_TABLE;
use showroom_core::{
    normalize_products, render_info_md, CatalogRecord, Confidentiality, CreateOutcome, Error,
    ListRecordsResponse, PaginationWindow, RecordDraft, RecordStatus, RecordStore, RecordSummary,
    Result,
};
use showroom_warehouse::{AccessToken, RowSet, Statement, StatementExecutor};

use crate::create::CreateReconciler;
use crate::sql::{array_literal, BackendCapabilities, ValueBinder};

/// Columns returned by listing queries. Excludes the long-form description
/// and the composite document.
const SUMMARY_COLUMNS: &str = "id, title, summary, owner_email, creator_email, status, \
     demo_url, repo_url, products, confidentiality, remarks, created_at, updated_at";

/// Columns returned by external detail reads.
const DETAIL_COLUMNS: &str = "id, title, summary, description_md, owner_email, creator_email, \
     status, demo_url, repo_url, products, confidentiality, remarks, created_at, updated_at";

/// Detail columns plus the composite document, for internal reads.
const INTERNAL_COLUMNS: &str = "id, title, summary, description_md, owner_email, creator_email, \
     status, demo_url, repo_url, products, confidentiality, remarks, created_at, updated_at, \
     info_md";

/// Timestamp shape written into statement text. The warehouse parses it as
/// a session-timezone-free timestamp; all stores write UTC.
pub(crate) const SQL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Warehouse implementation of [`RecordStore`].
///
/// One instance serves one resolved request: it carries the caller's access
/// token, so stores are built per request rather than shared. The capability
/// descriptor fixed at construction decides whether values travel as bound
/// parameters or escaped literals, whether the composite document column
/// exists, and whether creation needs the post-insert identifier lookup.
pub struct WarehouseRecordStore {
    executor: Arc<StatementExecutor>,
    token: AccessToken,
    table: String,
    capabilities: BackendCapabilities,
}

impl WarehouseRecordStore {
    /// Create a store over the default records table with the default
    /// capability descriptor.
    pub fn new(executor: Arc<StatementExecutor>, token: AccessToken) -> Self {
        Self {
            executor,
            token,
            table: DEFAULT_RECORDS_TABLE.to_string(),
            capabilities: BackendCapabilities::default(),
        }
    }

    /// Override the fully qualified records table.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Override the backend capability descriptor.
    pub fn with_capabilities(mut self, capabilities: BackendCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub(crate) fn table(&self) -> &str {
        &self.table
    }

    pub(crate) fn capabilities(&self) -> BackendCapabilities {
        self.capabilities
    }

    pub(crate) async fn execute(&self, statement: Statement) -> Result<RowSet> {
        self.executor.execute(&self.token, &statement).await
    }

    pub(crate) fn build_insert(
        &self,
        draft: &RecordDraft,
        info_md: Option<&str>,
        stamp: &str,
    ) -> Statement {
        let mut binder = ValueBinder::new(self.capabilities);
        let mut columns: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        for (column, value) in draft_values(draft) {
            columns.push(column);
            values.push(binder.push(column, value));
        }
        columns.push("products");
        values.push(array_literal(&draft.products));
        columns.push("created_at");
        values.push(format!("'{}'", stamp));
        columns.push("updated_at");
        values.push(format!("'{}'", stamp));
        if let Some(doc) = info_md {
            columns.push("info_md");
            values.push(binder.push("info_md", Some(doc.to_string())));
        }

        let text = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            values.join(", ")
        );
        binder.into_statement(text)
    }

    fn build_update(
        &self,
        id: i64,
        draft: &RecordDraft,
        info_md: Option<&str>,
        stamp: &str,
    ) -> Statement {
        let mut binder = ValueBinder::new(self.capabilities);
        let mut assignments: Vec<String> = Vec::new();

        for (column, value) in draft_values(draft) {
            assignments.push(format!("{} = {}", column, binder.push(column, value)));
        }
        assignments.push(format!("products = {}", array_literal(&draft.products)));
        // created_at is deliberately not assigned; it survives every update.
        assignments.push(format!("updated_at = '{}'", stamp));
        if let Some(doc) = info_md {
            assignments.push(format!(
                "info_md = {}",
                binder.push("info_md", Some(doc.to_string()))
            ));
        }

        let text = format!(
            "UPDATE {} SET {} WHERE id = {}",
            self.table,
            assignments.join(", "),
            id
        );
        binder.into_statement(text)
    }
}

#[async_trait]
impl RecordStore for WarehouseRecordStore {
    async fn list(&self, window: &PaginationWindow) -> Result<ListRecordsResponse> {
        // Count and page are separate statements against a backend with no
        // shared read snapshot, so they can disagree under concurrent writes.
        let count = self
            .execute(Statement::new(format!(
                "SELECT COUNT(*) AS total FROM {}",
                self.table
            )))
            .await?;
        let total = count
            .first_value("total")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(0);

        let rows = self
            .execute(Statement::new(format!(
                "SELECT {} FROM {} ORDER BY {} {} LIMIT {} OFFSET {}",
                SUMMARY_COLUMNS,
                self.table,
                window.sort_by(),
                window.direction().as_sql(),
                window.limit(),
                window.offset(),
            )))
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in 0..rows.len() {
            match row_to_summary(&rows, row) {
                Some(summary) => records.push(summary),
                None => warn!(row, "Skipping listing row without a parseable identifier"),
            }
        }
        debug!(
            result_count = records.len(),
            total,
            page = window.page(),
            "Listed records"
        );
        Ok(ListRecordsResponse { records, total })
    }

    async fn get(&self, id: i64, include_internal: bool) -> Result<Option<CatalogRecord>> {
        if id <= 0 {
            return Err(Error::InvalidInput(format!(
                "record id must be positive, got {}",
                id
            )));
        }
        let with_document = include_internal && self.capabilities.supports_composite_document;
        let columns = if with_document {
            INTERNAL_COLUMNS
        } else {
            DETAIL_COLUMNS
        };
        let rows = self
            .execute(Statement::new(format!(
                "SELECT {} FROM {} WHERE id = {}",
                columns, self.table, id
            )))
            .await?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(row_to_record(&rows, 0, id, with_document)))
    }

    async fn insert(&self, draft: &RecordDraft) -> Result<CreateOutcome> {
        draft.validate()?;
        CreateReconciler::new(self).create(draft).await
    }

    async fn update(&self, id: i64, draft: &RecordDraft) -> Result<()> {
        if id <= 0 {
            return Err(Error::InvalidInput(format!(
                "record id must be positive, got {}",
                id
            )));
        }
        draft.validate()?;

        // The fetch pins down the original creation timestamp so the
        // regenerated document and the row keep it across the rewrite.
        let existing = self
            .get(id, true)
            .await?
            .ok_or(Error::RecordNotFound(id))?;

        let now = Utc::now();
        let info_md = self
            .capabilities
            .supports_composite_document
            .then(|| render_info_md(Some(id), draft, existing.created_at, Some(now)));
        let stamp = now.format(SQL_TIMESTAMP_FORMAT).to_string();

        self.execute(self.build_update(id, draft, info_md.as_deref(), &stamp))
            .await?;
        info!(record_id = id, "Updated record");
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        if id <= 0 {
            return Err(Error::InvalidInput(format!(
                "record id must be positive, got {}",
                id
            )));
        }

        // Existence is checked first so a miss surfaces as not-found without
        // any mutating statement reaching the warehouse.
        let rows = self
            .execute(Statement::new(format!(
                "SELECT id FROM {} WHERE id = {}",
                self.table, id
            )))
            .await?;
        if rows.is_empty() {
            return Err(Error::RecordNotFound(id));
        }

        self.execute(Statement::new(format!(
            "DELETE FROM {} WHERE id = {}",
            self.table, id
        )))
        .await?;
        info!(record_id = id, "Deleted record");
        Ok(())
    }
}

/// Caller-supplied scalar columns in statement order. Products, timestamps,
/// and the composite document are appended separately: the first is an array
/// constructor and the rest are store-generated.
fn draft_values(draft: &RecordDraft) -> Vec<(&'static str, Option<String>)> {
    vec![
        ("title", Some(draft.title.clone())),
        ("summary", Some(draft.summary.clone())),
        ("description_md", Some(draft.description_md.clone())),
        ("owner_email", Some(draft.owner_email.clone())),
        (
            "creator_email",
            draft
                .creator_email
                .clone()
                .filter(|c| !c.trim().is_empty()),
        ),
        ("status", Some(draft.status.to_string())),
        ("demo_url", Some(draft.demo_url.clone())),
        ("repo_url", Some(draft.repo_url.clone())),
        ("confidentiality", Some(draft.confidentiality.to_string())),
        ("remarks", Some(draft.remarks.clone())),
    ]
}

fn text_cell(rows: &RowSet, row: usize, column: &str) -> String {
    rows.value(row, column).unwrap_or_default().to_string()
}

fn optional_cell(rows: &RowSet, row: usize, column: &str) -> Option<String> {
    rows.value(row, column)
        .map(str::to_string)
        .filter(|v| !v.trim().is_empty())
}

/// Parse a warehouse timestamp cell. The API returns timestamps as strings
/// whose shape depends on the column type and server version, so both
/// RFC 3339 and the plain `YYYY-MM-DD HH:MM:SS` form are accepted.
/// Unparseable or absent cells read as no timestamp.
fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

/// Convert one listing row. Rows without a parseable identifier are dropped
/// by the caller; old rows occasionally carry junk there.
fn row_to_summary(rows: &RowSet, row: usize) -> Option<RecordSummary> {
    let id = rows.value(row, "id")?.trim().parse::<i64>().ok()?;
    Some(RecordSummary {
        id,
        title: text_cell(rows, row, "title"),
        summary: text_cell(rows, row, "summary"),
        owner_email: text_cell(rows, row, "owner_email"),
        creator_email: optional_cell(rows, row, "creator_email"),
        status: RecordStatus::from_wire(&text_cell(rows, row, "status")),
        demo_url: text_cell(rows, row, "demo_url"),
        repo_url: text_cell(rows, row, "repo_url"),
        products: normalize_products(rows.value(row, "products").unwrap_or("")),
        confidentiality: Confidentiality::from_wire(&text_cell(rows, row, "confidentiality")),
        remarks: text_cell(rows, row, "remarks"),
        created_at: parse_timestamp(rows.value(row, "created_at")),
        updated_at: parse_timestamp(rows.value(row, "updated_at")),
    })
}

/// Convert one detail row. The identifier the row was fetched by is
/// authoritative, so a junk identifier cell cannot fail a point read.
fn row_to_record(rows: &RowSet, row: usize, id: i64, with_document: bool) -> CatalogRecord {
    CatalogRecord {
        id,
        title: text_cell(rows, row, "title"),
        summary: text_cell(rows, row, "summary"),
        description_md: text_cell(rows, row, "description_md"),
        owner_email: text_cell(rows, row, "owner_email"),
        creator_email: optional_cell(rows, row, "creator_email"),
        status: RecordStatus::from_wire(&text_cell(rows, row, "status")),
        demo_url: text_cell(rows, row, "demo_url"),
        repo_url: text_cell(rows, row, "repo_url"),
        products: normalize_products(rows.value(row, "products").unwrap_or("")),
        confidentiality: Confidentiality::from_wire(&text_cell(rows, row, "confidentiality")),
        remarks: text_cell(rows, row, "remarks"),
        created_at: parse_timestamp(rows.value(row, "created_at")),
        updated_at: parse_timestamp(rows.value(row, "updated_at")),
        info_md: if with_document {
            rows.value(row, "info_md").map(str::to_string)
        } else {
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showroom_warehouse::{TokenSource, WarehouseConfig};

    fn test_store(capabilities: BackendCapabilities) -> WarehouseRecordStore {
        let config = WarehouseConfig {
            host: "https://warehouse.test".to_string(),
            warehouse_id: "wh1".to_string(),
            ..Default::default()
        };
        WarehouseRecordStore::new(
            Arc::new(StatementExecutor::new(&config)),
            AccessToken::new("token", TokenSource::Static),
        )
        .with_capabilities(capabilities)
    }

    fn draft() -> RecordDraft {
        RecordDraft {
            title: "Demo X".to_string(),
            summary: "Short pitch".to_string(),
            description_md: "Long form".to_string(),
            owner_email: "a@x.com".to_string(),
            creator_email: None,
            status: RecordStatus::Draft,
            demo_url: "https://x".to_string(),
            repo_url: "https://github.com/x/demo".to_string(),
            products: vec!["A".to_string(), "B".to_string()],
            confidentiality: Confidentiality::Internal,
            remarks: "note".to_string(),
        }
    }

    // =========================================================================
    // STATEMENT BUILDING
    // =========================================================================

    #[test]
    fn test_build_insert_binds_values() {
        let store = test_store(BackendCapabilities::default());
        let statement = store.build_insert(&draft(), Some("doc"), "2026-08-20 12:00:00");

        assert!(statement.text().starts_with("INSERT INTO main.showroom.demos"));
        assert!(statement.text().contains(":title"));
        assert!(statement.text().contains(":info_md"));
        assert!(statement.text().contains("array('A', 'B')"));
        assert!(statement
            .text()
            .contains("'2026-08-20 12:00:00', '2026-08-20 12:00:00'"));

        let title = statement
            .parameters()
            .iter()
            .find(|p| p.name == "title")
            .unwrap();
        assert_eq!(title.value.as_deref(), Some("Demo X"));
        let creator = statement
            .parameters()
            .iter()
            .find(|p| p.name == "creator_email")
            .unwrap();
        assert_eq!(creator.value, None);
    }

    #[test]
    fn test_build_insert_literal_backend_escapes_inline() {
        let store = test_store(BackendCapabilities {
            supports_bound_parameters: false,
            ..Default::default()
        });
        let mut d = draft();
        d.title = "O'Brien demo".to_string();
        let statement = store.build_insert(&d, Some("doc"), "2026-08-20 12:00:00");

        assert!(statement.text().contains("'O''Brien demo'"));
        assert!(statement.text().contains("NULL"));
        assert!(statement.parameters().is_empty());
    }

    #[test]
    fn test_build_insert_without_document_column() {
        let store = test_store(BackendCapabilities {
            supports_composite_document: false,
            ..Default::default()
        });
        let statement = store.build_insert(&draft(), None, "2026-08-20 12:00:00");
        assert!(!statement.text().contains("info_md"));
    }

    #[test]
    fn test_build_update_preserves_created_at() {
        let store = test_store(BackendCapabilities::default());
        let statement = store.build_update(7, &draft(), Some("doc"), "2026-08-21 09:00:00");

        assert!(statement.text().starts_with("UPDATE main.showroom.demos SET"));
        assert!(statement.text().ends_with("WHERE id = 7"));
        assert!(statement.text().contains("updated_at = '2026-08-21 09:00:00'"));
        assert!(!statement.text().contains("created_at"));
        assert!(statement.text().contains("info_md = :info_md"));
    }

    // =========================================================================
    // ROW CONVERSION
    // =========================================================================

    fn summary_columns() -> Vec<String> {
        SUMMARY_COLUMNS
            .split(',')
            .map(|c| c.trim().to_string())
            .collect()
    }

    fn summary_row(id: &str) -> Vec<Option<String>> {
        vec![
            Some(id.to_string()),
            Some("Demo X".to_string()),
            Some("Short pitch".to_string()),
            Some("a@x.com".to_string()),
            None,
            Some("published".to_string()),
            Some("https://x".to_string()),
            Some("https://github.com/x/demo".to_string()),
            Some("[\"A\",\"B\"]".to_string()),
            Some("internal".to_string()),
            Some("note".to_string()),
            Some("2026-08-20 12:00:00".to_string()),
            Some("2026-08-21T09:00:00Z".to_string()),
        ]
    }

    #[test]
    fn test_row_to_summary_parses_every_field() {
        let rows = RowSet::new(summary_columns(), vec![summary_row("7")]);
        let summary = row_to_summary(&rows, 0).unwrap();

        assert_eq!(summary.id, 7);
        assert_eq!(summary.title, "Demo X");
        assert_eq!(summary.status, RecordStatus::Published);
        assert_eq!(summary.products, vec!["A", "B"]);
        assert_eq!(summary.creator_email, None);
        assert!(summary.created_at.is_some());
        assert!(summary.updated_at.is_some());
    }

    #[test]
    fn test_row_to_summary_rejects_junk_identifier() {
        let rows = RowSet::new(summary_columns(), vec![summary_row("not-a-number")]);
        assert!(row_to_summary(&rows, 0).is_none());
    }

    #[test]
    fn test_row_to_record_document_gating() {
        let columns = vec!["description_md".to_string(), "info_md".to_string()];
        let row = vec![Some("Long form".to_string()), Some("# doc".to_string())];
        let rows = RowSet::new(columns, vec![row]);

        let external = row_to_record(&rows, 0, 7, false);
        assert_eq!(external.id, 7);
        assert_eq!(external.description_md, "Long form");
        assert_eq!(external.info_md, None);

        let internal = row_to_record(&rows, 0, 7, true);
        assert_eq!(internal.info_md.as_deref(), Some("# doc"));
    }

    // =========================================================================
    // TIMESTAMP PARSING
    // =========================================================================

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let parsed = parse_timestamp(Some("2026-08-20T12:00:00Z")).unwrap();
        assert_eq!(parsed.format("%Y-%m-%d %H:%M:%S").to_string(), "2026-08-20 12:00:00");
    }

    #[test]
    fn test_parse_timestamp_plain_form() {
        assert!(parse_timestamp(Some("2026-08-20 12:00:00")).is_some());
        assert!(parse_timestamp(Some("2026-08-20 12:00:00.123")).is_some());
    }

    #[test]
    fn test_parse_timestamp_junk_reads_as_absent() {
        assert_eq!(parse_timestamp(Some("yesterday")), None);
        assert_eq!(parse_timestamp(Some("   ")), None);
        assert_eq!(parse_timestamp(None), None);
    }
}
