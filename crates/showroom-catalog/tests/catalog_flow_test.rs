//! End-to-end catalog flows against a mocked warehouse API.
//!
//! These walk the full statement protocol for each operation: the
//! three-step creation with its document patch-back, the existence-checked
//! delete, timestamp preservation across updates, and the two independent
//! listing statements.

use std::sync::Arc;

use serde_json::json;
use showroom_catalog::{CatalogView, WarehouseRecordStore};
use showroom_core::{CreateOutcome, Error, RecordDraft, RecordStatus, RecordStore};
use showroom_warehouse::{AccessToken, StatementExecutor, TokenSource, WarehouseConfig};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> WarehouseConfig {
    WarehouseConfig {
        host: server.uri(),
        warehouse_id: "wh-test".to_string(),
        ..WarehouseConfig::default()
    }
}

fn store_for(server: &MockServer) -> WarehouseRecordStore {
    let executor = Arc::new(StatementExecutor::new(&test_config(server)));
    WarehouseRecordStore::new(executor, AccessToken::new("test-token", TokenSource::Static))
}

fn draft() -> RecordDraft {
    RecordDraft {
        title: "Demo X".to_string(),
        summary: "Short pitch".to_string(),
        owner_email: "a@x.com".to_string(),
        status: RecordStatus::Draft,
        demo_url: "https://x".to_string(),
        products: vec!["A".to_string(), "B".to_string()],
        ..RecordDraft::default()
    }
}

fn succeeded_body(columns: &[&str], data_array: serde_json::Value) -> serde_json::Value {
    json!({
        "statement_id": "stmt-1",
        "status": {"state": "SUCCEEDED"},
        "manifest": {"schema": {"columns":
            columns.iter().map(|c| json!({"name": c})).collect::<Vec<_>>()
        }},
        "result": {"data_array": data_array}
    })
}

fn succeeded_empty() -> serde_json::Value {
    json!({"statement_id": "stmt-1", "status": {"state": "SUCCEEDED"}})
}

// ==========================================================================
// Creation Protocol
// ==========================================================================

#[tokio::test]
async fn test_create_resolves_identifier_and_patches_document() {
    let mock_server = MockServer::start().await;

    // Step 1: the insert carries the placeholder-bearing document.
    Mock::given(method("POST"))
        .and(path("/api/2.0/sql/statements"))
        .and(body_string_contains("INSERT INTO main.showroom.demos"))
        .and(body_string_contains("Demo ID: TBD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(succeeded_empty()))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Step 2: identifier resolution over the whole table.
    Mock::given(method("POST"))
        .and(path("/api/2.0/sql/statements"))
        .and(body_string_contains("SELECT MAX(id) AS last_id"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(succeeded_body(&["last_id"], json!([["7"]]))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // Step 3: the patch rewrites only the document, now with the real id.
    Mock::given(method("POST"))
        .and(path("/api/2.0/sql/statements"))
        .and(body_string_contains("SET info_md"))
        .and(body_string_contains("Demo ID: 7"))
        .and(body_string_contains("WHERE id = 7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(succeeded_empty()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let outcome = store.insert(&draft()).await.expect("create should succeed");
    assert_eq!(outcome, CreateOutcome::Created(7));
}

#[tokio::test]
async fn test_create_without_resolved_identifier_is_partial_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/2.0/sql/statements"))
        .and(body_string_contains("INSERT INTO"))
        .respond_with(ResponseTemplate::new(200).set_body_json(succeeded_empty()))
        .expect(1)
        .mount(&mock_server)
        .await;

    // MAX over an unreadable table state: one row, NULL cell.
    Mock::given(method("POST"))
        .and(path("/api/2.0/sql/statements"))
        .and(body_string_contains("SELECT MAX(id) AS last_id"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(succeeded_body(&["last_id"], json!([[null]]))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // No identifier, no patch.
    Mock::given(method("POST"))
        .and(path("/api/2.0/sql/statements"))
        .and(body_string_contains("SET info_md"))
        .respond_with(ResponseTemplate::new(200).set_body_json(succeeded_empty()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let outcome = store.insert(&draft()).await.expect("create should succeed");
    assert_eq!(outcome, CreateOutcome::CreatedIdUnknown);
}

// ==========================================================================
// Delete
// ==========================================================================

#[tokio::test]
async fn test_delete_missing_record_issues_no_mutating_statement() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/2.0/sql/statements"))
        .and(body_string_contains("SELECT id FROM main.showroom.demos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(succeeded_body(&["id"], json!([]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/2.0/sql/statements"))
        .and(body_string_contains("DELETE FROM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(succeeded_empty()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let err = store.delete(99999).await.unwrap_err();
    assert!(matches!(err, Error::RecordNotFound(99999)));
}

#[tokio::test]
async fn test_delete_existing_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/2.0/sql/statements"))
        .and(body_string_contains("SELECT id FROM main.showroom.demos"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(succeeded_body(&["id"], json!([["7"]]))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/2.0/sql/statements"))
        .and(body_string_contains("DELETE FROM main.showroom.demos WHERE id = 7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(succeeded_empty()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    store.delete(7).await.expect("delete should succeed");
}

// ==========================================================================
// Update
// ==========================================================================

fn internal_columns() -> Vec<&'static str> {
    vec![
        "id",
        "title",
        "summary",
        "description_md",
        "owner_email",
        "creator_email",
        "status",
        "demo_url",
        "repo_url",
        "products",
        "confidentiality",
        "remarks",
        "created_at",
        "updated_at",
        "info_md",
    ]
}

#[tokio::test]
async fn test_update_preserves_creation_timestamp() {
    let mock_server = MockServer::start().await;

    // The pre-update fetch supplies the original creation timestamp.
    Mock::given(method("POST"))
        .and(path("/api/2.0/sql/statements"))
        .and(body_string_contains("SELECT id, title, summary, description_md"))
        .and(body_string_contains("WHERE id = 7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(succeeded_body(
            &internal_columns(),
            json!([[
                "7",
                "Old title",
                "Old pitch",
                "Old body",
                "a@x.com",
                null,
                "draft",
                "https://x",
                "",
                "[\"A\"]",
                "internal",
                "",
                "2026-01-05 08:00:00",
                "2026-01-05 08:00:00",
                "# Old title"
            ]]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    // The rewritten document must re-embed the preserved creation time.
    Mock::given(method("POST"))
        .and(path("/api/2.0/sql/statements"))
        .and(body_string_contains("UPDATE main.showroom.demos SET"))
        .and(body_string_contains("WHERE id = 7"))
        .and(body_string_contains("Registered: 2026-01-05 08:00:00 UTC"))
        .and(body_string_contains("Demo ID: 7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(succeeded_empty()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    store.update(7, &draft()).await.expect("update should succeed");

    // The row keeps its creation timestamp too: the update statement must
    // not assign the created_at column.
    let requests = mock_server.received_requests().await.unwrap();
    let update_body = requests
        .iter()
        .map(|r| String::from_utf8_lossy(&r.body).to_string())
        .find(|b| b.contains("UPDATE main.showroom.demos SET"))
        .expect("update statement was sent");
    assert!(!update_body.contains("created_at ="));
    assert!(update_body.contains("updated_at = '"));
}

// ==========================================================================
// Listing
// ==========================================================================

fn summary_columns() -> Vec<&'static str> {
    vec![
        "id",
        "title",
        "summary",
        "owner_email",
        "creator_email",
        "status",
        "demo_url",
        "repo_url",
        "products",
        "confidentiality",
        "remarks",
        "created_at",
        "updated_at",
    ]
}

fn summary_row(id: i64) -> serde_json::Value {
    json!([
        id.to_string(),
        format!("Demo {:02}", id),
        "pitch",
        "a@x.com",
        null,
        "published",
        "https://x",
        "",
        "[\"A\",\"B\"]",
        "internal",
        "",
        "2026-08-01 10:00:00",
        null
    ])
}

#[tokio::test]
async fn test_listing_pages_and_counts_are_independent_statements() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/2.0/sql/statements"))
        .and(body_string_contains("SELECT COUNT(*) AS total"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(succeeded_body(&["total"], json!([["25"]]))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/2.0/sql/statements"))
        .and(body_string_contains("ORDER BY id ASC"))
        .and(body_string_contains("LIMIT 10 OFFSET 0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(succeeded_body(
            &summary_columns(),
            serde_json::Value::Array((1..=10).map(summary_row).collect()),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let page = CatalogView::new(&store)
        .list(Some("1"), Some("id"), Some("asc"))
        .await
        .expect("listing should succeed");

    assert_eq!(page.len(), 10);
    assert_eq!(page.total_count, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.records[0].id, 1);
    assert_eq!(page.records[0].products, vec!["A", "B"]);
}

// ==========================================================================
// Validation Boundary
// ==========================================================================

#[tokio::test]
async fn test_validation_failures_never_reach_the_warehouse() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(succeeded_empty()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);

    let mut bad = draft();
    bad.owner_email = "not-an-email".to_string();
    assert!(matches!(
        store.insert(&bad).await.unwrap_err(),
        Error::InvalidInput(_)
    ));
    assert!(matches!(
        store.get(0, false).await.unwrap_err(),
        Error::InvalidInput(_)
    ));
    assert!(matches!(
        store.delete(-3).await.unwrap_err(),
        Error::InvalidInput(_)
    ));
}
