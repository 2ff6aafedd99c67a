//! Warehouse statement execution.
//!
//! The warehouse exposes exactly one operation: POST a SQL statement, get
//! rows back inline. No sessions, no transactions, no generated-key return,
//! no server-side cursors. Every call authenticates itself with a bearer
//! token supplied by the caller, because the backend holds no connection
//! state between statements.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use showroom_core::defaults::SLOW_STATEMENT_MS;
use showroom_core::{Error, Result};

use crate::config::WarehouseConfig;
use crate::token::AccessToken;

/// One named parameter bound to a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementParameter {
    pub name: String,
    /// `None` binds SQL NULL.
    pub value: Option<String>,
}

/// A single SQL statement plus its bound parameters.
#[derive(Debug, Clone, Default)]
pub struct Statement {
    text: String,
    parameters: Vec<StatementParameter>,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: Vec::new(),
        }
    }

    /// Bind a named parameter. The statement text references it as `:name`.
    pub fn bind(mut self, name: impl Into<String>, value: Option<String>) -> Self {
        self.parameters.push(StatementParameter {
            name: name.into(),
            value,
        });
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parameters(&self) -> &[StatementParameter] {
        &self.parameters
    }
}

/// Column-named result rows from one statement.
///
/// The wire format delivers every cell as a string or null regardless of the
/// column's declared type; numeric interpretation is the caller's job.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RowSet {
    /// Assemble a row set from parallel column names and row cells. Used by
    /// adapters and test fixtures; the executor builds its own from the wire
    /// response.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell value by row index and column name. `None` for an unknown
    /// column, an out-of-range row, or a NULL cell alike; readers treat
    /// all three as absent.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// First row's value for a column. Convenience for single-row reads
    /// such as counts and MAX() lookups.
    pub fn first_value(&self, column: &str) -> Option<&str> {
        self.value(0, column)
    }
}

// ─── Wire types (statement API) ────────────────────────────────────────────

#[derive(Serialize)]
struct StatementRequest<'a> {
    statement: &'a str,
    warehouse_id: &'a str,
    format: &'static str,
    disposition: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<WireParameter<'a>>,
}

#[derive(Serialize)]
struct WireParameter<'a> {
    name: &'a str,
    /// Serialized as JSON null for SQL NULL.
    value: Option<&'a str>,
    #[serde(rename = "type")]
    type_name: &'static str,
}

#[derive(Deserialize)]
struct StatementResponse {
    status: StatusBlock,
    #[serde(default)]
    manifest: Option<ManifestBlock>,
    #[serde(default)]
    result: Option<ResultBlock>,
}

#[derive(Deserialize)]
struct StatusBlock {
    state: String,
    #[serde(default)]
    error: Option<ErrorBlock>,
}

#[derive(Deserialize)]
struct ErrorBlock {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct ManifestBlock {
    schema: SchemaBlock,
}

#[derive(Deserialize)]
struct SchemaBlock {
    #[serde(default)]
    columns: Vec<ColumnBlock>,
}

#[derive(Deserialize)]
struct ColumnBlock {
    name: String,
}

#[derive(Deserialize)]
struct ResultBlock {
    #[serde(default)]
    data_array: Option<Vec<Vec<serde_json::Value>>>,
}

fn coerce_cell(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

// ─── Executor ──────────────────────────────────────────────────────────────

/// Client for the warehouse statement API.
pub struct StatementExecutor {
    client: Client,
    statements_url: String,
    warehouse_id: String,
}

impl StatementExecutor {
    pub fn new(config: &WarehouseConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            statements_url: config.statements_url(),
            warehouse_id: config.warehouse_id.clone(),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::new(&WarehouseConfig::from_env())
    }

    /// Execute one statement and wait for its inline result.
    ///
    /// The only success state is `SUCCEEDED`; every other terminal state is
    /// a backend rejection carrying the server's message. There is no retry:
    /// a failure here fails the whole caller operation.
    #[instrument(skip(self, token, statement), fields(subsystem = "warehouse", component = "executor", op = "execute", token_source = %token.source()))]
    pub async fn execute(&self, token: &AccessToken, statement: &Statement) -> Result<RowSet> {
        let start = Instant::now();

        let request = StatementRequest {
            statement: statement.text(),
            warehouse_id: &self.warehouse_id,
            format: "JSON_ARRAY",
            disposition: "INLINE",
            parameters: statement
                .parameters()
                .iter()
                .map(|p| WireParameter {
                    name: &p.name,
                    value: p.value.as_deref(),
                    type_name: "STRING",
                })
                .collect(),
        };

        let response = self
            .client
            .post(&self.statements_url)
            .header("Authorization", format!("Bearer {}", token.secret()))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Statement request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "Warehouse returned {}: {}",
                status, body
            )));
        }

        let result: StatementResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse response: {}", e)))?;

        if result.status.state != "SUCCEEDED" {
            let message = result
                .status
                .error
                .map(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "no error message".to_string());
            return Err(Error::Backend(format!(
                "Statement {}: {}",
                result.status.state, message
            )));
        }

        let columns = result
            .manifest
            .map(|m| m.schema.columns.into_iter().map(|c| c.name).collect())
            .unwrap_or_default();
        let rows = result
            .result
            .and_then(|r| r.data_array)
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(coerce_cell).collect())
            .collect::<Vec<Vec<Option<String>>>>();

        let row_set = RowSet { columns, rows };
        let elapsed = start.elapsed().as_millis();

        debug!(
            row_count = row_set.len(),
            duration_ms = elapsed as u64,
            "Statement complete"
        );
        if elapsed > SLOW_STATEMENT_MS {
            warn!(
                duration_ms = elapsed as u64,
                slow = true,
                "Slow statement execution"
            );
        }
        Ok(row_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // Statement Builder Tests
    // ==========================================================================

    #[test]
    fn test_statement_builder_collects_parameters() {
        let statement = Statement::new("SELECT * FROM t WHERE a = :a AND b = :b")
            .bind("a", Some("1".to_string()))
            .bind("b", None);
        assert_eq!(statement.parameters().len(), 2);
        assert_eq!(statement.parameters()[0].value.as_deref(), Some("1"));
        assert_eq!(statement.parameters()[1].value, None);
    }

    // ==========================================================================
    // Wire Format Tests
    // ==========================================================================

    #[test]
    fn test_request_serialization_without_parameters() {
        let request = StatementRequest {
            statement: "SELECT 1",
            warehouse_id: "wh1",
            format: "JSON_ARRAY",
            disposition: "INLINE",
            parameters: Vec::new(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"statement\":\"SELECT 1\""));
        assert!(json.contains("\"warehouse_id\":\"wh1\""));
        assert!(json.contains("\"format\":\"JSON_ARRAY\""));
        assert!(json.contains("\"disposition\":\"INLINE\""));
        assert!(!json.contains("parameters"));
    }

    #[test]
    fn test_request_serialization_binds_null() {
        let request = StatementRequest {
            statement: "SELECT :p",
            warehouse_id: "wh1",
            format: "JSON_ARRAY",
            disposition: "INLINE",
            parameters: vec![WireParameter {
                name: "p",
                value: None,
                type_name: "STRING",
            }],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"name\":\"p\""));
        assert!(json.contains("\"value\":null"));
        assert!(json.contains("\"type\":\"STRING\""));
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "statement_id": "01f0",
            "status": {"state": "SUCCEEDED"},
            "manifest": {"schema": {"columns": [{"name": "id"}, {"name": "title"}]}},
            "result": {"data_array": [["1", "Demo X"], ["2", null]]}
        }"#;
        let response: StatementResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status.state, "SUCCEEDED");
        let manifest = response.manifest.unwrap();
        assert_eq!(manifest.schema.columns.len(), 2);
        let rows = response.result.unwrap().data_array.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_response_deserialization_failed_state() {
        let json = r#"{
            "status": {"state": "FAILED", "error": {"message": "TABLE_OR_VIEW_NOT_FOUND"}}
        }"#;
        let response: StatementResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status.state, "FAILED");
        assert_eq!(
            response.status.error.unwrap().message,
            "TABLE_OR_VIEW_NOT_FOUND"
        );
    }

    // ==========================================================================
    // Cell Coercion Tests
    // ==========================================================================

    #[test]
    fn test_coerce_cell_null() {
        assert_eq!(coerce_cell(serde_json::Value::Null), None);
    }

    #[test]
    fn test_coerce_cell_string() {
        let value = serde_json::Value::String("hello".to_string());
        assert_eq!(coerce_cell(value).as_deref(), Some("hello"));
    }

    #[test]
    fn test_coerce_cell_number_stringified() {
        let value = serde_json::json!(42);
        assert_eq!(coerce_cell(value).as_deref(), Some("42"));
    }

    // ==========================================================================
    // RowSet Tests
    // ==========================================================================

    fn sample_rows() -> RowSet {
        RowSet {
            columns: vec!["id".to_string(), "title".to_string()],
            rows: vec![
                vec![Some("1".to_string()), Some("Demo X".to_string())],
                vec![Some("2".to_string()), None],
            ],
        }
    }

    #[test]
    fn test_rowset_value_by_column_name() {
        let rows = sample_rows();
        assert_eq!(rows.value(0, "title"), Some("Demo X"));
        assert_eq!(rows.value(1, "id"), Some("2"));
    }

    #[test]
    fn test_rowset_null_and_missing_both_absent() {
        let rows = sample_rows();
        assert_eq!(rows.value(1, "title"), None);
        assert_eq!(rows.value(0, "no_such_column"), None);
        assert_eq!(rows.value(9, "id"), None);
    }

    #[test]
    fn test_rowset_first_value() {
        let rows = sample_rows();
        assert_eq!(rows.first_value("id"), Some("1"));
        assert!(RowSet::default().first_value("id").is_none());
    }

    #[test]
    fn test_rowset_len() {
        assert_eq!(sample_rows().len(), 2);
        assert!(!sample_rows().is_empty());
        assert!(RowSet::default().is_empty());
    }
}
