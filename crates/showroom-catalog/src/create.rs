//! Record creation against a backend that returns no generated key.
//!
//! The warehouse insert gives nothing back, and there is no transaction to
//! wrap an insert and a key lookup together. Creation therefore runs as a
//! three-statement protocol:
//!
//! 1. Insert the full row. The composite document goes in bearing a
//!    placeholder identifier, with a fresh creation/update timestamp pair.
//! 2. Read the maximum identifier over the whole table and adopt it as this
//!    record's identifier.
//! 3. Regenerate the composite document with the real identifier and
//!    rewrite exactly that one column.
//!
//! Known limitation: steps 1 and 2 are not atomic. With two concurrent
//! creators, the maximum-identifier read can observe the other writer's
//! row, and the patch in step 3 then pairs a document with the wrong row.
//! Nothing on the client side can close this window; deployments with more
//! than one concurrent writer need a backend that returns generated keys,
//! or identifiers assigned before the insert.

use chrono::Utc;
use tracing::{info, warn};

use showroom_core::{render_info_md, CreateOutcome, RecordDraft, Result};
use showroom_warehouse::Statement;

use crate::sql::ValueBinder;
use crate::store::{WarehouseRecordStore, SQL_TIMESTAMP_FORMAT};

/// Runs the insert-then-identify-then-patch protocol for one creation.
pub struct CreateReconciler<'a> {
    store: &'a WarehouseRecordStore,
}

impl<'a> CreateReconciler<'a> {
    pub fn new(store: &'a WarehouseRecordStore) -> Self {
        Self { store }
    }

    /// Create a record and resolve its identifier.
    ///
    /// Degrades to [`CreateOutcome::CreatedIdUnknown`] when the identifier
    /// cannot be resolved: the row exists by that point, and reporting a
    /// failure would tell the caller otherwise.
    pub async fn create(&self, draft: &RecordDraft) -> Result<CreateOutcome> {
        let capabilities = self.store.capabilities();
        let now = Utc::now();
        let stamp = now.format(SQL_TIMESTAMP_FORMAT).to_string();

        let placeholder_doc = capabilities
            .supports_composite_document
            .then(|| render_info_md(None, draft, Some(now), Some(now)));

        let inserted = self
            .store
            .execute(
                self.store
                    .build_insert(draft, placeholder_doc.as_deref(), &stamp),
            )
            .await?;

        let resolved = if capabilities.requires_post_insert_id_lookup {
            let lookup = self
                .store
                .execute(Statement::new(format!(
                    "SELECT MAX(id) AS last_id FROM {}",
                    self.store.table()
                )))
                .await?;
            lookup
                .first_value("last_id")
                .and_then(|v| v.trim().parse::<i64>().ok())
        } else {
            // Backends that hand the generated key back with the insert
            // skip the racy maximum-identifier read entirely.
            inserted.first_value("id").and_then(|v| v.trim().parse::<i64>().ok())
        };

        let id = match resolved {
            Some(id) => id,
            None => {
                warn!("Record created but its identifier could not be resolved");
                return Ok(CreateOutcome::CreatedIdUnknown);
            }
        };

        if capabilities.supports_composite_document {
            let doc = render_info_md(Some(id), draft, Some(now), Some(now));
            self.store.execute(self.patch_document(id, doc)).await?;
        }

        info!(record_id = id, "Created record");
        Ok(CreateOutcome::Created(id))
    }

    /// Rewrite only the composite-document column for a known identifier.
    fn patch_document(&self, id: i64, info_md: String) -> Statement {
        let mut binder = ValueBinder::new(self.store.capabilities());
        let fragment = binder.push("info_md", Some(info_md));
        binder.into_statement(format!(
            "UPDATE {} SET info_md = {} WHERE id = {}",
            self.store.table(),
            fragment,
            id
        ))
    }
}
