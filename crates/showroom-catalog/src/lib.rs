//! # showroom-catalog
//!
//! Catalog layer for showroom: typed record operations over the warehouse
//! statement API.
//!
//! This crate provides:
//! - A [`store::WarehouseRecordStore`] owning statement construction and
//!   value binding for record CRUD
//! - The creation protocol for a backend that returns no generated key
//! - Ownership-gated mutations with a confirm-to-override workflow
//! - Paginated listing with silent input sanitation
//! - Per-viewer browse state with a single-slot detail memo
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use showroom_catalog::{CatalogView, WarehouseRecordStore};
//! use showroom_warehouse::{CredentialResolver, StatementExecutor, WarehouseConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WarehouseConfig::from_env();
//!     let executor = Arc::new(StatementExecutor::new(&config));
//!     let resolver = CredentialResolver::new(executor.clone(), &config);
//!
//!     let context = showroom_core::RequestContext::anonymous();
//!     let token = resolver.resolve(&context).await?;
//!     let store = WarehouseRecordStore::new(executor, token)
//!         .with_table(config.records_table.clone());
//!
//!     let page = CatalogView::new(&store).list(Some("1"), None, None).await?;
//!     println!("{} records of {}", page.len(), page.total_count);
//!     Ok(())
//! }
//! ```

pub mod create;
pub mod gate;
pub mod memory;
pub mod session;
pub mod sql;
pub mod store;
pub mod view;

pub use create::CreateReconciler;
pub use gate::{AccessDecision, MutationAction, MutationWorkflow, OwnershipGate, WorkflowState, WorkflowStep};
pub use memory::MemoryRecordStore;
pub use session::{BrowseSession, DetailCache};
pub use sql::{array_literal, quote_literal, BackendCapabilities, ValueBinder};
pub use store::WarehouseRecordStore;
pub use view::{total_pages, CatalogPage, CatalogView};
