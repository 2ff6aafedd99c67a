//! # showroom-warehouse
//!
//! Warehouse access layer for showroom.
//!
//! This crate provides:
//! - Statement execution against the warehouse's one-shot SQL API
//! - Request-scoped access tokens with provenance tags
//! - Service-principal OAuth client-credentials exchange
//! - Fail-closed token permission probing
//! - Per-request credential resolution across three strategies
//! - The chat/completion assistant client
//!
//! The warehouse offers no sessions, no transactions, and no generated-key
//! return; everything above this crate is designed around those absences.
//!
//! # Example
//!
//! ```rust,no_run
//! use showroom_core::identity::RequestContext;
//! use showroom_warehouse::{CredentialResolver, Statement, StatementExecutor, WarehouseConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> showroom_core::Result<()> {
//!     let config = WarehouseConfig::from_env();
//!     config.validate()?;
//!     let executor = Arc::new(StatementExecutor::new(&config));
//!     let resolver = CredentialResolver::new(executor.clone(), &config);
//!
//!     let ctx = RequestContext::anonymous();
//!     let token = resolver.resolve(&ctx).await?;
//!     let rows = executor.execute(&token, &Statement::new("SELECT 1 AS one")).await?;
//!     assert_eq!(rows.first_value("one"), Some("1"));
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod config;
pub mod executor;
pub mod oauth;
pub mod probe;
pub mod resolver;
pub mod token;

// Re-export commonly used types at crate root
pub use assistant::{AssistantClient, ChatMessage};
pub use config::WarehouseConfig;
pub use executor::{RowSet, Statement, StatementExecutor, StatementParameter};
pub use oauth::ServicePrincipal;
pub use probe::{PermissionProbe, PROBE_STATEMENT};
pub use resolver::CredentialResolver;
pub use token::{AccessToken, TokenSource};
