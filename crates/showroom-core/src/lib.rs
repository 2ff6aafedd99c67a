//! # showroom-core
//!
//! Core types, traits, and abstractions for the showroom catalog.
//!
//! This crate provides the foundational data structures and trait definitions
//! that other showroom crates depend on.

pub mod defaults;
pub mod document;
pub mod error;
pub mod identity;
pub mod logging;
pub mod models;
pub mod tags;
pub mod traits;

// Re-export commonly used types at crate root
pub use document::{render_info_md, PLACEHOLDER_ID};
pub use error::{Error, Result};
pub use identity::{is_valid_email, RequestContext, ANONYMOUS_EMAIL};
pub use models::*;
pub use tags::{normalize_products, products_display};
pub use traits::*;
