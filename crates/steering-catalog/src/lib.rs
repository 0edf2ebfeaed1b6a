//! Steering Catalog
//!
//! Parses a power's index document (`POWER.md`) into a validated, read-only
//! rule catalog.
//!
//! ## Index format
//!
//! - Optional YAML frontmatter carrying the power manifest (name, description)
//! - Category headings of the form `### 1. Eliminating Waterfalls (CRITICAL)`
//! - Under each category, an ordered list of entries, either as table rows
//!   (`| async-parallel | Use Promise.all() for independent operations |`)
//!   or as list items (`` - `async-parallel` - Use Promise.all() ... ``)
//!
//! Everything else in the document is opaque prose and is not interpreted.

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod catalog;
pub mod error;
pub mod manifest;
mod parser;

pub use catalog::{Catalog, CategorySummary};
pub use error::{CatalogError, LookupError};
pub use manifest::{PowerIndex, PowerManifest};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Catalog, CatalogError, LookupError, PowerIndex, PowerManifest};
}
