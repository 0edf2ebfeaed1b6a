//! Steering Power Library
//!
//! Loads powers (an index document plus a directory of steering files) and
//! serves the `readSteering` retrieval contract over them.
//!
//! ## Features
//!
//! - Catalog loaded eagerly, steering documents eagerly or on first request
//! - At-most-once document loading under concurrent first access
//! - Integrity report for catalog entries without documents and vice versa
//! - Registry of powers discovered from user and project directories
//! - Immutable after construction; share freely across threads

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod error;
pub mod power;
pub mod registry;
pub mod source;
pub mod store;

pub use error::{IntegrityWarning, PowerError, SteeringError};
pub use power::{Activation, Power};
pub use registry::{DiscoveryReport, PowerRegistry, SkippedPower};
pub use source::{DirectorySource, DocumentSource, MemorySource};
pub use store::{DocumentStore, IntegrityReport, LoadMode};

/// Index document every power directory carries
pub const INDEX_FILE: &str = "POWER.md";

/// Subdirectory holding steering documents
pub const STEERING_DIR: &str = "steering";

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{LoadMode, Power, PowerError, PowerRegistry, SteeringError};
}
