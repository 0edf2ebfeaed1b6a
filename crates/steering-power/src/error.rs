//! Error types for power loading and retrieval

use std::path::PathBuf;
use steering_catalog::{CatalogError, LookupError};
use steering_types::{IdError, RuleId};
use thiserror::Error;

/// Per-call retrieval errors. None of these affect later calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SteeringError {
    /// Power name does not match any loaded power
    #[error("Unknown power '{name}'")]
    UnknownPower {
        /// Requested power name
        name: String,
    },

    /// Steering file name does not follow the `<id>.md` convention
    #[error("Malformed request for '{file}': {reason}")]
    MalformedRequest {
        /// File name as requested
        file: String,
        /// Why it was rejected
        reason: String,
    },

    /// No document is known for this id
    #[error("Steering document '{id}' not found")]
    DocumentNotFound {
        /// Normalized rule id
        id: String,
    },

    /// No catalog descriptor carries this id
    #[error("Rule '{id}' not found in catalog")]
    DescriptorNotFound {
        /// Requested id
        id: String,
    },

    /// Document is catalogued but could not be read on demand
    #[error("Steering document '{id}' could not be read: {reason}")]
    DocumentUnreadable {
        /// Rule id
        id: String,
        /// Underlying failure
        reason: String,
    },

    /// Category label is not part of the fixed set
    #[error("Unknown category '{label}'")]
    UnknownCategory {
        /// Requested label
        label: String,
    },
}

impl SteeringError {
    /// Stable machine-readable error kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownPower { .. } => "unknown_power",
            Self::MalformedRequest { .. } => "malformed_request",
            Self::DocumentNotFound { .. } => "document_not_found",
            Self::DescriptorNotFound { .. } => "descriptor_not_found",
            Self::DocumentUnreadable { .. } => "document_unreadable",
            Self::UnknownCategory { .. } => "unknown_category",
        }
    }
}

impl From<LookupError> for SteeringError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::DescriptorNotFound { id } => Self::DescriptorNotFound { id },
            LookupError::UnknownCategory { label } => Self::UnknownCategory { label },
        }
    }
}

impl From<IdError> for SteeringError {
    fn from(err: IdError) -> Self {
        match err {
            IdError::MalformedSteeringFile { file, reason } => {
                Self::MalformedRequest { file, reason }
            }
            IdError::InvalidRuleId { id, reason } => Self::MalformedRequest {
                file: id,
                reason: reason.to_string(),
            },
            IdError::UnknownCategory { label } => Self::UnknownCategory { label },
            IdError::UnknownTier { label } => Self::MalformedRequest {
                file: label,
                reason: "unknown priority tier".to_string(),
            },
        }
    }
}

/// Load-time errors; the affected power is not exposed
#[derive(Debug, Error)]
pub enum PowerError {
    /// Directory has no index document
    #[error("{} not found in {}", crate::INDEX_FILE, .path.display())]
    MissingIndex {
        /// Power directory
        path: PathBuf,
    },

    /// Index document failed validation
    #[error("Invalid index {}: {source}", .path.display())]
    Catalog {
        /// Index document path
        path: PathBuf,
        /// Integrity error
        #[source]
        source: CatalogError,
    },

    /// Filesystem failure
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A power with the same name is already registered
    #[error("Power '{name}' is already registered")]
    DuplicatePower {
        /// Conflicting power name
        name: String,
    },
}

/// Non-fatal integrity findings reported when a store is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityWarning {
    /// Catalog descriptor without a usable document; requests for it fail
    CatalogMismatch {
        /// Rule id named by the catalog
        id: RuleId,
        /// Where the document was expected
        location: String,
        /// What was wrong with it
        reason: String,
    },
    /// Document that no catalog descriptor names; it is not retrievable
    OrphanDocument {
        /// Document name without extension
        id: String,
        /// Where it was found
        location: String,
    },
}

impl std::fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CatalogMismatch {
                id,
                location,
                reason,
            } => write!(f, "catalog rule '{id}' has no usable document at {location}: {reason}"),
            Self::OrphanDocument { id, location } => {
                write!(f, "document '{id}' at {location} is not listed in the catalog")
            }
        }
    }
}

/// Convenient Result type alias for retrieval
pub type Result<T> = std::result::Result<T, SteeringError>;
