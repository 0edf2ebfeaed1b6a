//! Error types for index parsing and catalog lookups

use steering_types::{Category, PriorityTier};
use thiserror::Error;

/// Load-time integrity errors. Any of these means the index cannot back a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Index document has no YAML frontmatter block
    #[error("No valid YAML frontmatter found")]
    MissingFrontmatter,

    /// Frontmatter is present but is not valid YAML for a manifest
    #[error("Failed to parse YAML frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),

    /// Manifest field failed validation
    #[error("Invalid manifest field '{field}': {reason}")]
    InvalidManifest {
        /// Field name as written in the frontmatter
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Heading declares a tier but names no known category
    #[error("Unknown category '{label}' at line {line}")]
    UnknownCategory {
        /// Label as written in the heading
        label: String,
        /// 1-based line number
        line: usize,
    },

    /// Heading names a known category with a tier that is not its own
    #[error("Category '{category}' declared as {declared} at line {line}, expected {expected}")]
    TierMismatch {
        /// Category named by the heading
        category: Category,
        /// Tier written in the heading
        declared: PriorityTier,
        /// Canonical tier of the category
        expected: PriorityTier,
        /// 1-based line number
        line: usize,
    },

    /// Same category heading appears twice
    #[error("Category '{category}' declared twice (lines {first_line} and {second_line})")]
    DuplicateCategory {
        /// Repeated category
        category: Category,
        /// Line of the first declaration
        first_line: usize,
        /// Line of the repeated declaration
        second_line: usize,
    },

    /// Entry line cannot be read as `(id, summary)`
    #[error("Malformed entry in '{category}' at line {line}: {reason} (entry: {entry})")]
    MalformedEntry {
        /// Category section containing the entry
        category: Category,
        /// 1-based line number
        line: usize,
        /// Offending line, trimmed
        entry: String,
        /// Why the entry was rejected
        reason: String,
    },

    /// Rule id listed more than once
    #[error(
        "Duplicate rule id '{id}': first in '{first_category}' (line {first_line}), \
         again in '{second_category}' (line {second_line})"
    )]
    DuplicateId {
        /// Repeated id
        id: String,
        /// Category of the first occurrence
        first_category: Category,
        /// Line of the first occurrence
        first_line: usize,
        /// Category of the repeated occurrence
        second_category: Category,
        /// Line of the repeated occurrence
        second_line: usize,
    },

    /// Internal pattern failed to compile
    #[error("Failed to compile pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Per-call lookup errors; the catalog stays valid after any of these
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No descriptor carries this id
    #[error("Rule '{id}' not found in catalog")]
    DescriptorNotFound {
        /// Requested id
        id: String,
    },

    /// Category label is not part of the fixed set
    #[error("Unknown category '{label}'")]
    UnknownCategory {
        /// Requested label
        label: String,
    },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, CatalogError>;
