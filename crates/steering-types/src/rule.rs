use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::category::Category;
use crate::error::IdError;
use crate::tier::PriorityTier;
use crate::MAX_ID_LENGTH;

/// Validated rule identifier (kebab-case, lowercase ASCII).
///
/// Catalogs and document stores are keyed by `RuleId`, so a raw string has
/// to pass through [`RuleId::parse`] before it can address anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleId(String);

impl RuleId {
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        let invalid = |reason| IdError::InvalidRuleId {
            id: raw.to_string(),
            reason,
        };

        if raw.is_empty() {
            return Err(invalid("id cannot be empty"));
        }
        if raw.len() > MAX_ID_LENGTH {
            return Err(invalid("id exceeds 64 characters"));
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(invalid(
                "id must contain only lowercase letters, numbers, and hyphens",
            ));
        }
        if raw.starts_with('-') || raw.ends_with('-') {
            return Err(invalid("id cannot start or end with a hyphen"));
        }
        if raw.contains("--") {
            return Err(invalid("id cannot contain consecutive hyphens"));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RuleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RuleId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RuleId::parse(&value)
    }
}

impl From<RuleId> for String {
    fn from(id: RuleId) -> Self {
        id.0
    }
}

/// One best-practice rule as listed in a power's index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDescriptor {
    pub id: RuleId,
    pub category: Category,
    pub tier: PriorityTier,
    pub summary: String,
    /// Declared position inside the category, starting at 0
    pub position: usize,
}

impl RuleDescriptor {
    pub fn new(id: RuleId, category: Category, summary: impl Into<String>, position: usize) -> Self {
        Self {
            id,
            tier: category.tier(),
            category,
            summary: summary.into(),
            position,
        }
    }

    /// Format: "- {id}: {summary}"
    pub fn to_summary_line(&self) -> String {
        format!("- {}: {}", self.id, self.summary)
    }
}
