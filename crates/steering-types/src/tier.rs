use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IdError;

/// Impact ranking assigned to a category.
///
/// Variants are declared from most to least severe, so the derived `Ord`
/// sorts `Critical` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum PriorityTier {
    Critical,
    High,
    MediumHigh,
    Medium,
    LowMedium,
    Low,
}

impl PriorityTier {
    /// All tiers, most severe first
    pub const ALL: [PriorityTier; 6] = [
        PriorityTier::Critical,
        PriorityTier::High,
        PriorityTier::MediumHigh,
        PriorityTier::Medium,
        PriorityTier::LowMedium,
        PriorityTier::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityTier::Critical => "CRITICAL",
            PriorityTier::High => "HIGH",
            PriorityTier::MediumHigh => "MEDIUM-HIGH",
            PriorityTier::Medium => "MEDIUM",
            PriorityTier::LowMedium => "LOW-MEDIUM",
            PriorityTier::Low => "LOW",
        }
    }

    /// True when `self` is at least as severe as `other`
    pub fn is_at_least(&self, other: PriorityTier) -> bool {
        *self <= other
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityTier {
    type Err = IdError;

    /// Parse a tier label. Case, and the choice of `-`, `_` or a space
    /// between words, are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                c => c.to_ascii_uppercase(),
            })
            .collect();

        PriorityTier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == normalized)
            .ok_or_else(|| IdError::UnknownTier {
                label: s.trim().to_string(),
            })
    }
}
