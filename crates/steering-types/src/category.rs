use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IdError;
use crate::tier::PriorityTier;

/// Rule category. The set is closed; an index naming anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Eliminating Waterfalls")]
    EliminatingWaterfalls,
    #[serde(rename = "Bundle Size Optimization")]
    BundleSizeOptimization,
    #[serde(rename = "Server-Side Performance")]
    ServerSidePerformance,
    #[serde(rename = "Client-Side Data Fetching")]
    ClientSideDataFetching,
    #[serde(rename = "Re-render Optimization")]
    RerenderOptimization,
    #[serde(rename = "Rendering Performance")]
    RenderingPerformance,
    #[serde(rename = "JavaScript Performance")]
    JavaScriptPerformance,
    #[serde(rename = "Advanced Patterns")]
    AdvancedPatterns,
}

impl Category {
    /// All categories in rank order
    pub const ALL: [Category; 8] = [
        Category::EliminatingWaterfalls,
        Category::BundleSizeOptimization,
        Category::ServerSidePerformance,
        Category::ClientSideDataFetching,
        Category::RerenderOptimization,
        Category::RenderingPerformance,
        Category::JavaScriptPerformance,
        Category::AdvancedPatterns,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::EliminatingWaterfalls => "Eliminating Waterfalls",
            Category::BundleSizeOptimization => "Bundle Size Optimization",
            Category::ServerSidePerformance => "Server-Side Performance",
            Category::ClientSideDataFetching => "Client-Side Data Fetching",
            Category::RerenderOptimization => "Re-render Optimization",
            Category::RenderingPerformance => "Rendering Performance",
            Category::JavaScriptPerformance => "JavaScript Performance",
            Category::AdvancedPatterns => "Advanced Patterns",
        }
    }

    /// Canonical priority tier of the category
    pub fn tier(&self) -> PriorityTier {
        match self {
            Category::EliminatingWaterfalls | Category::BundleSizeOptimization => {
                PriorityTier::Critical
            }
            Category::ServerSidePerformance => PriorityTier::High,
            Category::ClientSideDataFetching => PriorityTier::MediumHigh,
            Category::RerenderOptimization | Category::RenderingPerformance => {
                PriorityTier::Medium
            }
            Category::JavaScriptPerformance => PriorityTier::LowMedium,
            Category::AdvancedPatterns => PriorityTier::Low,
        }
    }

    /// 1-based rank among all categories; breaks ties inside a tier
    pub fn rank(&self) -> u8 {
        match self {
            Category::EliminatingWaterfalls => 1,
            Category::BundleSizeOptimization => 2,
            Category::ServerSidePerformance => 3,
            Category::ClientSideDataFetching => 4,
            Category::RerenderOptimization => 5,
            Category::RenderingPerformance => 6,
            Category::JavaScriptPerformance => 7,
            Category::AdvancedPatterns => 8,
        }
    }

    /// Conventional prefix of rule ids filed under this category
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Category::EliminatingWaterfalls => "async-",
            Category::BundleSizeOptimization => "bundle-",
            Category::ServerSidePerformance => "server-",
            Category::ClientSideDataFetching => "client-",
            Category::RerenderOptimization => "rerender-",
            Category::RenderingPerformance => "rendering-",
            Category::JavaScriptPerformance => "js-",
            Category::AdvancedPatterns => "advanced-",
        }
    }

    /// Sort key: tier first, rank second
    pub fn priority_key(&self) -> (PriorityTier, u8) {
        (self.tier(), self.rank())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| IdError::UnknownCategory {
                label: wanted.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_label() {
        assert_eq!(
            "eliminating waterfalls".parse::<Category>(),
            Ok(Category::EliminatingWaterfalls)
        );
        assert_eq!(
            "  Re-render Optimization ".parse::<Category>(),
            Ok(Category::RerenderOptimization)
        );
        assert_eq!(
            "CSS Tricks".parse::<Category>(),
            Err(IdError::UnknownCategory {
                label: "CSS Tricks".to_string()
            })
        );
    }

    #[test]
    fn test_ranks_follow_declaration() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.rank() as usize, i + 1);
        }
    }

    #[test]
    fn test_priority_key_is_monotonic() {
        let keys: Vec<_> = Category::ALL.iter().map(Category::priority_key).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_label_round_trip_through_serde() {
        let json = serde_json::to_string(&Category::ServerSidePerformance).unwrap();
        assert_eq!(json, "\"Server-Side Performance\"");
    }
}
