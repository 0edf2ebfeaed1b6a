//! Read-only rule catalog and its queries

use serde::Serialize;
use std::collections::HashMap;
use steering_types::{Category, PriorityTier, RuleDescriptor, RuleId};
use tracing::debug;

use crate::error::{CatalogError, LookupError, Result};
use crate::parser::parse_sections;

#[derive(Debug, Clone)]
struct Section {
    category: Category,
    start: usize,
    end: usize,
}

/// One category as reported by [`Catalog::categories_by_priority`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// The category
    pub category: Category,
    /// Its priority tier
    pub tier: PriorityTier,
    /// Its fixed rank among all categories
    pub rank: u8,
    /// Number of rules declared under it
    pub rule_count: usize,
}

/// Validated, immutable set of rule descriptors grouped by category.
///
/// Descriptors are stored contiguously per category in declared order, so
/// [`Catalog::rules_in`] hands out slices without copying.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    descriptors: Vec<RuleDescriptor>,
    sections: Vec<Section>,
    by_id: HashMap<RuleId, usize>,
}

impl Catalog {
    /// Parse index content into a catalog.
    ///
    /// Fails on the first integrity error (unknown category, malformed entry,
    /// duplicate id); no partial catalog is returned.
    pub fn parse(content: &str) -> Result<Self> {
        let raw_sections = parse_sections(content)?;

        let mut descriptors = Vec::new();
        let mut sections = Vec::with_capacity(raw_sections.len());
        let mut by_id: HashMap<RuleId, usize> = HashMap::new();
        let mut first_seen: HashMap<RuleId, (Category, usize)> = HashMap::new();

        for raw in raw_sections {
            let start = descriptors.len();
            for (position, entry) in raw.entries.into_iter().enumerate() {
                if let Some(&(first_category, first_line)) = first_seen.get(&entry.id) {
                    return Err(CatalogError::DuplicateId {
                        id: entry.id.to_string(),
                        first_category,
                        first_line,
                        second_category: raw.category,
                        second_line: entry.line,
                    });
                }
                first_seen.insert(entry.id.clone(), (raw.category, entry.line));
                by_id.insert(entry.id.clone(), descriptors.len());
                descriptors.push(RuleDescriptor::new(
                    entry.id,
                    raw.category,
                    entry.summary,
                    position,
                ));
            }
            sections.push(Section {
                category: raw.category,
                start,
                end: descriptors.len(),
            });
        }

        debug!(
            "Parsed catalog with {} rules in {} categories",
            descriptors.len(),
            sections.len()
        );

        Ok(Self {
            descriptors,
            sections,
            by_id,
        })
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if the catalog has no rules
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// All descriptors, grouped by category in declared order
    pub fn iter(&self) -> impl Iterator<Item = &RuleDescriptor> {
        self.descriptors.iter()
    }

    /// All rule ids, grouped by category in declared order
    pub fn ids(&self) -> impl Iterator<Item = &RuleId> {
        self.descriptors.iter().map(|d| &d.id)
    }

    /// Check whether an id is part of the catalog
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Get a descriptor by id
    pub fn get(&self, id: &str) -> Option<&RuleDescriptor> {
        self.by_id.get(id).map(|&idx| &self.descriptors[idx])
    }

    /// Look up a descriptor by id, failing with `DescriptorNotFound`
    pub fn descriptor(&self, id: &str) -> std::result::Result<&RuleDescriptor, LookupError> {
        self.get(id).ok_or_else(|| LookupError::DescriptorNotFound { id: id.to_string() })
    }

    /// Resolve a raw string to the catalog's own key
    pub fn resolve(&self, id: &str) -> std::result::Result<&RuleId, LookupError> {
        self.descriptor(id).map(|d| &d.id)
    }

    /// Rules of one category in declared order; empty if the index never
    /// declared the category
    pub fn rules_in(&self, category: Category) -> &[RuleDescriptor] {
        self.sections
            .iter()
            .find(|s| s.category == category)
            .map(|s| &self.descriptors[s.start..s.end])
            .unwrap_or_default()
    }

    /// Rules of a category given by its label
    pub fn rules_in_label(&self, label: &str) -> std::result::Result<&[RuleDescriptor], LookupError> {
        let category = label
            .parse::<Category>()
            .map_err(|_| LookupError::UnknownCategory {
                label: label.trim().to_string(),
            })?;
        Ok(self.rules_in(category))
    }

    /// Categories declared by the index, in declared order
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.sections.iter().map(|s| s.category)
    }

    /// Declared categories ordered CRITICAL first, rank breaking ties.
    /// Input order of the index has no influence.
    pub fn categories_by_priority(&self) -> Vec<CategorySummary> {
        let mut summaries: Vec<CategorySummary> = self
            .sections
            .iter()
            .map(|s| CategorySummary {
                category: s.category,
                tier: s.category.tier(),
                rank: s.category.rank(),
                rule_count: s.end - s.start,
            })
            .collect();
        summaries.sort_by_key(|s| s.category.priority_key());
        summaries
    }

    /// Rules whose tier is at least as severe as `tier`, in priority order
    pub fn rules_at_or_above(&self, tier: PriorityTier) -> Vec<&RuleDescriptor> {
        self.categories_by_priority()
            .into_iter()
            .filter(|s| s.tier.is_at_least(tier))
            .flat_map(|s| self.rules_in(s.category))
            .collect()
    }

    /// Render the index for an LLM system prompt
    /// Format:
    /// ## Eliminating Waterfalls (CRITICAL)
    /// - async-defer-await: Move await into branches where actually used
    pub fn render_index(&self) -> String {
        if self.is_empty() {
            return "No rules available".to_string();
        }

        let mut out = String::from("Rules by priority (load one with readSteering):\n");
        for summary in self.categories_by_priority() {
            let rules = self.rules_in(summary.category);
            if rules.is_empty() {
                continue;
            }
            out.push_str(&format!("\n## {} ({})\n", summary.category, summary.tier));
            for rule in rules {
                out.push_str(&rule.to_summary_line());
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const WATERFALLS: &str = "\
### 1. Eliminating Waterfalls (CRITICAL)
| Rule | Description |
|------|-------------|
| `async-defer-await` | Move await into branches where actually used |
| `async-parallel` | Use Promise.all() for independent operations |
";

    #[test]
    fn test_parse_keeps_declared_order() {
        let catalog = Catalog::parse(WATERFALLS).unwrap();
        let ids: Vec<_> = catalog
            .rules_in(Category::EliminatingWaterfalls)
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ids, vec!["async-defer-await", "async-parallel"]);
        assert_eq!(catalog.get("async-parallel").unwrap().position, 1);
        assert_eq!(
            catalog.get("async-parallel").unwrap().tier,
            PriorityTier::Critical
        );
    }

    #[test]
    fn test_duplicate_within_category() {
        let content = format!("{WATERFALLS}| `async-parallel` | Again |\n");
        let err = Catalog::parse(&content).unwrap_err();
        match err {
            CatalogError::DuplicateId {
                id,
                first_line,
                second_line,
                ..
            } => {
                assert_eq!(id, "async-parallel");
                assert_eq!(first_line, 5);
                assert_eq!(second_line, 6);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_across_categories() {
        let content = format!(
            "{WATERFALLS}\n## Advanced Patterns (LOW)\n- `async-parallel` - Same id, other category\n"
        );
        assert!(matches!(
            Catalog::parse(&content),
            Err(CatalogError::DuplicateId {
                first_category: Category::EliminatingWaterfalls,
                second_category: Category::AdvancedPatterns,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_category() {
        let content = "## CSS Tricks (HIGH)\n- `css-grid` - Prefer grid\n";
        match Catalog::parse(content) {
            Err(CatalogError::UnknownCategory { label, line }) => {
                assert_eq!(label, "CSS Tricks");
                assert_eq!(line, 1);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_tier_mismatch() {
        let content = "## Advanced Patterns (CRITICAL)\n";
        assert!(matches!(
            Catalog::parse(content),
            Err(CatalogError::TierMismatch {
                category: Category::AdvancedPatterns,
                declared: PriorityTier::Critical,
                expected: PriorityTier::Low,
                line: 1,
            })
        ));
    }

    #[test]
    fn test_duplicate_category() {
        let content = "## Advanced Patterns (LOW)\n\n## Advanced Patterns (LOW)\n";
        assert!(matches!(
            Catalog::parse(content),
            Err(CatalogError::DuplicateCategory {
                first_line: 1,
                second_line: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_entries() {
        for content in [
            "## Advanced Patterns (LOW)\n| only-one-cell |\n",
            "## Advanced Patterns (LOW)\n| Bad Id | summary |\n",
            "## Advanced Patterns (LOW)\n| `advanced-use-latest` |  |\n",
            "## Advanced Patterns (LOW)\n- `advanced-use-latest`\n",
        ] {
            match Catalog::parse(content) {
                Err(CatalogError::MalformedEntry { category, line, .. }) => {
                    assert_eq!(category, Category::AdvancedPatterns);
                    assert_eq!(line, 2);
                }
                other => panic!("{content:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn test_categories_by_priority_ignores_input_order() {
        let content = "\
## JavaScript Performance (LOW-MEDIUM)
- `js-early-exit` - Return early from functions

## Advanced Patterns (LOW)
- `advanced-use-latest` - useLatest for stable callback refs

## Client-Side Data Fetching (MEDIUM-HIGH)
- `client-swr-dedup` - Use SWR for automatic request deduplication

## Bundle Size Optimization (CRITICAL)
- `bundle-barrel-imports` - Import directly, avoid barrel files

## Server-Side Performance (HIGH)

## Eliminating Waterfalls (CRITICAL)
- `async-parallel` - Use Promise.all() for independent operations
";
        let catalog = Catalog::parse(content).unwrap();
        let order: Vec<_> = catalog
            .categories_by_priority()
            .into_iter()
            .map(|s| s.category)
            .collect();
        assert_eq!(
            order,
            vec![
                Category::EliminatingWaterfalls,
                Category::BundleSizeOptimization,
                Category::ServerSidePerformance,
                Category::ClientSideDataFetching,
                Category::JavaScriptPerformance,
                Category::AdvancedPatterns,
            ]
        );
        let tiers: Vec<_> = catalog
            .categories_by_priority()
            .into_iter()
            .map(|s| s.tier)
            .collect();
        let mut sorted = tiers.clone();
        sorted.sort();
        assert_eq!(tiers, sorted);

        let server = catalog
            .categories_by_priority()
            .into_iter()
            .find(|s| s.category == Category::ServerSidePerformance)
            .unwrap();
        assert_eq!(server.rule_count, 0);
    }

    #[test]
    fn test_rules_at_or_above() {
        let content = "\
## Advanced Patterns (LOW)
- `advanced-use-latest` - useLatest for stable callback refs
## Server-Side Performance (HIGH)
- `server-cache-react` - Use React.cache() for per-request deduplication
## Eliminating Waterfalls (CRITICAL)
- `async-parallel` - Use Promise.all() for independent operations
";
        let catalog = Catalog::parse(content).unwrap();
        let ids: Vec<_> = catalog
            .rules_at_or_above(PriorityTier::High)
            .into_iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ids, vec!["async-parallel", "server-cache-react"]);
    }

    #[test]
    fn test_lookups() {
        let catalog = Catalog::parse(WATERFALLS).unwrap();
        assert!(catalog.contains("async-parallel"));
        assert_eq!(catalog.resolve("async-parallel").unwrap().as_str(), "async-parallel");
        assert_eq!(
            catalog.descriptor("nonexistent-rule"),
            Err(LookupError::DescriptorNotFound {
                id: "nonexistent-rule".to_string()
            })
        );
        assert_eq!(
            catalog.rules_in_label("eliminating waterfalls").unwrap().len(),
            2
        );
        assert!(catalog.rules_in_label("Nope").is_err());
        assert!(catalog.rules_in(Category::AdvancedPatterns).is_empty());
    }

    #[test]
    fn test_render_index() {
        let catalog = Catalog::parse(WATERFALLS).unwrap();
        let rendered = catalog.render_index();
        assert!(rendered.contains("## Eliminating Waterfalls (CRITICAL)"));
        assert!(rendered
            .contains("- async-parallel: Use Promise.all() for independent operations"));
        assert_eq!(Catalog::default().render_index(), "No rules available");
    }
}
