//! Power manifest and index document parsing
//!
//! `POWER.md` starts with YAML frontmatter describing the power, followed by
//! the rule index that [`Catalog::parse`] reads.

use regex::Regex;
use serde::{Deserialize, Serialize};
use steering_types::RuleId;
use tracing::warn;

use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};

/// Maximum recommended description length
const MAX_DESCRIPTION_LENGTH: usize = 1024;

/// Power metadata extracted from YAML frontmatter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerManifest {
    /// Power name; this is the namespace hosts pass to `readSteering`
    pub name: String,
    /// Human-readable name shown by hosts
    #[serde(default)]
    pub display_name: Option<String>,
    /// What the power covers and when to use it
    pub description: String,
    /// Activation keywords
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Author or maintainer
    #[serde(default)]
    pub author: Option<String>,
}

impl PowerManifest {
    /// Display name, falling back to the power name
    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    fn validate(&self) -> Result<()> {
        RuleId::parse(&self.name).map_err(|e| CatalogError::InvalidManifest {
            field: "name",
            reason: e.to_string(),
        })?;

        if self.description.trim().is_empty() {
            return Err(CatalogError::InvalidManifest {
                field: "description",
                reason: "description cannot be empty".to_string(),
            });
        }

        if self.description.len() > MAX_DESCRIPTION_LENGTH {
            warn!(
                "Power '{}' description exceeds {} characters (was {})",
                self.name,
                MAX_DESCRIPTION_LENGTH,
                self.description.len()
            );
        }

        Ok(())
    }
}

/// A parsed `POWER.md`: manifest plus catalog
#[derive(Debug, Clone)]
pub struct PowerIndex {
    /// Frontmatter metadata
    pub manifest: PowerManifest,
    /// Rules declared in the document body
    pub catalog: Catalog,
}

impl PowerIndex {
    /// Parse a complete index document. Pure; touches no files.
    pub fn parse(content: &str) -> Result<Self> {
        let yaml = split_frontmatter(content)?.ok_or(CatalogError::MissingFrontmatter)?;
        let manifest: PowerManifest = serde_yaml::from_str(yaml)?;
        manifest.validate()?;

        let catalog = Catalog::parse(content)?;
        Ok(Self { manifest, catalog })
    }
}

/// Return the YAML between the leading `---` fences, if the document has any
pub(crate) fn split_frontmatter(content: &str) -> Result<Option<&str>> {
    let frontmatter_re = Regex::new(r"^\x{FEFF}?---[ \t]*\r?\n((?s:.*?))\r?\n---[ \t]*(?:\r?\n|$)")?;

    Ok(frontmatter_re
        .captures(content)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use steering_types::Category;

    const INDEX: &str = r#"---
name: "react-best-practices"
displayName: "React Best Practices"
description: "Performance rules for React and Next.js applications."
keywords: ["react", "nextjs", "performance"]
---

# React Best Practices

### 1. Eliminating Waterfalls (CRITICAL)

| Rule | Description |
|------|-------------|
| `async-parallel` | Use Promise.all() for independent operations |
"#;

    #[test]
    fn test_parse_power_index() {
        let index = PowerIndex::parse(INDEX).unwrap();
        assert_eq!(index.manifest.name, "react-best-practices");
        assert_eq!(index.manifest.title(), "React Best Practices");
        assert_eq!(index.manifest.keywords.len(), 3);
        assert_eq!(index.catalog.len(), 1);
        assert_eq!(
            index.catalog.rules_in(Category::EliminatingWaterfalls)[0].id.as_str(),
            "async-parallel"
        );
    }

    #[test]
    fn test_missing_frontmatter() {
        let result = PowerIndex::parse("# Just a heading\n");
        assert!(matches!(result, Err(CatalogError::MissingFrontmatter)));
    }

    #[test]
    fn test_invalid_manifest_name() {
        let content = "---\nname: React Rules\ndescription: x\n---\n";
        let result = PowerIndex::parse(content);
        assert!(matches!(
            result,
            Err(CatalogError::InvalidManifest { field: "name", .. })
        ));
    }

    #[test]
    fn test_empty_description_rejected() {
        let content = "---\nname: react\ndescription: \"  \"\n---\n";
        assert!(matches!(
            PowerIndex::parse(content),
            Err(CatalogError::InvalidManifest {
                field: "description",
                ..
            })
        ));
    }

    #[test]
    fn test_split_frontmatter_handles_crlf() {
        let content = "---\r\nname: a\r\ndescription: b\r\n---\r\nbody";
        assert_eq!(
            split_frontmatter(content).unwrap(),
            Some("name: a\r\ndescription: b")
        );
        assert_eq!(split_frontmatter("no frontmatter").unwrap(), None);
    }
}
