//! A single power: manifest, catalog and steering documents

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use steering_catalog::{Catalog, PowerIndex, PowerManifest};
use steering_types::{RuleDescriptor, SteeringFile};
use tracing::info;

use crate::error::{PowerError, Result, SteeringError};
use crate::source::{DirectorySource, DocumentSource};
use crate::store::{DocumentStore, IntegrityReport, LoadMode};
use crate::{INDEX_FILE, STEERING_DIR};

/// What a host reads eagerly when it activates a power
#[derive(Debug, Clone, Serialize)]
pub struct Activation {
    /// Power name (namespace for `readSteering`)
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// What the power covers
    pub description: String,
    /// Activation keywords
    pub keywords: Vec<String>,
    /// Rules rendered by priority, one line each
    pub index: String,
    /// Steering file names that can be requested
    pub steering_files: Vec<String>,
}

/// A loaded power. Immutable; share it behind `Arc` across threads.
#[derive(Debug)]
pub struct Power {
    manifest: PowerManifest,
    catalog: Catalog,
    store: DocumentStore,
    root: Option<PathBuf>,
}

impl Power {
    /// Load a power directory: `POWER.md` plus `steering/<id>.md` files.
    ///
    /// Index errors abort the load. Missing or extra documents only produce
    /// integrity warnings.
    pub fn load(dir: &Path, mode: LoadMode) -> std::result::Result<Self, PowerError> {
        let index_path = dir.join(INDEX_FILE);
        if !index_path.is_file() {
            return Err(PowerError::MissingIndex {
                path: dir.to_path_buf(),
            });
        }

        let content = fs::read_to_string(&index_path).map_err(|source| PowerError::Io {
            path: index_path.clone(),
            source,
        })?;
        let index = PowerIndex::parse(&content).map_err(|source| PowerError::Catalog {
            path: index_path,
            source,
        })?;

        let mut power = Self::from_index(index, DirectorySource::new(dir.join(STEERING_DIR)), mode);
        power.root = Some(dir.to_path_buf());
        Ok(power)
    }

    /// Build a power from an already parsed index and any document source
    pub fn from_index(index: PowerIndex, source: impl DocumentSource + 'static, mode: LoadMode) -> Self {
        let PowerIndex { manifest, catalog } = index;
        let store = DocumentStore::open(&catalog, source, mode);
        info!(
            "Power '{}' loaded with {} rules in {} categories",
            manifest.name,
            catalog.len(),
            catalog.categories().count()
        );

        Self {
            manifest,
            catalog,
            store,
            root: None,
        }
    }

    /// Power name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    /// Frontmatter metadata
    #[must_use]
    pub fn manifest(&self) -> &PowerManifest {
        &self.manifest
    }

    /// Rule catalog
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Steering document store
    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Integrity warnings collected at load time
    #[must_use]
    pub fn integrity(&self) -> &IntegrityReport {
        self.store.integrity()
    }

    /// Directory the power was loaded from, if any
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Fetch a steering document.
    ///
    /// `power_name` must be this power's name; `steering_file` is an id with
    /// an optional `.md` suffix.
    pub fn read_steering(&self, power_name: &str, steering_file: &str) -> Result<Arc<str>> {
        if power_name != self.name() {
            return Err(SteeringError::UnknownPower {
                name: power_name.to_string(),
            });
        }
        self.read_rule(steering_file)
    }

    /// Fetch a steering document without checking the power name
    pub fn read_rule(&self, steering_file: &str) -> Result<Arc<str>> {
        let file = SteeringFile::parse(steering_file)?;
        let id = self
            .catalog
            .resolve(file.id().as_str())
            .map_err(|_| SteeringError::DocumentNotFound {
                id: file.id().to_string(),
            })?;
        self.store.get(id)
    }

    /// Look up a single rule descriptor
    pub fn describe(&self, id: &str) -> Result<&RuleDescriptor> {
        Ok(self.catalog.descriptor(id)?)
    }

    /// Rules of a category, by label, in declared order
    pub fn rules(&self, category: &str) -> Result<&[RuleDescriptor]> {
        Ok(self.catalog.rules_in_label(category)?)
    }

    /// Eagerly readable summary of the power
    #[must_use]
    pub fn activate(&self) -> Activation {
        Activation {
            name: self.manifest.name.clone(),
            display_name: self.manifest.title().to_string(),
            description: self.manifest.description.clone(),
            keywords: self.manifest.keywords.clone(),
            index: self.catalog.render_index(),
            steering_files: self
                .catalog
                .ids()
                .filter(|id| self.store.contains(id.as_str()))
                .map(|id| SteeringFile::for_id(id.clone()).file_name())
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    const INDEX: &str = r#"---
name: react-best-practices
displayName: React Best Practices
description: Performance rules for React and Next.js.
---

## 1. Eliminating Waterfalls (CRITICAL)

| Rule | Description |
|------|-------------|
| `async-parallel` | Use Promise.all() for independent operations |
| `async-defer-await` | Move await into branches where actually used |
"#;

    fn power() -> Power {
        let index = PowerIndex::parse(INDEX).unwrap();
        let source = MemorySource::new()
            .with_document("async-parallel", "# Promise.all() for independent operations")
            .with_document("async-defer-await", "# Defer await until needed");
        Power::from_index(index, source, LoadMode::Lazy)
    }

    #[test]
    fn test_read_steering_returns_matching_document() {
        let power = power();
        let text = power
            .read_steering("react-best-practices", "async-parallel.md")
            .unwrap();
        assert_eq!(&*text, "# Promise.all() for independent operations");
        assert!(!text.contains("Defer await"));
    }

    #[test]
    fn test_read_steering_unknown_rule() {
        let power = power();
        assert_eq!(
            power.read_steering("react-best-practices", "nonexistent-rule.md"),
            Err(SteeringError::DocumentNotFound {
                id: "nonexistent-rule".to_string()
            })
        );
        assert!(power
            .read_steering("react-best-practices", "async-parallel.md")
            .is_ok());
    }

    #[test]
    fn test_read_steering_wrong_power() {
        let power = power();
        assert_eq!(
            power.read_steering("other-power", "async-parallel.md"),
            Err(SteeringError::UnknownPower {
                name: "other-power".to_string()
            })
        );
    }

    #[test]
    fn test_read_steering_malformed_file() {
        let power = power();
        let err = power
            .read_steering("react-best-practices", "async-parallel.txt")
            .unwrap_err();
        assert_eq!(err.kind(), "malformed_request");
    }

    #[test]
    fn test_describe_and_rules() {
        let power = power();
        assert_eq!(
            power.describe("async-defer-await").unwrap().summary,
            "Move await into branches where actually used"
        );
        assert_eq!(
            power.describe("missing").unwrap_err(),
            SteeringError::DescriptorNotFound {
                id: "missing".to_string()
            }
        );
        assert_eq!(power.rules("Eliminating Waterfalls").unwrap().len(), 2);
        assert_eq!(power.rules("Nope").unwrap_err().kind(), "unknown_category");
    }

    #[test]
    fn test_activate_lists_retrievable_files() {
        let activation = power().activate();
        assert_eq!(activation.name, "react-best-practices");
        assert_eq!(activation.display_name, "React Best Practices");
        assert_eq!(
            activation.steering_files,
            vec!["async-parallel.md", "async-defer-await.md"]
        );
        assert!(activation.index.contains("## Eliminating Waterfalls (CRITICAL)"));
    }
}
