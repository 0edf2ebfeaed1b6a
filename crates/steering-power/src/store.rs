//! Read-only mapping from rule id to steering document text

use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use steering_catalog::Catalog;
use steering_types::RuleId;
use tracing::{debug, info, warn};

use crate::error::{IntegrityWarning, Result, SteeringError};
use crate::source::DocumentSource;

/// When documents are read from their source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Read every document while opening the store
    Eager,
    /// Read each document on its first request
    #[default]
    Lazy,
}

/// Integrity findings collected while opening a store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    /// All warnings in discovery order
    pub warnings: Vec<IntegrityWarning>,
}

impl IntegrityReport {
    /// True when the catalog and documents agree exactly
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Ids named by the catalog that have no usable document
    pub fn mismatched_ids(&self) -> impl Iterator<Item = &RuleId> {
        self.warnings.iter().filter_map(|w| match w {
            IntegrityWarning::CatalogMismatch { id, .. } => Some(id),
            IntegrityWarning::OrphanDocument { .. } => None,
        })
    }
}

/// Steering documents keyed by catalog id.
///
/// Only ids present in the catalog with an existing document are known to
/// the store. Each document is read at most once; every later lookup returns
/// the same shared text.
#[derive(Debug)]
pub struct DocumentStore {
    source: Box<dyn DocumentSource>,
    documents: HashMap<RuleId, OnceCell<Arc<str>>>,
    mode: LoadMode,
    report: IntegrityReport,
}

impl DocumentStore {
    /// Open a store for every descriptor in `catalog`.
    ///
    /// Missing documents and documents the catalog does not name are
    /// reported as warnings, not errors.
    pub fn open(catalog: &Catalog, source: impl DocumentSource + 'static, mode: LoadMode) -> Self {
        let source: Box<dyn DocumentSource> = Box::new(source);
        let mut documents = HashMap::with_capacity(catalog.len());
        let mut report = IntegrityReport::default();

        for id in catalog.ids() {
            if !source.exists(id) {
                report.warnings.push(IntegrityWarning::CatalogMismatch {
                    id: id.clone(),
                    location: source.location(id),
                    reason: "document not found".to_string(),
                });
                continue;
            }

            let cell = OnceCell::new();
            if mode == LoadMode::Eager {
                match read_document(source.as_ref(), id) {
                    Ok(text) => {
                        let _ = cell.set(text);
                    }
                    Err(reason) => {
                        report.warnings.push(IntegrityWarning::CatalogMismatch {
                            id: id.clone(),
                            location: source.location(id),
                            reason,
                        });
                        continue;
                    }
                }
            }
            documents.insert(id.clone(), cell);
        }

        match source.list() {
            Ok(names) => {
                let catalogued: HashSet<&str> = catalog.ids().map(RuleId::as_str).collect();
                for name in names {
                    if !catalogued.contains(name.as_str()) {
                        let location = RuleId::parse(&name)
                            .map_or_else(|_| name.clone(), |id| source.location(&id));
                        report
                            .warnings
                            .push(IntegrityWarning::OrphanDocument { id: name, location });
                    }
                }
            }
            Err(e) => warn!("Could not list steering documents: {}", e),
        }

        for warning in &report.warnings {
            warn!("Integrity warning: {}", warning);
        }
        info!(
            "Document store opened: {} documents ({:?}), {} integrity warnings",
            documents.len(),
            mode,
            report.warnings.len()
        );

        Self {
            source,
            documents,
            mode,
            report,
        }
    }

    /// Resolve an id to its document text
    pub fn get(&self, id: &RuleId) -> Result<Arc<str>> {
        let cell = self
            .documents
            .get(id)
            .ok_or_else(|| SteeringError::DocumentNotFound { id: id.to_string() })?;

        cell.get_or_try_init(|| read_document(self.source.as_ref(), id))
            .cloned()
            .map_err(|reason| SteeringError::DocumentUnreadable {
                id: id.to_string(),
                reason,
            })
    }

    /// Check whether the store knows a document for `id`
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Check whether a document has already been read
    #[must_use]
    pub fn is_loaded(&self, id: &str) -> bool {
        self.documents.get(id).is_some_and(|cell| cell.get().is_some())
    }

    /// Number of known documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the store has no documents
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Load mode chosen at open time
    #[must_use]
    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    /// Warnings collected while opening
    #[must_use]
    pub fn integrity(&self) -> &IntegrityReport {
        &self.report
    }
}

fn read_document(source: &dyn DocumentSource, id: &RuleId) -> std::result::Result<Arc<str>, String> {
    let text = source.load(id).map_err(|e| e.to_string())?;
    if text.trim().is_empty() {
        return Err("document is empty".to_string());
    }
    debug!("Loaded steering document '{}' ({} bytes)", id, text.len());
    Ok(Arc::from(text))
}
