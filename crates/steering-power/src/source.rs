//! Backing storage for steering documents

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use steering_types::{RuleId, SteeringFile, STEERING_EXTENSION};

/// Where a [`crate::DocumentStore`] reads document text from.
///
/// Implementations must return the same text for the same id for the
/// lifetime of the process; the store relies on that for content addressing.
pub trait DocumentSource: Send + Sync + fmt::Debug {
    /// Human-readable location of a document, used in warnings
    fn location(&self, id: &RuleId) -> String;

    /// Check whether a document exists without reading it
    fn exists(&self, id: &RuleId) -> bool;

    /// Read the full text of a document
    fn load(&self, id: &RuleId) -> io::Result<String>;

    /// Names (without extension) of every document the source holds
    fn list(&self) -> io::Result<Vec<String>>;
}

/// Documents stored as `<dir>/<id>.md`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Create a source over a steering directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Steering directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &RuleId) -> PathBuf {
        self.dir.join(SteeringFile::for_id(id.clone()).file_name())
    }
}

impl DocumentSource for DirectorySource {
    fn location(&self, id: &RuleId) -> String {
        self.path_for(id).display().to_string()
    }

    fn exists(&self, id: &RuleId) -> bool {
        self.path_for(id).is_file()
    }

    fn load(&self, id: &RuleId) -> io::Result<String> {
        fs::read_to_string(self.path_for(id))
    }

    fn list(&self) -> io::Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == STEERING_EXTENSION) {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string_lossy().to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Documents held in memory, keyed by id
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, String>,
}

impl MemorySource {
    /// Create an empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document
    #[must_use]
    pub fn with_document(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.documents.insert(id.into(), text.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemorySource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            documents: iter
                .into_iter()
                .map(|(id, text)| (id.into(), text.into()))
                .collect(),
        }
    }
}

impl DocumentSource for MemorySource {
    fn location(&self, id: &RuleId) -> String {
        format!("memory:{id}")
    }

    fn exists(&self, id: &RuleId) -> bool {
        self.documents.contains_key(id.as_str())
    }

    fn load(&self, id: &RuleId) -> io::Result<String> {
        self.documents.get(id.as_str()).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no document for '{id}'"))
        })
    }

    fn list(&self) -> io::Result<Vec<String>> {
        let mut names: Vec<String> = self.documents.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
