//! Registry of powers available to a host
//!
//! Discovery scans configured directories once; afterwards the registry is
//! read-only and answers `readSteering` for every power it holds.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{PowerError, Result, SteeringError};
use crate::power::{Activation, Power};
use crate::store::LoadMode;
use crate::INDEX_FILE;

/// A power directory that discovery could not use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPower {
    /// Directory that was skipped
    pub path: PathBuf,
    /// Why it was skipped
    pub reason: String,
}

/// Outcome of [`PowerRegistry::discover`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// Names of powers registered by this discovery
    pub loaded: Vec<String>,
    /// Directories that held an index but failed to load
    pub skipped: Vec<SkippedPower>,
}

/// Registry managing all available powers
#[derive(Debug, Default)]
pub struct PowerRegistry {
    /// Loaded powers (`power_name` → power)
    powers: HashMap<String, Power>,
    /// Directories to scan
    directories: Vec<PathBuf>,
    /// Load mode for steering documents
    mode: LoadMode,
}

impl PowerRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how steering documents are loaded
    #[must_use]
    pub fn with_load_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    /// Add a directory to scan. It may be a power itself or hold powers as
    /// subdirectories.
    #[must_use]
    pub fn add_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directories.push(dir.into());
        self
    }

    /// Add user powers directory: ~/.steering/powers/
    #[must_use]
    pub fn with_user_powers(self) -> Self {
        if let Some(home) = dirs::home_dir() {
            self.add_directory(home.join(".steering").join("powers"))
        } else {
            warn!("Could not find home directory for user powers");
            self
        }
    }

    /// Add project powers directory: ./.steering/powers/
    #[must_use]
    pub fn with_project_powers(self) -> Self {
        self.add_directory(PathBuf::from(".steering/powers"))
    }

    /// Scan all configured directories and load every power found.
    ///
    /// A power that fails to load is skipped and reported; it never prevents
    /// the others from loading.
    pub fn discover(&mut self) -> std::result::Result<DiscoveryReport, PowerError> {
        info!(
            "Starting power discovery in {} directories",
            self.directories.len()
        );

        let mut report = DiscoveryReport::default();
        let directories = self.directories.clone();

        for dir in &directories {
            if !dir.exists() {
                debug!("Powers directory does not exist: {:?}", dir);
                continue;
            }

            if !dir.is_dir() {
                warn!("Powers path is not a directory: {:?}", dir);
                continue;
            }

            if dir.join(INDEX_FILE).is_file() {
                self.load_one(dir, &mut report);
            } else {
                self.scan_directory(dir, &mut report)?;
            }
        }

        info!(
            "Discovered {} powers ({} skipped)",
            report.loaded.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    fn scan_directory(
        &mut self,
        dir: &Path,
        report: &mut DiscoveryReport,
    ) -> std::result::Result<(), PowerError> {
        let io_err = |source| PowerError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut candidates = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_dir() && path.join(INDEX_FILE).is_file() {
                candidates.push(path);
            }
        }
        candidates.sort();

        for path in candidates {
            self.load_one(&path, report);
        }
        Ok(())
    }

    fn load_one(&mut self, path: &Path, report: &mut DiscoveryReport) {
        let loaded = Power::load(path, self.mode).and_then(|power| {
            let name = power.name().to_string();
            self.register(power).map(|()| name)
        });

        match loaded {
            Ok(name) => {
                debug!("Discovered power: {} at {:?}", name, path);
                report.loaded.push(name);
            }
            Err(e) => {
                warn!("Skipping power at {:?}: {}", path, e);
                report.skipped.push(SkippedPower {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Add a loaded power; names must be unique
    pub fn register(&mut self, power: Power) -> std::result::Result<(), PowerError> {
        let name = power.name().to_string();
        if self.powers.contains_key(&name) {
            return Err(PowerError::DuplicatePower { name });
        }
        self.powers.insert(name, power);
        Ok(())
    }

    /// Get a power by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Power> {
        self.powers.get(name)
    }

    /// Get a power by name, failing with `UnknownPower`
    pub fn power(&self, name: &str) -> Result<&Power> {
        self.get(name).ok_or_else(|| SteeringError::UnknownPower {
            name: name.to_string(),
        })
    }

    /// The retrieval boundary: fetch `steering_file` from power `power_name`
    pub fn read_steering(&self, power_name: &str, steering_file: &str) -> Result<Arc<str>> {
        self.power(power_name)?
            .read_steering(power_name, steering_file)
    }

    /// Activation summary of one power
    pub fn activate(&self, power_name: &str) -> Result<Activation> {
        Ok(self.power(power_name)?.activate())
    }

    /// Power names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.powers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All powers, sorted by name
    #[must_use]
    pub fn powers(&self) -> Vec<&Power> {
        let mut powers: Vec<&Power> = self.powers.values().collect();
        powers.sort_by_key(|p| p.name());
        powers
    }

    /// Get number of powers
    #[must_use]
    pub fn len(&self) -> usize {
        self.powers.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.powers.is_empty()
    }

    /// Generate powers list for an LLM system prompt
    /// Format:
    /// Available powers (activate one to see its rules):
    /// - power-name: Description of what the power covers
    #[must_use]
    pub fn generate_system_prompt(&self) -> String {
        if self.powers.is_empty() {
            return String::new();
        }

        let mut prompt = String::from("Available powers (activate one to see its rules):\n");
        for power in self.powers() {
            prompt.push_str(&format!(
                "- {}: {}\n",
                power.name(),
                power.manifest().description
            ));
        }
        prompt
    }
}
