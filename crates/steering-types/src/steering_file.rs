use std::fmt;

use crate::error::IdError;
use crate::rule::RuleId;
use crate::STEERING_EXTENSION;

/// Directory prefix a host may send along with the file name
const STEERING_DIR_PREFIX: &str = "steering/";

/// A steering file name as requested by a host, normalized to its rule id.
///
/// Accepted forms: `async-parallel.md`, `steering/async-parallel.md` and the
/// bare id `async-parallel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SteeringFile {
    id: RuleId,
}

impl SteeringFile {
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        let malformed = |reason: String| IdError::MalformedSteeringFile {
            file: raw.to_string(),
            reason,
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(malformed("file name cannot be empty".to_string()));
        }

        let name = trimmed.strip_prefix(STEERING_DIR_PREFIX).unwrap_or(trimmed);
        if name.contains('/') || name.contains('\\') {
            return Err(malformed(
                "file name must not contain path separators".to_string(),
            ));
        }

        let stem = match name.rsplit_once('.') {
            Some((stem, ext)) if ext == STEERING_EXTENSION => stem,
            Some((_, ext)) => {
                return Err(malformed(format!(
                    "expected a .{} file, got extension '{}'",
                    STEERING_EXTENSION, ext
                )))
            }
            None => name,
        };

        let id = RuleId::parse(stem).map_err(|e| malformed(e.to_string()))?;
        Ok(Self { id })
    }

    pub fn for_id(id: RuleId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> &RuleId {
        &self.id
    }

    pub fn into_id(self) -> RuleId {
        self.id
    }

    /// File name on disk: "{id}.md"
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id, STEERING_EXTENSION)
    }
}

impl fmt::Display for SteeringFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_markdown_suffix() {
        let file = SteeringFile::parse("async-parallel.md").unwrap();
        assert_eq!(file.id().as_str(), "async-parallel");
        assert_eq!(file.file_name(), "async-parallel.md");
    }

    #[test]
    fn test_accepts_bare_id_and_directory_prefix() {
        assert_eq!(
            SteeringFile::parse("async-parallel").unwrap(),
            SteeringFile::parse(" steering/async-parallel.md ").unwrap()
        );
    }

    #[test]
    fn test_rejects_malformed_names() {
        for raw in [
            "",
            "   ",
            "async-parallel.txt",
            "async-parallel.MD",
            "../async-parallel.md",
            "rules/async-parallel.md",
            "..",
            ".md",
            "Async Parallel.md",
        ] {
            let err = SteeringFile::parse(raw).unwrap_err();
            assert!(
                matches!(err, IdError::MalformedSteeringFile { .. }),
                "{raw:?} gave {err:?}"
            );
        }
    }
}
