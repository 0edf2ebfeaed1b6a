use thiserror::Error;

/// Errors raised while parsing identifiers and closed vocabularies
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("Invalid rule id '{id}': {reason}")]
    InvalidRuleId { id: String, reason: &'static str },

    #[error("Unknown priority tier '{label}'")]
    UnknownTier { label: String },

    #[error("Unknown category '{label}'")]
    UnknownCategory { label: String },

    #[error("Malformed steering file '{file}': {reason}")]
    MalformedSteeringFile { file: String, reason: String },
}
