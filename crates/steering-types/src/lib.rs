//! Steering Types - Core types shared by the steering catalog, store and gateway
//!
//! This module defines the closed vocabularies (priority tiers, rule categories)
//! and the validated identifiers used throughout the application.

pub mod category;
pub mod error;
pub mod rule;
pub mod steering_file;
pub mod tier;

pub use category::Category;
pub use error::IdError;
pub use rule::{RuleDescriptor, RuleId};
pub use steering_file::SteeringFile;
pub use tier::PriorityTier;

/// Maximum allowed rule id length
pub const MAX_ID_LENGTH: usize = 64;

/// Extension every steering file carries on disk
pub const STEERING_EXTENSION: &str = "md";
