//! Error types for the Patina engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for all Patina crates.
///
/// Nothing on the recompute path returns this type: weighting and aggregation
/// are total functions. Errors originate at the boundaries (store writes,
/// extraction, configuration).
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum PatinaError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound { entity_type: String, id: String },

    /// A contribution failed schema validation and was dropped
    #[error("Invalid contribution: {0}")]
    InvalidContribution(String),

    /// The extractor could not produce a contribution
    #[error("Extraction failed: {message}")]
    Extraction { message: String, retryable: bool },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PatinaError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.into(),
        }
    }

    /// Creates an InvalidContribution error
    pub fn invalid_contribution(message: impl Into<String>) -> Self {
        Self::InvalidContribution(message.into())
    }

    /// Creates a non-retryable Extraction error
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
            retryable: false,
        }
    }

    /// Creates an Extraction error that a caller may reasonably retry
    pub fn retryable_extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an InvalidContribution error
    pub fn is_invalid_contribution(&self) -> bool {
        matches!(self, Self::InvalidContribution(_))
    }

    /// Check if this is an Extraction error
    pub fn is_extraction(&self) -> bool {
        matches!(self, Self::Extraction { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Whether retrying the failed operation might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Extraction {
                retryable: true,
                ..
            }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PatinaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PatinaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PatinaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PatinaError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, PatinaError>`.
pub type Result<T> = std::result::Result<T, PatinaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_only_for_flagged_extraction() {
        assert!(PatinaError::retryable_extraction("rate limited").is_retryable());
        assert!(!PatinaError::extraction("bad json").is_retryable());
        assert!(!PatinaError::config("epsilon").is_retryable());
    }

    #[test]
    fn test_json_error_maps_to_serialization() {
        let err: PatinaError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        match err {
            PatinaError::Serialization { format, .. } => assert_eq!(format, "JSON"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_not_found_display() {
        let err = PatinaError::not_found("item", "node-1");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Entity not found: item 'node-1'");
    }
}
