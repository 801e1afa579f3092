//! Error types for the Reflective workspace.
//!
//! Each pipeline stage has its own narrow error type so callers can decide
//! per stage whether a failure aborts the run or only one persona. Backend and
//! classification failures are folded into that persona's result; the rest
//! convert into [`ReflectiveError`] for the outer layers.

use thiserror::Error;

use crate::backend::BackendError;

/// Caller-supplied input was rejected before any backend call was made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select at least one persona to generate feedback.")]
    NoPersonasSelected,

    #[error("Please enter or upload testing material to receive feedback.")]
    EmptyMaterial,

    #[error("Unknown persona '{0}'")]
    UnknownPersona(String),

    #[error("Persona '{0}' was selected more than once")]
    DuplicatePersona(String),
}

/// A persona record lacks a field that prompt construction requires.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Persona '{persona_id}' is missing required field '{field}'")]
pub struct DataIntegrityError {
    pub persona_id: String,
    pub field: String,
}

impl DataIntegrityError {
    pub fn missing(persona_id: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            persona_id: persona_id.into(),
            field: field.into(),
        }
    }
}

/// The sentiment pass did not yield a usable judgment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    /// The classification request itself failed in transport
    #[error("Sentiment request failed: {0}")]
    Backend(#[from] BackendError),

    /// The reply was not the expected two-field object
    #[error("Malformed sentiment payload: {message}")]
    MalformedPayload { message: String, raw: String },

    /// The reply named a class outside Positive / Neutral / Negative
    #[error("Unrecognized sentiment label '{0}'")]
    UnknownLabel(String),
}

/// A shared error type for the entire Reflective workspace.
#[derive(Error, Debug, Clone)]
pub enum ReflectiveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    DataIntegrity(#[from] DataIntegrityError),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (repository/storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller aborted the run
    #[error("Feedback run was cancelled")]
    Cancelled,

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReflectiveError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ReflectiveError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ReflectiveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ReflectiveError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ReflectiveError>`.
pub type Result<T> = std::result::Result<T, ReflectiveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_displayable() {
        let err: ReflectiveError = ValidationError::EmptyMaterial.into();
        assert!(err.is_validation());
        assert!(err.to_string().contains("testing material"));
    }

    #[test]
    fn test_data_integrity_names_persona_and_field() {
        let err = DataIntegrityError::missing("p-1", "age");
        assert_eq!(err.to_string(), "Persona 'p-1' is missing required field 'age'");
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ReflectiveError = io.into();
        assert!(err.to_string().contains("NotFound"));
    }
}
