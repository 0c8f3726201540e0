//! Error types for the ChatBI client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire ChatBI client.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. The taxonomy follows the
/// client's recovery model: transport problems are transient, authorization
/// failures block the UI, validation failures never reach the network,
/// persistence failures degrade to an ephemeral transcript, and malformed
/// data is isolated per message.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChatBiError {
    /// Network-level failure (connection refused, timeout, DNS, ...)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The backend rejected the credential (HTTP 401 or 403)
    #[error("Authorization error: status {status}")]
    Authorization { status: u16 },

    /// Input rejected before dispatch (e.g. empty message text)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session registry / storage failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A serialized sub-field could not be interpreted
    #[error("Malformed data in '{field}': {message}")]
    MalformedData { field: String, message: String },

    /// Entity not found with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatBiError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an Authorization error from an HTTP status code
    pub fn authorization(status: u16) -> Self {
        Self::Authorization { status }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Creates a MalformedData error
    pub fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedData {
            field: field.into(),
            message: message.into(),
        }
    }

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

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is an Authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization { .. })
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a Persistence error
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the HTTP status for authorization errors, `None` otherwise.
    pub fn authorization_status(&self) -> Option<u16> {
        match self {
            Self::Authorization { status } => Some(*status),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ChatBiError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ChatBiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChatBiError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ChatBiError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ChatBiError>`.
pub type Result<T> = std::result::Result<T, ChatBiError>;
