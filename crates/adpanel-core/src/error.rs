//! Error types for the panel testing engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How an error affects a test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input rejected before any external call was made.
    Validation,
    /// The run cannot continue and no bundle is produced.
    Fatal,
    /// A single reaction failed; the run continues with defaults.
    Degraded,
    /// The caller raised the cancellation signal.
    Cancelled,
    /// Storage, configuration or internal failures outside a run.
    Other,
}

/// A shared error type for the whole engine.
///
/// Mirrors the run-level error taxonomy: validation errors surface before a
/// run starts, panel generation failures are fatal, reaction failures are
/// degraded and never abort a run on their own.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum PanelError {
    /// Malformed brand context or creative set
    #[error("Validation error: {0}")]
    Validation(String),

    /// Panel generation capability failed or returned an unusable panel
    #[error("Panel generation failed: {0}")]
    PanelGeneration(String),

    /// Reaction evaluation capability failed for one persona/creative pair
    #[error("Reaction evaluation failed: {0}")]
    Evaluation(String),

    /// Panel cache store failure
    #[error("Panel cache error: {0}")]
    Cache(String),

    /// The run was cancelled by the caller
    #[error("Test run cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PanelError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a PanelGeneration error
    pub fn panel_generation(message: impl Into<String>) -> Self {
        Self::PanelGeneration(message.into())
    }

    /// Creates an Evaluation error
    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation(message.into())
    }

    /// Creates a Cache error
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache(message.into())
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

    /// Classifies this error against the run-level taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::PanelGeneration(_) => ErrorKind::Fatal,
            Self::Evaluation(_) => ErrorKind::Degraded,
            Self::Cancelled => ErrorKind::Cancelled,
            _ => ErrorKind::Other,
        }
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error aborts a run
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Fatal
    }

    /// Check if this is a Cancelled error
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PanelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PanelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PanelError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PanelError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error for collaborators built on anyhow
impl From<anyhow::Error> for PanelError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, PanelError>`.
pub type Result<T> = std::result::Result<T, PanelError>;
