//! Error types for button configuration operations.

use thiserror::Error;

use crate::button::ConfigurationTarget;

/// Primary error type for button configuration operations.
#[derive(Error, Debug)]
pub enum QbError {
    // Import validation errors
    #[error("Invalid import file format")]
    InvalidFormat,

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("File too large: {size} bytes exceeds the {limit} byte import limit")]
    FileTooLarge { size: u64, limit: u64 },

    // Staleness errors
    #[error("Import preview has expired, run the preview again")]
    PreviewExpired,

    #[error("Scope mismatch: preview was computed for '{expected}' but confirm targets '{actual}'")]
    ScopeMismatch {
        expected: ConfigurationTarget,
        actual: ConfigurationTarget,
    },

    // Write path errors
    #[error("Backup failed: {0}")]
    Backup(String),

    #[error("Failed to write configuration: {0}")]
    Write(String),

    // Button set errors
    #[error("Button set not found: {name}")]
    SetNotFound { name: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl QbError {
    /// Shorthand for a field-level validation failure.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidFormat
                | Self::InvalidField { .. }
                | Self::FileTooLarge { .. }
                | Self::PreviewExpired
                | Self::ScopeMismatch { .. }
                | Self::SetNotFound { .. }
                | Self::ConfigNotFound { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidFormat | Self::InvalidField { .. } => {
                Some("Check the file with: qb validate <FILE>")
            }
            Self::PreviewExpired => Some("Run: qb preview <FILE> --save <PREVIEW>"),
            Self::ScopeMismatch { .. } => Some("Pass the same --scope used for the preview"),
            Self::SetNotFound { .. } => Some("Run: qb sets"),
            Self::ConfigNotFound { .. } => Some("Check the --config path"),
            _ => None,
        }
    }

    /// Message surfaced to callers of the import/export operations.
    ///
    /// Falls back to "Unknown error" when the error renders to nothing.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            message
        }
    }
}

/// Convenience type alias for Results using QbError.
pub type Result<T> = std::result::Result<T, QbError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| QbError::Other(format!("{}: {e}", f().into())))
    }
}
