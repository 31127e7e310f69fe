//! Error types for theme loading and application.

use std::path::PathBuf;

use tintwheel_color::ColorError;

/// A document refused a mutation.
///
/// Raised by [`Document`](crate::Document) implementations, for example when
/// the page is a restricted context the extension may not touch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// The document cannot be read or mutated.
    #[error("Document unavailable: {0}")]
    Unavailable(String),
}

impl DocumentError {
    /// Create an unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }
}

/// Errors produced while building, loading, or applying a theme.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThemeError {
    /// A color field could not be decoded.
    #[error(transparent)]
    InvalidColor(#[from] ColorError),

    /// A non-color field is out of range.
    #[error("Invalid theme field '{field}': {reason}")]
    InvalidTheme {
        /// Field name, as it appears in theme records.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// The target document refused a mutation.
    #[error(transparent)]
    DocumentUnavailable(#[from] DocumentError),

    /// A theme or command record could not be parsed.
    #[error("Failed to parse {what}: {message}")]
    Parse {
        /// What was being parsed ("theme", "command", ...).
        what: &'static str,
        /// Message from the underlying parser.
        message: String,
    },

    /// A theme file could not be read.
    #[error("Failed to read {}: {message}", .path.display())]
    Load {
        /// The file that failed.
        path: PathBuf,
        /// Message from the I/O layer.
        message: String,
    },

    /// A named preset does not exist.
    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),
}

impl ThemeError {
    /// Create an invalid-field error.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidTheme {
            field,
            reason: reason.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(what: &'static str, message: impl Into<String>) -> Self {
        Self::Parse {
            what,
            message: message.into(),
        }
    }
}
