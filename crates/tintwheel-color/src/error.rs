//! Color parsing errors.

/// Error returned when a color string cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    /// The input is not a 3- or 6-digit hex color.
    #[error("Invalid color '{value}': {reason}")]
    InvalidColor {
        /// The rejected input, as given.
        value: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl ColorError {
    /// Create an invalid-color error.
    pub fn invalid(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidColor {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// The input that failed to decode.
    pub fn value(&self) -> &str {
        match self {
            ColorError::InvalidColor { value, .. } => value,
        }
    }
}
