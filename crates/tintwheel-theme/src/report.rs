//! Outcome records returned to command senders.

use serde::{Deserialize, Serialize};

/// Status of a handled command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Applied,
    Removed,
    Error,
}

/// What happened when a command ran.
///
/// Serializes as `{"status": "applied", "contrastRatio": 16.9}` and the
/// like; absent fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    pub status: Status,
    /// Contrast of the derived text color, when one was derived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast_ratio: Option<f64>,
    /// Error description when `status` is `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApplyReport {
    pub fn applied(contrast_ratio: Option<f64>) -> Self {
        Self {
            status: Status::Applied,
            contrast_ratio,
            message: None,
        }
    }

    pub fn removed() -> Self {
        Self {
            status: Status::Removed,
            contrast_ratio: None,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            contrast_ratio: None,
            message: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applied_json_shape() {
        let json = serde_json::to_string(&ApplyReport::applied(Some(4.5))).unwrap();
        assert_eq!(json, r#"{"status":"applied","contrastRatio":4.5}"#);
    }

    #[test]
    fn test_removed_json_shape() {
        let json = serde_json::to_string(&ApplyReport::removed()).unwrap();
        assert_eq!(json, r#"{"status":"removed"}"#);
    }

    #[test]
    fn test_error_carries_message() {
        let report = ApplyReport::error("Document unavailable: restricted");
        assert!(report.is_error());
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"status":"error","message":"Document unavailable: restricted"}"#
        );
    }

    #[test]
    fn test_parse_report() {
        let report: ApplyReport = serde_json::from_str(r#"{"status":"removed"}"#).unwrap();
        assert_eq!(report, ApplyReport::removed());
    }
}
