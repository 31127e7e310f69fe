//! Commands sent to a page and their handling.
//!
//! Commands arrive as JSON records tagged by `action`:
//!
//! ```json
//! {"action": "applyColorScheme", "data": {"bg": "#0f1113", "accent": "#82aaff"}}
//! {"action": "disableColorScheme"}
//! ```
//!
//! [`Command::execute`] always produces an [`ApplyReport`]; failures become
//! `status: "error"` reports instead of propagating.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::applier::ThemeApplier;
use crate::document::Document;
use crate::error::ThemeError;
use crate::report::ApplyReport;
use crate::theme::ThemeDescriptor;

/// A request to change the theme on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Command {
    /// Apply a theme record; a missing `data` applies all defaults.
    ApplyColorScheme {
        #[serde(default)]
        data: ThemeDescriptor,
    },
    /// Remove the applied theme.
    DisableColorScheme,
}

impl Command {
    /// Parses a command record.
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        serde_json::from_str(json).map_err(|e| ThemeError::parse("command", e.to_string()))
    }

    /// Runs the command against `document`.
    pub fn execute<D>(&self, applier: &mut ThemeApplier, document: &D) -> ApplyReport
    where
        D: Document + Clone + 'static,
    {
        let outcome = match self {
            Command::ApplyColorScheme { data } => applier
                .apply_descriptor(data, document)
                .map(|applied| ApplyReport::applied(applied.contrast_ratio)),
            Command::DisableColorScheme => applier.remove(document).map(|()| ApplyReport::removed()),
        };

        match outcome {
            Ok(report) => {
                debug!(status = ?report.status, "command handled");
                report
            }
            Err(err) => {
                warn!(error = %err, "command failed");
                ApplyReport::error(err.to_string())
            }
        }
    }
}

/// Parses and runs a raw command record.
///
/// Unparseable input yields an error report.
pub fn handle_message<D>(json: &str, applier: &mut ThemeApplier, document: &D) -> ApplyReport
where
    D: Document + Clone + 'static,
{
    match Command::from_json(json) {
        Ok(command) => command.execute(applier, document),
        Err(err) => {
            warn!(error = %err, "rejected command");
            ApplyReport::error(err.to_string())
        }
    }
}
