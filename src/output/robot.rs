//! Robot mode JSON output implementation.

use std::path::Path;

use serde::Serialize;
use serde_json::json;
use tracing::trace;

use super::{Output, RobotFormat};
use crate::button::{Button, ConfigurationTarget};
use crate::error::QbError;
use crate::store::ScopeDocument;
use crate::transfer::{BackupEntry, ExportFormat, ExportResult, ImportPreviewData, ImportResult};

/// JSON output implementation for agents and scripting.
///
/// Results go to stdout, errors to stderr.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    pub const fn new(format: RobotFormat) -> Self {
        Self { format }
    }

    fn render<T: Serialize + ?Sized>(&self, data: &T) -> String {
        let rendered = match self.format {
            RobotFormat::Json => serde_json::to_string_pretty(data),
            RobotFormat::JsonCompact => serde_json::to_string(data),
        };
        rendered.unwrap_or_else(|e| json!({ "error": true, "message": e.to_string() }).to_string())
    }

    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let json = self.render(data);
        trace!(json_len = json.len(), "JSON serialized");
        println!("{json}");
    }
}

impl Output for RobotOutput {
    fn error(&self, error: &QbError) {
        eprintln!(
            "{}",
            self.render(&json!({
                "error": true,
                "message": error.user_message(),
                "suggestion": error.suggestion(),
                "recoverable": error.is_user_recoverable(),
            }))
        );
    }

    fn export_result(&self, result: &ExportResult) {
        self.output_json(result);
    }

    fn import_result(&self, result: &ImportResult) {
        self.output_json(result);
    }

    fn preview_failed(&self, error: Option<&str>) {
        self.output_json(&json!({ "success": false, "error": error }));
    }

    fn preview(&self, preview: &ImportPreviewData, saved_to: Option<&Path>) {
        self.output_json(&json!({
            "success": true,
            "savedTo": saved_to,
            "preview": preview,
        }));
    }

    fn validation(&self, path: &Path, data: &ExportFormat) {
        let total: usize = data.buttons.iter().map(Button::count).sum();
        self.output_json(&json!({
            "valid": true,
            "path": path,
            "version": data.version,
            "exportedAt": data.exported_at,
            "configurationTarget": data.configuration_target,
            "buttons": data.buttons.len(),
            "totalButtons": total,
        }));
    }

    fn button_tree(&self, scope: ConfigurationTarget, buttons: &[Button]) {
        self.output_json(&json!({ "scope": scope, "buttons": buttons }));
    }

    fn backups(&self, entries: &[BackupEntry]) {
        self.output_json(entries);
    }

    fn sets(&self, scope: ConfigurationTarget, doc: &ScopeDocument) {
        let sets: Vec<_> = doc
            .button_sets
            .iter()
            .map(|set| json!({ "name": set.name, "buttons": set.buttons.len() }))
            .collect();
        self.output_json(&json!({
            "scope": scope,
            "activeSet": doc.active_set,
            "rootButtons": doc.buttons.len(),
            "sets": sets,
        }));
    }
}
