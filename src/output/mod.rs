//! Output mode abstraction for robot and human output.

use std::path::Path;

use crate::button::{Button, ConfigurationTarget};
use crate::cli::Cli;
use crate::error::QbError;
use crate::store::ScopeDocument;
use crate::transfer::{BackupEntry, ExportFormat, ExportResult, ImportPreviewData, ImportResult};

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    /// JSON output for agents and scripting.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human { color: bool },
}

impl OutputMode {
    /// Create OutputMode from CLI arguments.
    #[must_use]
    pub const fn from_cli(cli: &Cli) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else {
            Self::Human {
                color: !cli.no_color,
            }
        }
    }

    /// Returns true if output should be JSON.
    #[must_use]
    pub const fn is_robot(&self) -> bool {
        matches!(self, Self::Robot(_))
    }

    /// Convert into the appropriate Output implementation.
    #[must_use]
    pub fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human { color } => Box::new(HumanOutput::new(color)),
        }
    }
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    // Basic messages
    fn error(&self, error: &QbError);

    // Operation results
    fn export_result(&self, result: &ExportResult);
    fn import_result(&self, result: &ImportResult);
    /// A failed or cancelled preview. `error` is `None` for cancellation.
    fn preview_failed(&self, error: Option<&str>);
    fn preview(&self, preview: &ImportPreviewData, saved_to: Option<&Path>);

    // Inspection
    fn validation(&self, path: &Path, data: &ExportFormat);
    fn button_tree(&self, scope: ConfigurationTarget, buttons: &[Button]);
    fn backups(&self, entries: &[BackupEntry]);
    /// Button sets of `scope`, marking the active one.
    fn sets(&self, scope: ConfigurationTarget, doc: &ScopeDocument);
}
