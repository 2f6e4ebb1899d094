//! Human-friendly output implementation using `console` styling.

use std::path::Path;

use console::Style;

use super::Output;
use crate::button::{Button, ConfigurationTarget};
use crate::error::QbError;
use crate::store::ScopeDocument;
use crate::transfer::{
    BackupEntry, ButtonSource, ExportFormat, ExportResult, ImportPreviewData, ImportResult,
};

/// Styled terminal output implementation for human users.
pub struct HumanOutput {
    color: bool,
}

impl HumanOutput {
    pub const fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, style: &Style, text: &str) -> String {
        if self.color {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn ok(&self, message: &str) {
        println!("{} {message}", self.paint(&Style::new().green().bold(), "✓"));
    }

    fn fail(&self, message: &str) {
        eprintln!("{} {message}", self.paint(&Style::new().red().bold(), "✗"));
    }

    /// Cancellation is not an error; it only gets a dim note.
    fn cancelled(&self, message: &str) {
        eprintln!("{}", self.paint(&Style::new().dim(), message));
    }

    fn heading(&self, text: &str) {
        println!("{}", self.paint(&Style::new().bold().underlined(), text));
    }

    /// One line per set, root buttons first. `*` marks the active one.
    fn set_lines(&self, doc: &ScopeDocument) -> Vec<String> {
        let marker = |active: bool| {
            if active {
                self.paint(&Style::new().green().bold(), "*")
            } else {
                " ".to_string()
            }
        };
        let mut lines = vec![format!(
            "  {} (root)  {} buttons",
            marker(doc.active_set.is_none()),
            doc.buttons.len()
        )];
        for set in &doc.button_sets {
            lines.push(format!(
                "  {} {}  {} buttons",
                marker(doc.active_set.as_deref() == Some(set.name.as_str())),
                set.name,
                set.buttons.len()
            ));
        }
        lines
    }

    fn write_tree(&self, buttons: &[Button], depth: usize, out: &mut Vec<String>) {
        for button in buttons {
            let indent = "  ".repeat(depth + 1);
            let shortcut = button
                .shortcut
                .as_deref()
                .map(|s| format!("[{s}] "))
                .unwrap_or_default();
            let detail = if button.is_group() {
                self.paint(&Style::new().cyan(), "(group)")
            } else {
                button
                    .command
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .map_or_else(
                        || self.paint(&Style::new().dim(), "(no command)"),
                        |c| self.paint(&Style::new().dim(), c),
                    )
            };
            out.push(format!("{indent}{shortcut}{}  {detail}", button.name));
            self.write_tree(button.children(), depth + 1, out);
        }
    }
}

impl Output for HumanOutput {
    fn error(&self, error: &QbError) {
        self.fail(&error.user_message());
        if let Some(hint) = error.suggestion() {
            eprintln!("  {}", self.paint(&Style::new().yellow(), hint));
        }
    }

    fn export_result(&self, result: &ExportResult) {
        match (&result.file_path, &result.error) {
            (Some(path), _) if result.success => self.ok(&format!(
                "Exported {} buttons to {}",
                result.button_count,
                path.display()
            )),
            (_, Some(error)) => self.fail(error),
            _ => self.cancelled("Export cancelled: no output location given (use --output)"),
        }
    }

    fn import_result(&self, result: &ImportResult) {
        if result.success {
            self.ok(&format!(
                "Imported {} buttons ({} updated in place)",
                result.imported_count, result.conflicts_resolved
            ));
            if let Some(path) = &result.backup_path {
                println!("  Backup: {}", path.display());
            }
        } else if let Some(error) = &result.error {
            self.fail(error);
        } else {
            self.cancelled("Import cancelled: no file given");
        }
    }

    fn preview_failed(&self, error: Option<&str>) {
        match error {
            Some(error) => self.fail(error),
            None => self.cancelled("Preview cancelled: no file given"),
        }
    }

    fn preview(&self, preview: &ImportPreviewData, saved_to: Option<&Path>) {
        let analysis = &preview.analysis;
        self.heading(&format!(
            "Import preview: {} → {}",
            preview.source_target, preview.target_scope
        ));
        println!("  File: {}", preview.file_uri.display());

        let green = Style::new().green();
        let yellow = Style::new().yellow();
        for button in &analysis.added {
            println!("  {} {}", self.paint(&green, "+"), button.name);
        }
        for pair in &analysis.modified {
            println!("  {} {}", self.paint(&yellow, "~"), pair.imported_button.name);
        }
        println!(
            "  {} added, {} modified, {} unchanged",
            analysis.added.len(),
            analysis.modified.len(),
            analysis.unchanged.len()
        );

        if analysis.has_shortcut_conflicts() {
            self.heading("Shortcut conflicts");
            for conflict in &analysis.shortcut_conflicts {
                let names: Vec<String> = conflict
                    .buttons
                    .iter()
                    .map(|b| {
                        let source = match b.source {
                            ButtonSource::Existing => "existing",
                            ButtonSource::Imported => "imported",
                        };
                        format!("{} ({source})", b.name)
                    })
                    .collect();
                println!(
                    "  {} {}",
                    self.paint(&Style::new().red(), &format!("[{}]", conflict.shortcut)),
                    names.join(", ")
                );
            }
        }

        match saved_to {
            Some(path) => println!(
                "\nConfirm within 5 minutes: {}",
                self.paint(&Style::new().bold(), &format!("qb confirm {}", path.display()))
            ),
            None => println!("\nNothing written. Re-run with --save <PATH> to confirm later."),
        }
    }

    fn validation(&self, path: &Path, data: &ExportFormat) {
        let total: usize = data.buttons.iter().map(Button::count).sum();
        self.ok(&format!(
            "{} is a valid export ({} top-level buttons, {} total, from {} scope)",
            path.display(),
            data.buttons.len(),
            total,
            data.configuration_target
        ));
    }

    fn button_tree(&self, scope: ConfigurationTarget, buttons: &[Button]) {
        self.heading(&format!("Buttons ({scope})"));
        if buttons.is_empty() {
            println!("  No buttons configured");
            return;
        }
        let mut lines = Vec::new();
        self.write_tree(buttons, 0, &mut lines);
        for line in lines {
            println!("{line}");
        }
    }

    fn backups(&self, entries: &[BackupEntry]) {
        self.heading("Backups");
        if entries.is_empty() {
            println!("  No backups yet");
            return;
        }
        for entry in entries {
            println!("  {:<10} {}", entry.scope.to_string(), entry.path.display());
        }
    }

    fn sets(&self, scope: ConfigurationTarget, doc: &ScopeDocument) {
        self.heading(&format!("Button sets ({scope})"));
        for line in self.set_lines(doc) {
            println!("{line}");
        }
    }
}
