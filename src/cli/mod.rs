//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::button::ConfigurationTarget;
use crate::transfer::ImportStrategy;

/// Quick Buttons - export, import and back up command button configurations.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "qb", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "QB_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are logged)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Settings file (.toml, .yaml or .yml)
    #[arg(long, global = true, env = "QB_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the buttons of a scope to a file
    Export(ExportArgs),

    /// Import a file into a scope (backs up the scope first)
    Import(ImportArgs),

    /// Show what an import would change without writing anything
    Preview(PreviewArgs),

    /// Commit a saved preview
    Confirm(ConfirmArgs),

    /// Check an import file without touching the configuration
    Validate(ValidateArgs),

    /// Show the buttons of a scope
    List(ListArgs),

    /// Show the button sets of a scope and which one is active
    Sets(ListArgs),

    /// Activate a button set (omit the name to go back to the root buttons)
    Switch(SwitchArgs),

    /// List backup files
    Backups,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Scope to export (defaults to the configured default scope)
    #[arg(long, short = 's')]
    pub scope: Option<ConfigurationTarget>,

    /// Output file or directory. Without it the export is cancelled.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Export file to import
    pub file: Option<PathBuf>,

    /// Scope to import into
    #[arg(long, short = 's')]
    pub scope: Option<ConfigurationTarget>,

    /// How to combine with the existing buttons
    #[arg(long)]
    pub strategy: Option<ImportStrategy>,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Export file to preview
    pub file: Option<PathBuf>,

    /// Scope to compare against
    #[arg(long, short = 's')]
    pub scope: Option<ConfigurationTarget>,

    /// Save the preview so it can be confirmed later
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConfirmArgs {
    /// Preview file written by `qb preview --save`
    pub preview: PathBuf,

    /// Scope to import into (must match the preview)
    #[arg(long, short = 's')]
    pub scope: Option<ConfigurationTarget>,

    /// How to combine with the existing buttons
    #[arg(long)]
    pub strategy: Option<ImportStrategy>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Export file to check
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Scope to show
    #[arg(long, short = 's')]
    pub scope: Option<ConfigurationTarget>,
}

#[derive(Args, Debug)]
pub struct SwitchArgs {
    /// Set to activate
    pub name: Option<String>,

    /// Scope whose set changes
    #[arg(long, short = 's')]
    pub scope: Option<ConfigurationTarget>,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: Shell,
}
