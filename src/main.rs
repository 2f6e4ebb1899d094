//! Quick Buttons CLI - export, import and back up command button configurations.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use tracing::{debug, instrument};

use qb::button::ConfigurationTarget;
use qb::cli::{
    Cli, Commands, CompletionsArgs, ConfirmArgs, ExportArgs, ImportArgs, ListArgs, PreviewArgs,
    SwitchArgs, ValidateArgs,
};
use qb::config::{Settings, load_settings};
use qb::error::{QbError, Result, ResultExt};
use qb::logging::init_logging;
use qb::output::{Output, OutputMode};
use qb::store::{ConfigStore, FileSystem, JsonConfigStore, LocalFileSystem, PresetDialog};
use qb::transfer::{ImportExportManager, ImportPreviewData, ImportStrategy, read_import_file};

/// Everything a command needs, resolved once from flags and settings.
struct Context {
    settings: Settings,
    storage_root: PathBuf,
    fs: Arc<dyn FileSystem>,
    store: Arc<JsonConfigStore>,
}

impl Context {
    fn load(cli: &Cli) -> Result<Self> {
        let (settings, base_dir) = load_settings(cli.config.as_deref())?;
        let storage_root = settings.storage_root(&base_dir)?;
        debug!(storage_root = %storage_root.display(), "Storage root resolved");

        let fs: Arc<dyn FileSystem> = Arc::new(LocalFileSystem);
        let store = Arc::new(JsonConfigStore::new(Arc::clone(&fs), &storage_root));
        Ok(Self {
            settings,
            storage_root,
            fs,
            store,
        })
    }

    fn scope(&self, requested: Option<ConfigurationTarget>) -> ConfigurationTarget {
        requested.unwrap_or(self.settings.default_scope)
    }

    fn strategy(&self, requested: Option<ImportStrategy>) -> ImportStrategy {
        requested.unwrap_or(self.settings.default_strategy)
    }

    fn manager(&self, dialog: PresetDialog) -> ImportExportManager {
        ImportExportManager::new(
            self.store.clone(),
            Arc::clone(&self.fs),
            Arc::new(dialog),
            &self.storage_root,
        )
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let mode = OutputMode::from_cli(&cli);
    init_logging(mode.is_robot(), cli.verbose, cli.quiet);

    let output = mode.into_output();
    match run(&cli, output.as_ref()).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            output.error(&e);
            std::process::exit(1);
        }
    }
}

/// Run the selected command. `Ok(false)` means the command reported a failed result.
async fn run(cli: &Cli, output: &dyn Output) -> Result<bool> {
    if let Commands::Completions(args) = &cli.command {
        return Ok(cmd_completions(args));
    }

    let ctx = Context::load(cli)?;
    match &cli.command {
        Commands::Export(args) => cmd_export(&ctx, output, args).await,
        Commands::Import(args) => cmd_import(&ctx, output, args).await,
        Commands::Preview(args) => cmd_preview(&ctx, output, args).await,
        Commands::Confirm(args) => cmd_confirm(&ctx, output, args).await,
        Commands::Validate(args) => cmd_validate(&ctx, output, args).await,
        Commands::List(args) => cmd_list(&ctx, output, args).await,
        Commands::Sets(args) => cmd_sets(&ctx, output, args).await,
        Commands::Switch(args) => cmd_switch(&ctx, output, args).await,
        Commands::Backups => cmd_backups(&ctx, output).await,
        Commands::Completions(args) => Ok(cmd_completions(args)),
    }
}

#[instrument(skip_all)]
async fn cmd_export(ctx: &Context, output: &dyn Output, args: &ExportArgs) -> Result<bool> {
    let dialog = args
        .output
        .as_ref()
        .map_or_else(PresetDialog::cancelled, |path| {
            PresetDialog::cancelled().with_save(path)
        });
    let result = ctx
        .manager(dialog)
        .export_configuration(ctx.scope(args.scope))
        .await;
    output.export_result(&result);
    Ok(result.success)
}

#[instrument(skip_all)]
async fn cmd_import(ctx: &Context, output: &dyn Output, args: &ImportArgs) -> Result<bool> {
    let result = ctx
        .manager(PresetDialog::cancelled())
        .import_configuration(
            ctx.scope(args.scope),
            args.file.as_deref(),
            ctx.strategy(args.strategy),
        )
        .await;
    output.import_result(&result);
    Ok(result.success)
}

#[instrument(skip_all)]
async fn cmd_preview(ctx: &Context, output: &dyn Output, args: &PreviewArgs) -> Result<bool> {
    let result = ctx
        .manager(PresetDialog::cancelled())
        .preview_import(ctx.scope(args.scope), args.file.as_deref())
        .await;

    let Some(preview) = result.preview.filter(|_| result.success) else {
        output.preview_failed(result.error.as_deref());
        return Ok(false);
    };

    if let Some(path) = &args.save {
        save_preview(ctx, path, &preview).await?;
    }
    output.preview(&preview, args.save.as_deref());
    Ok(true)
}

#[instrument(skip_all)]
async fn cmd_confirm(ctx: &Context, output: &dyn Output, args: &ConfirmArgs) -> Result<bool> {
    let preview = load_preview(ctx, &args.preview).await?;
    // A saved preview is single-use, whatever the outcome of the commit.
    ctx.fs.remove_file(&args.preview).await?;
    debug!(path = %args.preview.display(), "Preview file consumed");
    let scope = args.scope.unwrap_or(preview.target_scope);
    let result = ctx
        .manager(PresetDialog::cancelled())
        .confirm_import(preview, scope, ctx.strategy(args.strategy))
        .await;
    output.import_result(&result);
    Ok(result.success)
}

#[instrument(skip_all)]
async fn cmd_validate(ctx: &Context, output: &dyn Output, args: &ValidateArgs) -> Result<bool> {
    let data = read_import_file(ctx.fs.as_ref(), &args.file).await?;
    output.validation(&args.file, &data);
    Ok(true)
}

#[instrument(skip_all)]
async fn cmd_list(ctx: &Context, output: &dyn Output, args: &ListArgs) -> Result<bool> {
    let scope = ctx.scope(args.scope);
    let buttons = ctx.store.buttons_for_scope(scope).await?;
    output.button_tree(scope, &buttons);
    Ok(true)
}

#[instrument(skip_all)]
async fn cmd_sets(ctx: &Context, output: &dyn Output, args: &ListArgs) -> Result<bool> {
    let scope = ctx.scope(args.scope);
    let doc = ctx.store.load_document(scope).await?;
    output.sets(scope, &doc);
    Ok(true)
}

#[instrument(skip_all)]
async fn cmd_switch(ctx: &Context, output: &dyn Output, args: &SwitchArgs) -> Result<bool> {
    let scope = ctx.scope(args.scope);
    let doc = ctx.store.switch_set(scope, args.name.as_deref()).await?;
    output.sets(scope, &doc);
    Ok(true)
}

#[instrument(skip_all)]
async fn cmd_backups(ctx: &Context, output: &dyn Output) -> Result<bool> {
    let manager = ctx.manager(PresetDialog::cancelled());
    let entries = manager.backups().list_backups().await?;
    output.backups(&entries);
    Ok(true)
}

fn cmd_completions(args: &CompletionsArgs) -> bool {
    clap_complete::generate(args.shell, &mut Cli::command(), "qb", &mut io::stdout());
    true
}

// === Utility Functions ===

async fn save_preview(ctx: &Context, path: &Path, preview: &ImportPreviewData) -> Result<()> {
    let json = serde_json::to_string_pretty(preview)
        .map_err(|e| QbError::Other(format!("Failed to serialize preview: {e}")))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ctx.fs.create_directory(parent).await?;
    }
    ctx.fs
        .write_file(path, &json)
        .await
        .with_context(|| format!("Failed to save preview to {}", path.display()))
}

async fn load_preview(ctx: &Context, path: &Path) -> Result<ImportPreviewData> {
    let raw = ctx.fs.read_file(path).await?;
    serde_json::from_str(&raw).map_err(|e| {
        QbError::ConfigParse(format!("Preview file '{}' is not valid: {e}", path.display()))
    })
}
