//! Manager flows: export, import, preview and confirm.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::{Value, json};

use qb::button::{Button, ConfigurationTarget};
use qb::error::QbError;
use qb::store::PresetDialog;
use qb::transfer::{
    BACKUP_DIR_NAME, ImportExportManager, ImportPreviewData, ImportStrategy, MAX_IMPORT_FILE_SIZE,
    read_import_file, validate_import_data,
};

use crate::common::fixtures::export_doc;
use crate::common::init_test_logging;
use crate::common::mocks::{MemoryFs, MemoryStore};

const ROOT: &str = "/data";
const IMPORT_FILE: &str = "/in/buttons.json";

fn storage_root() -> PathBuf {
    PathBuf::from(ROOT)
}

fn manager(store: &Arc<MemoryStore>, fs: &Arc<MemoryFs>, dialog: PresetDialog) -> ImportExportManager {
    ImportExportManager::new(store.clone(), fs.clone(), Arc::new(dialog), &storage_root())
}

fn live_buttons() -> Vec<Button> {
    vec![
        Button::new("A").with_command("echo a"),
        Button::new("B").with_command("echo b"),
    ]
}

fn seeded_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_buttons(ConfigurationTarget::Workspace, live_buttons()))
}

fn fs_with_import(buttons: Value) -> Arc<MemoryFs> {
    let fs = MemoryFs::new();
    fs.insert(IMPORT_FILE, export_doc("global", buttons).to_string());
    Arc::new(fs)
}

fn names(buttons: &[Button]) -> Vec<&str> {
    buttons.iter().map(|b| b.name.as_str()).collect()
}

// ===== Export =====

#[tokio::test]
async fn export_writes_stripped_payload_to_chosen_path() {
    init_test_logging();
    let store = Arc::new(MemoryStore::with_buttons(
        ConfigurationTarget::Workspace,
        vec![Button::new("Build").with_command("npm run build")],
    ));
    let fs = Arc::new(MemoryFs::new());
    let out = Path::new("/out/buttons.json");
    let mgr = manager(&store, &fs, PresetDialog::cancelled().with_save(out));

    let result = mgr.export_configuration(ConfigurationTarget::Workspace).await;

    assert!(result.success, "{result:?}");
    assert_eq!(result.button_count, 1);
    assert_eq!(result.file_path.as_deref(), Some(out));

    let written: Value = serde_json::from_str(&fs.contents(out).unwrap()).unwrap();
    assert_eq!(written["version"], "1.0");
    assert_eq!(written["configurationTarget"], "workspace");
    assert_eq!(written["buttons"][0]["command"], "npm run build");
    assert!(written["buttons"][0].get("id").is_none());
    assert!(written["exportedAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn export_cancelled_writes_nothing() {
    let store = seeded_store();
    let fs = Arc::new(MemoryFs::new());
    let mgr = manager(&store, &fs, PresetDialog::cancelled());

    let result = mgr.export_configuration(ConfigurationTarget::Workspace).await;

    assert!(!result.success);
    assert!(result.error.is_none());
    assert!(result.is_cancelled());
    assert!(fs.paths_under(Path::new("/")).is_empty());
}

#[tokio::test]
async fn exported_file_validates_as_import() {
    let store = seeded_store();
    let fs = Arc::new(MemoryFs::new());
    let out = Path::new("/out/e.json");
    let mgr = manager(&store, &fs, PresetDialog::cancelled().with_save(out));
    assert!(mgr.export_configuration(ConfigurationTarget::Workspace).await.success);

    let parsed = validate_import_data(&fs.contents(out).unwrap()).unwrap();
    assert_eq!(names(&parsed.buttons), vec!["A", "B"]);
    assert!(parsed.buttons.iter().all(|b| b.id.is_none()));
}

// ===== Import =====

#[tokio::test]
async fn import_merge_backs_up_then_writes() {
    init_test_logging();
    let store = seeded_store();
    let fs = fs_with_import(json!([
        { "name": "B", "command": "echo B2" },
        { "name": "C", "command": "echo c" }
    ]));
    let mgr = manager(&store, &fs, PresetDialog::cancelled());

    let result = mgr
        .import_configuration(
            ConfigurationTarget::Workspace,
            Some(Path::new(IMPORT_FILE)),
            ImportStrategy::Merge,
        )
        .await;

    assert!(result.success, "{result:?}");
    assert_eq!(result.imported_count, 2);
    assert_eq!(result.conflicts_resolved, 1);

    let backup = result.backup_path.expect("backup path");
    assert!(backup.starts_with(Path::new(ROOT).join(BACKUP_DIR_NAME)));
    let snapshot = validate_import_data(&fs.contents(&backup).unwrap()).unwrap();
    assert_eq!(names(&snapshot.buttons), vec!["A", "B"]);

    let live = store.buttons(ConfigurationTarget::Workspace);
    assert_eq!(names(&live), vec!["A", "B", "C"]);
    assert_eq!(live[1].command.as_deref(), Some("echo B2"));
    assert!(live.iter().all(|b| b.id.is_some()));
    assert_eq!(store.write_count(), 1);
    assert_eq!(store.configuration_target(), Some(ConfigurationTarget::Workspace));
}

#[tokio::test]
async fn import_merge_keeps_existing_identifier_on_overwrite() {
    let store = seeded_store();
    let before = store.buttons(ConfigurationTarget::Workspace);
    let fs = fs_with_import(json!([{ "name": "A", "command": "echo changed" }]));
    let mgr = manager(&store, &fs, PresetDialog::cancelled());

    let result = mgr
        .import_configuration(
            ConfigurationTarget::Workspace,
            Some(Path::new(IMPORT_FILE)),
            ImportStrategy::Merge,
        )
        .await;
    assert!(result.success);

    let after = store.buttons(ConfigurationTarget::Workspace);
    assert_eq!(after[0].id, before[0].id);
    assert_eq!(after[0].command.as_deref(), Some("echo changed"));
}

#[tokio::test]
async fn import_replace_drops_unlisted_buttons() {
    let store = seeded_store();
    let fs = fs_with_import(json!([{ "name": "Z", "command": "echo z" }]));
    let mgr = manager(&store, &fs, PresetDialog::cancelled());

    let result = mgr
        .import_configuration(
            ConfigurationTarget::Workspace,
            Some(Path::new(IMPORT_FILE)),
            ImportStrategy::Replace,
        )
        .await;

    assert!(result.success);
    assert_eq!(result.conflicts_resolved, 0);
    assert_eq!(names(&store.buttons(ConfigurationTarget::Workspace)), vec!["Z"]);
}

#[tokio::test]
async fn import_discards_identifiers_from_file() {
    let store = Arc::new(MemoryStore::default());
    let fs = fs_with_import(json!([{ "id": "from-file", "name": "A" }]));
    let mgr = manager(&store, &fs, PresetDialog::cancelled());

    let result = mgr
        .import_configuration(
            ConfigurationTarget::Global,
            Some(Path::new(IMPORT_FILE)),
            ImportStrategy::Merge,
        )
        .await;
    assert!(result.success);

    let live = store.buttons(ConfigurationTarget::Global);
    let id = live[0].id.as_ref().expect("fresh id");
    assert_ne!(id.as_str(), "from-file");
}

#[tokio::test]
async fn import_aborts_without_write_when_backup_fails() {
    init_test_logging();
    let store = seeded_store();
    let fs = MemoryFs::new().failing_under(Path::new(ROOT).join(BACKUP_DIR_NAME));
    fs.insert(IMPORT_FILE, export_doc("global", json!([{ "name": "C" }])).to_string());
    let fs = Arc::new(fs);
    let mgr = manager(&store, &fs, PresetDialog::cancelled());

    let result = mgr
        .import_configuration(
            ConfigurationTarget::Workspace,
            Some(Path::new(IMPORT_FILE)),
            ImportStrategy::Merge,
        )
        .await;

    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.starts_with("Backup failed"), "{error}");
    assert_eq!(store.write_count(), 0);
    assert_eq!(names(&store.buttons(ConfigurationTarget::Workspace)), vec!["A", "B"]);
}

#[tokio::test]
async fn import_reports_write_failure_after_backup() {
    let store = Arc::new(
        MemoryStore::with_buttons(ConfigurationTarget::Workspace, live_buttons()).failing_writes(),
    );
    let fs = fs_with_import(json!([{ "name": "C" }]));
    let mgr = manager(&store, &fs, PresetDialog::cancelled());

    let result = mgr
        .import_configuration(
            ConfigurationTarget::Workspace,
            Some(Path::new(IMPORT_FILE)),
            ImportStrategy::Merge,
        )
        .await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("store is read-only"));
    // The backup taken before the failed write stays on disk.
    assert_eq!(fs.paths_under(&Path::new(ROOT).join(BACKUP_DIR_NAME)).len(), 1);
}

#[tokio::test]
async fn oversized_file_is_rejected_before_reading() {
    let store = seeded_store();
    let fs = fs_with_import(json!([]));
    fs.fake_size(IMPORT_FILE, MAX_IMPORT_FILE_SIZE + 1);
    let mgr = manager(&store, &fs, PresetDialog::cancelled());

    let result = mgr
        .import_configuration(
            ConfigurationTarget::Workspace,
            Some(Path::new(IMPORT_FILE)),
            ImportStrategy::Merge,
        )
        .await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("too large"));
    assert_eq!(fs.read_count(), 0);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn standalone_read_applies_size_limit() {
    let fs = fs_with_import(json!([{ "name": "C" }]));
    fs.fake_size(IMPORT_FILE, MAX_IMPORT_FILE_SIZE + 1);

    let err = read_import_file(fs.as_ref(), Path::new(IMPORT_FILE))
        .await
        .unwrap_err();

    assert!(matches!(err, QbError::FileTooLarge { .. }), "{err:?}");
    assert_eq!(fs.read_count(), 0);
}

#[tokio::test]
async fn file_at_size_limit_is_accepted() {
    let store = seeded_store();
    let fs = fs_with_import(json!([]));
    fs.fake_size(IMPORT_FILE, MAX_IMPORT_FILE_SIZE);
    let mgr = manager(&store, &fs, PresetDialog::cancelled());

    let result = mgr
        .preview_import(ConfigurationTarget::Workspace, Some(Path::new(IMPORT_FILE)))
        .await;
    assert!(result.success, "{result:?}");
}

#[tokio::test]
async fn invalid_file_names_the_offending_field() {
    let store = seeded_store();
    let fs = fs_with_import(json!([{ "name": "G", "group": [{ "name": "" }] }]));
    let mgr = manager(&store, &fs, PresetDialog::cancelled());

    let result = mgr
        .import_configuration(
            ConfigurationTarget::Workspace,
            Some(Path::new(IMPORT_FILE)),
            ImportStrategy::Merge,
        )
        .await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("buttons[0].group[0].name"));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn import_without_file_is_a_quiet_cancellation() {
    let store = seeded_store();
    let fs = Arc::new(MemoryFs::new());
    let mgr = manager(&store, &fs, PresetDialog::cancelled());

    let result = mgr
        .import_configuration(ConfigurationTarget::Workspace, None, ImportStrategy::Merge)
        .await;

    assert!(result.is_cancelled());
    assert!(result.backup_path.is_none());
}

#[tokio::test]
async fn import_uses_dialog_answer_when_no_file_given() {
    let store = seeded_store();
    let fs = fs_with_import(json!([{ "name": "C" }]));
    let mgr = manager(&store, &fs, PresetDialog::cancelled().with_open(IMPORT_FILE));

    let result = mgr
        .import_configuration(ConfigurationTarget::Workspace, None, ImportStrategy::Merge)
        .await;

    assert!(result.success);
    assert_eq!(names(&store.buttons(ConfigurationTarget::Workspace)), vec!["A", "B", "C"]);
}

// ===== Preview / confirm =====

#[tokio::test]
async fn preview_never_writes() {
    let store = seeded_store();
    let fs = fs_with_import(json!([
        { "name": "A", "command": "echo a" },
        { "name": "B", "command": "echo B2" },
        { "name": "C" }
    ]));
    let mgr = manager(&store, &fs, PresetDialog::cancelled());

    let result = mgr
        .preview_import(ConfigurationTarget::Workspace, Some(Path::new(IMPORT_FILE)))
        .await;

    assert!(result.success);
    let preview = result.preview.unwrap();
    assert_eq!(preview.analysis.added.len(), 1);
    assert_eq!(preview.analysis.modified.len(), 1);
    assert_eq!(preview.analysis.unchanged.len(), 1);
    assert_eq!(preview.analysis.total(), 3);
    assert_eq!(preview.source_target, ConfigurationTarget::Global);
    assert_eq!(preview.target_scope, ConfigurationTarget::Workspace);
    assert_eq!(preview.file_uri, PathBuf::from(IMPORT_FILE));

    assert_eq!(store.write_count(), 0);
    assert!(fs.paths_under(&Path::new(ROOT).join(BACKUP_DIR_NAME)).is_empty());
}

#[tokio::test]
async fn confirm_commits_a_fresh_preview() {
    let store = seeded_store();
    let fs = fs_with_import(json!([{ "name": "C", "command": "echo c" }]));
    let mgr = manager(&store, &fs, PresetDialog::cancelled());

    let preview = mgr
        .preview_import(ConfigurationTarget::Workspace, Some(Path::new(IMPORT_FILE)))
        .await
        .preview
        .unwrap();
    let result = mgr
        .confirm_import(preview, ConfigurationTarget::Workspace, ImportStrategy::Merge)
        .await;

    assert!(result.success, "{result:?}");
    assert!(result.backup_path.is_some());
    assert_eq!(names(&store.buttons(ConfigurationTarget::Workspace)), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn confirm_aborts_without_write_when_backup_fails() {
    init_test_logging();
    let store = seeded_store();
    let fs = MemoryFs::new().failing_under(Path::new(ROOT).join(BACKUP_DIR_NAME));
    fs.insert(IMPORT_FILE, export_doc("global", json!([{ "name": "C" }])).to_string());
    let fs = Arc::new(fs);
    let mgr = manager(&store, &fs, PresetDialog::cancelled());

    let preview = mgr
        .preview_import(ConfigurationTarget::Workspace, Some(Path::new(IMPORT_FILE)))
        .await
        .preview
        .unwrap();
    let result = mgr
        .confirm_import(preview, ConfigurationTarget::Workspace, ImportStrategy::Merge)
        .await;

    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.starts_with("Backup failed"), "{error}");
    assert_eq!(store.write_count(), 0);
    assert_eq!(names(&store.buttons(ConfigurationTarget::Workspace)), vec!["A", "B"]);
}

async fn stale_preview(mgr: &ImportExportManager) -> ImportPreviewData {
    let mut preview = mgr
        .preview_import(ConfigurationTarget::Workspace, Some(Path::new(IMPORT_FILE)))
        .await
        .preview
        .unwrap();
    preview.timestamp = Utc::now() - Duration::seconds(301);
    preview
}

#[tokio::test]
async fn confirm_rejects_expired_preview_without_io() {
    let store = seeded_store();
    let fs = fs_with_import(json!([{ "name": "C" }]));
    let mgr = manager(&store, &fs, PresetDialog::cancelled());
    let preview = stale_preview(&mgr).await;
    let reads = fs.read_count();

    let result = mgr
        .confirm_import(preview, ConfigurationTarget::Workspace, ImportStrategy::Merge)
        .await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("expired"));
    assert_eq!(fs.read_count(), reads);
    assert_eq!(store.write_count(), 0);
    assert!(fs.paths_under(&Path::new(ROOT).join(BACKUP_DIR_NAME)).is_empty());
}

#[tokio::test]
async fn confirm_checks_expiry_before_scope() {
    let store = seeded_store();
    let fs = fs_with_import(json!([{ "name": "C" }]));
    let mgr = manager(&store, &fs, PresetDialog::cancelled());
    let preview = stale_preview(&mgr).await;

    let result = mgr
        .confirm_import(preview, ConfigurationTarget::Global, ImportStrategy::Merge)
        .await;

    assert!(result.error.unwrap().contains("expired"));
}

#[tokio::test]
async fn confirm_rejects_scope_mismatch() {
    let store = seeded_store();
    let fs = fs_with_import(json!([{ "name": "C" }]));
    let mgr = manager(&store, &fs, PresetDialog::cancelled());
    let preview = mgr
        .preview_import(ConfigurationTarget::Workspace, Some(Path::new(IMPORT_FILE)))
        .await
        .preview
        .unwrap();

    let result = mgr
        .confirm_import(preview, ConfigurationTarget::Global, ImportStrategy::Merge)
        .await;

    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.contains("workspace") && error.contains("global"), "{error}");
    assert_eq!(store.write_count(), 0);
}
