//! Robot-mode end-to-end tests.

use serde_json::{Value, json};

use crate::common::cli::CliRunner;
use crate::common::fixtures::{TestEnv, export_doc, read_json};

fn seeded() -> TestEnv {
    let env = TestEnv::new();
    env.write_scope(
        "workspace",
        &json!({ "buttons": [
            { "name": "A", "command": "echo a", "shortcut": "a" },
            { "name": "B", "command": "echo b" }
        ] }),
    );
    env
}

#[test]
fn export_result_is_json() {
    let env = seeded();
    let out = env.path("out.json");
    let result = CliRunner::new()
        .with_config(env.settings_path())
        .run_robot(&["export", "--output", out.to_str().unwrap()]);

    result
        .assert_success()
        .assert_json_field("/success", &json!(true))
        .assert_json_field("/buttonCount", &json!(2));

    let exported = read_json(&out);
    assert_eq!(exported["configurationTarget"], "workspace");
    assert!(exported["buttons"][0].get("id").is_none());
}

#[test]
fn preview_save_then_confirm() {
    let env = seeded();
    let file = env.write_export(
        "in.json",
        &export_doc("global", json!([
            { "name": "B", "command": "echo B2" },
            { "name": "C", "command": "echo c", "shortcut": "A" }
        ])),
    );
    let saved = env.path("preview.json");
    let cli = CliRunner::new().with_config(env.settings_path());

    let preview = cli.run_robot(&[
        "preview",
        file.to_str().unwrap(),
        "--save",
        saved.to_str().unwrap(),
    ]);
    preview.assert_success();
    let json = preview.json();
    assert_eq!(json["preview"]["analysis"]["added"].as_array().unwrap().len(), 1);
    assert_eq!(json["preview"]["analysis"]["modified"].as_array().unwrap().len(), 1);
    assert_eq!(
        json["preview"]["analysis"]["shortcutConflicts"][0]["shortcut"],
        "a"
    );
    assert!(env.backup_files().is_empty());

    let confirm = cli.run_robot(&["confirm", saved.to_str().unwrap()]);
    confirm
        .assert_success()
        .assert_json_field("/importedCount", &json!(2))
        .assert_json_field("/conflictsResolved", &json!(1));

    let names: Vec<Value> = env.read_scope("workspace")["buttons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("A"), json!("B"), json!("C")]);
}

#[test]
fn saved_preview_confirms_only_once() {
    let env = seeded();
    let file = env.write_export("in.json", &export_doc("global", json!([{ "name": "C" }])));
    let saved = env.path("preview.json");
    let cli = CliRunner::new().with_config(env.settings_path());

    cli.run_robot(&["preview", file.to_str().unwrap(), "--save", saved.to_str().unwrap()])
        .assert_success();
    cli.run_robot(&["confirm", saved.to_str().unwrap()])
        .assert_success();
    assert!(!saved.exists());
    let after_first = env.read_scope("workspace");

    let second = cli.run_robot(&["confirm", saved.to_str().unwrap(), "--strategy", "replace"]);
    second.assert_failure();
    assert_eq!(second.stderr_json()["error"], json!(true));
    assert_eq!(env.read_scope("workspace"), after_first);
    assert_eq!(env.backup_files().len(), 1);
}

#[test]
fn confirm_with_other_scope_is_rejected() {
    let env = seeded();
    let file = env.write_export("in.json", &export_doc("global", json!([{ "name": "C" }])));
    let saved = env.path("preview.json");
    let cli = CliRunner::new().with_config(env.settings_path());

    cli.run_robot(&["preview", file.to_str().unwrap(), "--save", saved.to_str().unwrap()])
        .assert_success();

    let result = cli.run_robot(&["confirm", saved.to_str().unwrap(), "--scope", "global"]);
    result.assert_failure();
    assert_eq!(result.json()["success"], json!(false));
    assert!(result.json()["error"].as_str().unwrap().contains("Scope mismatch"));
    assert!(env.backup_files().is_empty());
}

#[test]
fn backups_listed_newest_first() {
    let env = seeded();
    let file = env.write_export("in.json", &export_doc("global", json!([{ "name": "C" }])));
    let cli = CliRunner::new().with_config(env.settings_path());

    cli.run_robot(&["import", file.to_str().unwrap()]).assert_success();
    cli.run_robot(&["import", file.to_str().unwrap(), "--strategy", "replace"])
        .assert_success();

    let listed = cli.run_robot(&["backups"]);
    listed.assert_success();
    let entries = listed.json();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0]["fileName"].as_str() >= entries[1]["fileName"].as_str());
}

#[test]
fn errors_go_to_stderr_as_json() {
    let env = TestEnv::new();
    let result = CliRunner::new()
        .with_config(env.settings_path())
        .run_robot(&["validate", env.path("missing.json").to_str().unwrap()]);

    result.assert_failure();
    let err = result.stderr_json();
    assert_eq!(err["error"], json!(true));
    assert!(err.get("message").is_some());
    assert!(err.get("recoverable").is_some());
}

fn with_sets() -> TestEnv {
    let env = TestEnv::new();
    env.write_scope(
        "workspace",
        &json!({
            "buttons": [{ "name": "Root" }],
            "buttonSets": [
                { "name": "Ops", "buttons": [{ "name": "Deploy" }, { "name": "Logs" }] },
                { "name": "Docs", "buttons": [] }
            ]
        }),
    );
    env
}

#[test]
fn sets_lists_every_set() {
    let env = with_sets();
    let result = CliRunner::new()
        .with_config(env.settings_path())
        .run_robot(&["sets"]);

    result
        .assert_success()
        .assert_json_field("/scope", &json!("workspace"))
        .assert_json_field("/activeSet", &json!(null))
        .assert_json_field("/rootButtons", &json!(1))
        .assert_json_field("/sets/0/name", &json!("Ops"))
        .assert_json_field("/sets/0/buttons", &json!(2));
}

#[test]
fn switch_persists_active_set() {
    let env = with_sets();
    let cli = CliRunner::new().with_config(env.settings_path());

    cli.run_robot(&["switch", "Ops"])
        .assert_success()
        .assert_json_field("/activeSet", &json!("Ops"));
    assert_eq!(env.read_scope("workspace")["activeSet"], json!("Ops"));

    cli.run_robot(&["switch"]).assert_success();
    assert!(env.read_scope("workspace").get("activeSet").is_none());
}

#[test]
fn switch_to_unknown_set_fails() {
    let env = with_sets();
    let result = CliRunner::new()
        .with_config(env.settings_path())
        .run_robot(&["switch", "Missing"]);

    result.assert_failure();
    let err = result.stderr_json();
    assert!(err["message"].as_str().unwrap().contains("Missing"));
    assert_eq!(err["recoverable"], json!(true));
    assert!(env.read_scope("workspace").get("activeSet").is_none());
}
