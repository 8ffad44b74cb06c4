//! Integration tests for keel-cli.

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn graph_json(bundle_id: &str, with_sources: bool) -> String {
    let sources = if with_sources {
        r#"[{ "path": "/ws/App/Sources/App.swift" }]"#
    } else {
        "[]"
    };
    format!(
        r#"{{
            "name": "Keel",
            "path": "/ws",
            "projects": [
                {{
                    "name": "App",
                    "path": "/ws/App",
                    "targets": [
                        {{
                            "name": "App",
                            "destinations": ["iPhone"],
                            "product": "app",
                            "bundle_id": "{bundle_id}",
                            "sources": {sources}
                        }}
                    ]
                }}
            ]
        }}"#
    )
}

fn write_graph(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("graph.json");
    fs::write(&path, contents).unwrap();
    path
}

fn keel(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("keel");
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .args(["--config", &empty_config(dir).display().to_string()]);
    cmd
}

fn empty_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("keel.toml");
    if !path.exists() {
        fs::write(&path, "").unwrap();
    }
    path
}

#[test]
fn help_lists_the_lint_command() {
    let mut cmd = cargo::cargo_bin_cmd!("keel");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("lint"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag() {
    let mut cmd = cargo::cargo_bin_cmd!("keel");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn clean_graph_exits_zero() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, &graph_json("dev.keel.app", true));

    keel(&dir)
        .args(["lint", graph.to_str().unwrap(), "--xcode-version", "16.2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No linting issues found in Keel"));
}

#[test]
fn lint_errors_exit_five() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, &graph_json("dev.keel.app_1", true));

    keel(&dir)
        .args(["lint", graph.to_str().unwrap(), "--xcode-version", "16.2"])
        .assert()
        .code(5)
        .stdout(predicate::str::contains(
            "Invalid bundle identifier 'dev.keel.app_1'",
        ))
        .stdout(predicate::str::contains("1 error(s), 0 warning(s)"));
}

#[test]
fn warnings_fail_only_when_requested() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, &graph_json("dev.keel.app", false));
    let graph = graph.to_str().unwrap();

    keel(&dir)
        .args(["lint", graph, "--xcode-version", "16.2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "The target App doesn't contain source files.",
        ));

    keel(&dir)
        .args(["lint", graph, "--xcode-version", "16.2", "--fail-on-warnings"])
        .assert()
        .code(5);
}

#[test]
fn fail_on_warnings_can_come_from_the_environment() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, &graph_json("dev.keel.app", false));

    keel(&dir)
        .env("KEEL_LINT__FAIL_ON_WARNINGS", "true")
        .env("KEEL_LINT__XCODE_VERSION", "16.2")
        .args(["lint", graph.to_str().unwrap()])
        .assert()
        .code(5);
}

#[test]
fn json_output_is_a_report() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, &graph_json("dev.keel.app_1", true));

    let assert = keel(&dir)
        .args([
            "lint",
            graph.to_str().unwrap(),
            "--xcode-version",
            "16.2",
            "--format",
            "json",
        ])
        .assert()
        .code(5);

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["graph"], "Keel");
    assert_eq!(report["issues"][0]["severity"], "error");
}

#[test]
fn missing_graph_exits_three() {
    let dir = TempDir::new().unwrap();

    keel(&dir)
        .args(["lint", "absent.json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Graph file not found"));
}

#[test]
fn malformed_graph_exits_two() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, "{ \"name\": ");

    keel(&dir)
        .args(["lint", graph.to_str().unwrap(), "--xcode-version", "16.2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to load graph"));
}

#[test]
fn bad_xcode_version_flag_is_rejected_by_the_parser() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir, &graph_json("dev.keel.app", true));

    keel(&dir)
        .args(["lint", graph.to_str().unwrap(), "--xcode-version", "latest"])
        .assert()
        .code(2);
}

#[test]
fn shell_completions() {
    let mut cmd = cargo::cargo_bin_cmd!("keel");
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("keel"));
}

#[test]
fn config_show_reflects_environment_overrides() {
    let dir = TempDir::new().unwrap();

    keel(&dir)
        .env("KEEL_LINT__MANIFESTS", "true")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("manifests = true"));
}
