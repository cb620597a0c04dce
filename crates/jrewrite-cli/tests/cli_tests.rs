//! Integration tests for the jrewrite CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const SERVICE: &str = "package app;

// Handles requests
public class Service {
    /** Runs the job. */
    public void run(int count) {
        log(count); // trace
    }

    private void log(int count) {}
}
";

const RENAME_SCRIPT: &str = r#"{
  // rename the entry point
  "description": "rename run",
  "operations": [
    { "op": "renameMethod", "typeName": "Service", "method": "run", "newName": "execute" },
  ]
}"#;

#[allow(deprecated)]
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("jrewrite").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

fn create_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src/app");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("Service.java"), SERVICE).unwrap();
    fs::write(src.join("Other.java"), "package app;\n\nclass Other {}\n").unwrap();
    fs::write(temp_dir.path().join("rename.json"), RENAME_SCRIPT).unwrap();
    fs::write(temp_dir.path().join(".jrewrite.json"), "{}").unwrap();
    temp_dir
}

fn service(dir: &Path) -> String {
    fs::read_to_string(dir.join("src/app/Service.java")).unwrap()
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("source-preserving refactorings for Java"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_check_clean_project() {
    let project = create_project();
    cli()
        .current_dir(project.path())
        .args(["check", "src"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 files parse losslessly"));
}

#[test]
fn test_check_reports_syntax_errors() {
    let project = create_project();
    fs::write(project.path().join("src/app/Broken.java"), "class Broken { void f( }\n").unwrap();
    cli()
        .current_dir(project.path())
        .args(["check", "src"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Broken.java"));
}

#[test]
fn test_check_json_output() {
    let project = create_project();
    let output = cli()
        .current_dir(project.path())
        .args(["check", "src", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["filesChecked"], 2);
    assert_eq!(report["summary"]["filesWithIssues"], 0);
}

#[test]
fn test_apply_preview_does_not_write() {
    let project = create_project();
    cli()
        .current_dir(project.path())
        .args(["apply", "rename.json", "src"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would rewrite"));
    assert_eq!(service(project.path()), SERVICE);
}

#[test]
fn test_apply_diff() {
    let project = create_project();
    cli()
        .current_dir(project.path())
        .args(["apply", "rename.json", "src", "--diff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-    public void run(int count) {"))
        .stdout(predicate::str::contains("+    public void execute(int count) {"));
}

#[test]
fn test_apply_write_preserves_untouched_text() {
    let project = create_project();
    cli()
        .current_dir(project.path())
        .args(["apply", "rename.json", "src", "--write"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rewrote"));

    assert_eq!(
        service(project.path()),
        SERVICE.replace("void run(", "void execute(")
    );
    assert_eq!(
        fs::read_to_string(project.path().join("src/app/Other.java")).unwrap(),
        "package app;\n\nclass Other {}\n"
    );
}

#[test]
fn test_apply_check_fails_when_changes_pending() {
    let project = create_project();
    cli()
        .current_dir(project.path())
        .args(["apply", "rename.json", "src", "--check"])
        .assert()
        .code(1);

    assert_eq!(service(project.path()), SERVICE);

    // Files that do not declare the addressed type are left alone
    cli()
        .current_dir(project.path())
        .args(["apply", "rename.json", "src/app/Other.java", "--check"])
        .assert()
        .success();
}

#[test]
fn test_apply_invalid_script() {
    let project = create_project();
    fs::write(project.path().join("bad.json"), r#"{"operations": [{"op": "explode"}]}"#).unwrap();
    cli()
        .current_dir(project.path())
        .args(["apply", "bad.json", "src"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bad.json"));
}

#[test]
fn test_apply_respects_config_formatter() {
    let project = create_project();
    fs::write(
        project.path().join(".jrewrite.json"),
        r#"{ "formatter": { "indentSize": 2 } }"#,
    )
    .unwrap();
    fs::write(
        project.path().join("insert.json"),
        r#"{"operations": [{"op": "insertStatement", "typeName": "Service", "method": "log", "code": "if (count > 0) { return; }"}]}"#,
    )
    .unwrap();

    cli()
        .current_dir(project.path())
        .args(["apply", "insert.json", "src", "--write"])
        .assert()
        .success();

    assert!(service(project.path()).contains(
        "private void log(int count) {\n      if (count > 0) { return; }\n    }"
    ));
}

#[test]
fn test_config_init_and_show() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(temp_dir.path().join(".jrewrite.json").exists());

    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));

    cli()
        .current_dir(temp_dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"indentSize\": 4"));
}

#[test]
fn test_config_schema() {
    cli()
        .args(["config", "schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jrewrite configuration"))
        .stdout(predicate::str::contains("braceStyle"));
}

#[test]
fn test_invalid_config_is_reported() {
    let project = create_project();
    fs::write(
        project.path().join(".jrewrite.json"),
        r#"{ "formatter": { "indentSize": 99 } }"#,
    )
    .unwrap();
    cli()
        .current_dir(project.path())
        .args(["check", "src"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("indentSize"));
}
