//! CLI integration tests
//!
//! These tests verify that the CLI works correctly with various options.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn sample_package() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "res/layout/main.xml",
        r#"<FrameLayout xmlns:android="http://schemas.android.com/apk/res/android">
    <com.example.widget.Chart android:onClick="onChartClick" />
    <fragment android:name="@0x7f060001" />
</FrameLayout>"#,
    );
    write(
        dir.path(),
        "res/raw/keep.xml",
        r#"<resources xmlns:tools="http://schemas.android.com/tools" tools:keep="@layout/main"/>"#,
    );
    write(dir.path(), "lib/x86/libapp.so", "\0com/example/jni/Bridge\0");
    write(
        dir.path(),
        "table.json",
        r#"{
  "strings": { "2131099649": ["com.example.ui.DetailFragment"] },
  "styles": {
    "2131689473": [{ "parent": 0 }],
    "2131689474": [{ "parent": 2131689473 }]
  }
}"#,
    );
    dir
}

fn refscan() -> Command {
    Command::cargo_bin("refscan").unwrap()
}

#[test]
fn test_cli_help() {
    refscan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("refscan"))
        .stdout(predicate::str::contains("--styles-dot"))
        .stdout(predicate::str::contains("--table"));
}

#[test]
fn test_cli_version() {
    refscan()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("refscan"));
}

#[test]
fn test_terminal_report() {
    let dir = sample_package();

    refscan()
        .arg(dir.path())
        .args(["--table", "table.json"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Lcom/example/widget/Chart;"))
        .stdout(predicate::str::contains("Lcom/example/ui/DetailFragment;"))
        .stdout(predicate::str::contains("Lcom/example/jni/Bridge;"))
        .stdout(predicate::str::contains("Kept resources"));
}

#[test]
fn test_json_report() {
    let dir = sample_package();
    let table = dir.path().join("table.json");

    let output = refscan()
        .arg(dir.path())
        .arg("--table")
        .arg(&table)
        .args(["--format", "json", "-a", "android:onClick", "--quiet"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["attributes"]["android:onClick"][0], "onChartClick");
    assert_eq!(report["keep_resources"][0], "main");
    assert_eq!(report["native_classes"][0], "Lcom/example/jni/Bridge;");
    assert_eq!(report["styles"]["styles"], 2);
    assert_eq!(report["styles"]["edges"], 1);
    assert_eq!(report["total_classes"], 3);
}

#[test]
fn test_no_native_and_external_names() {
    let dir = sample_package();

    refscan()
        .arg(dir.path())
        .args(["--no-native", "--external-names"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.example.widget.Chart"))
        .stdout(predicate::str::contains("Bridge").not());
}

#[test]
fn test_json_output_file_and_styles_dot() {
    let dir = sample_package();
    let report_path = dir.path().join("out/report.json");
    let dot_path = dir.path().join("styles.dot");
    fs::create_dir_all(report_path.parent().unwrap()).unwrap();

    refscan()
        .arg(dir.path())
        .arg("--table")
        .arg(dir.path().join("table.json"))
        .args(["--format", "json"])
        .arg("--output")
        .arg(&report_path)
        .arg("--styles-dot")
        .arg(&dot_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let report = fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("Lcom/example/widget/Chart;"));

    let dot = fs::read_to_string(&dot_path).unwrap();
    assert_eq!(
        dot,
        "digraph {\n  node2131689473 [label=\"0x7f0f0001\"];\n  node2131689474 [label=\"0x7f0f0002\"];\n  subgraph parents_edges {\n    node2131689473 -> node2131689474;\n  }\n}\n"
    );
}

#[test]
fn test_config_file_attributes() {
    let dir = sample_package();
    write(dir.path(), "refscan.yml", "attributes:\n  - android:onClick\n");

    let output = refscan()
        .arg(dir.path())
        .args(["--format", "json", "--no-native"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["attributes"]["android:onClick"][0], "onChartClick");
    assert!(report["native_classes"].as_array().unwrap().is_empty());
}

#[test]
fn test_missing_table_fails() {
    let dir = sample_package();

    refscan()
        .arg(dir.path())
        .args(["--table", "does-not-exist.json"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("resource table"));
}

#[test]
fn test_missing_package_fails() {
    refscan()
        .arg("/nonexistent/package/path")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
