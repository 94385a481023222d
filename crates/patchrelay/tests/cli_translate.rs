use assert_cmd::Command;
use assert_cmd::cargo;
use patchrelay_testkit::sample_change_sets;
use patchrelay_types::ChangeSet;
use predicates::prelude::*;
use tempfile::TempDir;

fn patchrelay_cmd() -> Command {
    Command::new(cargo::cargo_bin!("patchrelay"))
}

fn write_change_set(dir: &std::path::Path, set: &ChangeSet) -> std::path::PathBuf {
    let path = dir.join("changes.json");
    let json = serde_json::to_string_pretty(set).expect("serialize change set");
    std::fs::write(&path, json).expect("write change set");
    path
}

#[test]
fn translate_writes_sarif_to_the_default_report_dir() {
    let td = TempDir::new().expect("temp");
    let input = write_change_set(td.path(), &sample_change_sets::four_kinds());

    let output = patchrelay_cmd()
        .current_dir(td.path())
        .arg("translate")
        .arg("--input")
        .arg(&input)
        .output()
        .expect("run translate");
    assert!(output.status.success());

    let report_path = td.path().join("reports/patchrelay/sarif.json");
    let text = std::fs::read_to_string(&report_path).expect("read report");
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid sarif json");

    assert_eq!(value["version"], "2.1.0");
    assert_eq!(value["runs"][0]["tool"]["driver"]["name"], "patchrelay");

    // generated + deleted + altered yield one result each, the rename two
    let results = value["runs"][0]["results"].as_array().expect("results");
    assert_eq!(results.len(), 5);

    // flattened catalog: two trees, six unique rule ids
    let rules = value["runs"][0]["tool"]["driver"]["rules"]
        .as_array()
        .expect("rules");
    assert_eq!(rules.len(), 6);

    assert_eq!(
        value["runs"][0]["artifacts"][0]["location"]["uri"],
        "https://github.com/acme/widget.git"
    );
}

#[test]
fn explicit_out_path_overrides_the_report_dir() {
    let td = TempDir::new().expect("temp");
    let input = write_change_set(td.path(), &sample_change_sets::minimal());
    let out = td.path().join("custom/report.sarif");

    let output = patchrelay_cmd()
        .current_dir(td.path())
        .arg("translate")
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .output()
        .expect("run translate");
    assert!(output.status.success());

    assert!(out.exists());
    assert!(!td.path().join("reports/patchrelay/sarif.json").exists());
}

#[test]
fn patch_format_concatenates_the_raw_diffs() {
    let td = TempDir::new().expect("temp");
    let input = write_change_set(td.path(), &sample_change_sets::four_kinds());

    let output = patchrelay_cmd()
        .current_dir(td.path())
        .arg("translate")
        .arg("--input")
        .arg(&input)
        .arg("--format")
        .arg("patch")
        .output()
        .expect("run translate");
    assert!(output.status.success());

    let patch = std::fs::read_to_string(td.path().join("reports/patchrelay/changes.patch"))
        .expect("read patch");

    assert!(patch.starts_with("diff --git a/src/Banner.java b/src/Banner.java\n"));
    assert!(patch.contains("deleted file mode 100644\n"));
    assert!(patch.contains("rename from src/old/Util.java\n"));
    assert!(patch.ends_with("\n\n"));
}

#[test]
fn log_format_writes_no_file() {
    let td = TempDir::new().expect("temp");
    let input = write_change_set(td.path(), &sample_change_sets::four_kinds());

    let output = patchrelay_cmd()
        .current_dir(td.path())
        .arg("translate")
        .arg("--input")
        .arg(&input)
        .arg("--format")
        .arg("log")
        .arg("-v")
        .output()
        .expect("run translate");
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("These rules would move file from src/old/Util.java"));
    assert!(stderr.contains("4 change(s) reported"));

    assert!(!td.path().join("reports").exists());
}

#[test]
fn translate_reads_the_change_set_from_stdin() {
    let td = TempDir::new().expect("temp");
    let json =
        serde_json::to_string(&sample_change_sets::minimal()).expect("serialize change set");

    let output = patchrelay_cmd()
        .current_dir(td.path())
        .arg("translate")
        .arg("--input")
        .arg("-")
        .write_stdin(json)
        .output()
        .expect("run translate");
    assert!(output.status.success());

    let text = std::fs::read_to_string(td.path().join("reports/patchrelay/sarif.json"))
        .expect("read report");
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid sarif json");
    assert_eq!(value["runs"][0]["results"].as_array().expect("results").len(), 1);
}

#[test]
fn malformed_diff_aborts_without_writing_a_report() {
    let td = TempDir::new().expect("temp");
    let input = write_change_set(td.path(), &sample_change_sets::with_malformed_diff());

    patchrelay_cmd()
        .current_dir(td.path())
        .arg("translate")
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed hunk header"))
        .stderr(predicate::str::contains("src/Broken.java"));

    assert!(!td.path().join("reports/patchrelay/sarif.json").exists());
}

#[test]
fn unknown_schema_id_is_a_setup_error() {
    let td = TempDir::new().expect("temp");
    let input = td.path().join("changes.json");
    std::fs::write(
        &input,
        r#"{ "schema": "patchrelay.changeset.v99", "changes": [] }"#,
    )
    .expect("write change set");

    patchrelay_cmd()
        .current_dir(td.path())
        .arg("translate")
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported change set schema"));
}

#[test]
fn schema_command_prints_the_changeset_schema() {
    let output = patchrelay_cmd()
        .arg("schema")
        .arg("--pretty")
        .output()
        .expect("run schema");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("valid schema json");
    assert_eq!(value["title"], "ChangeSet");
    assert!(value["properties"].get("changes").is_some());
}
