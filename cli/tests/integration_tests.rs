use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{Value, json};

/// Schema exercising flags, patterns, and multi-value slots.
const SCHEMA_YAML: &str = r#"
options:
  - slot: verbose
    names: [verbose, v]
    opposite: true
    description: Print more detail.
  - slot: output
    names: [output, o]
    kind: single
    type: path
    placeholder: FILE
    description: Where to write results.
    default: out.txt
  - slot: level
    kind: single
    type: int32
    short_pattern: "[0-9]"
  - slot: tag
    kind: multi
"#;

fn write_schema(dir: &Path) -> PathBuf {
    let path = dir.join("schema.yaml");
    fs::write(&path, SCHEMA_YAML).expect("failed to write schema");
    path
}

fn argmap(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_argmap"))
        .args(args)
        .output()
        .expect("failed to run argmap")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "argmap failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[test]
fn parse_prints_values_and_positionals() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());

    let output = argmap(&[
        "parse",
        "--schema",
        schema.to_str().unwrap(),
        "--",
        "-vo",
        "result.bin",
        "input.txt",
        "--tag",
        "a",
        "-3",
        "7",
        "--tag",
        "b",
        "--",
        "--tag",
    ]);

    assert_eq!(
        stdout_json(&output),
        json!({
            "values": {
                "verbose": true,
                "output": "result.bin",
                "level": 7,
                "tag": ["a", "b"],
            },
            "positional": ["input.txt", "--tag"],
        })
    );
}

#[test]
fn parse_opposite_writes_false() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());

    let output = argmap(&[
        "parse",
        "--schema",
        schema.to_str().unwrap(),
        "--",
        "--verbose",
        "--no-v",
    ]);

    assert_eq!(stdout_json(&output)["values"]["verbose"], json!(false));
}

#[test]
fn parse_yaml_format() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());

    let output = argmap(&[
        "parse",
        "--schema",
        schema.to_str().unwrap(),
        "--format",
        "yaml",
        "--",
        "--tag",
        "x",
    ]);

    assert!(output.status.success());
    let parsed: Value = serde_yaml::from_slice(&output.stdout).expect("stdout should be YAML");
    assert_eq!(parsed["values"]["tag"], json!(["x"]));
    assert_eq!(parsed["positional"], json!([]));
}

#[test]
fn parse_unknown_option_fails() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());

    let output = argmap(&["parse", "--schema", schema.to_str().unwrap(), "--", "--nope"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error: no such option: --nope"),
        "stderr: {stderr}"
    );
}

#[test]
fn parse_conversion_failure_fails() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());

    let output = argmap(&[
        "parse",
        "--schema",
        schema.to_str().unwrap(),
        "--",
        "--level",
        "high",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'high'"), "stderr: {stderr}");
}

#[test]
fn parse_duplicate_names_follow_config() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("dupes.json");
    fs::write(
        &schema,
        serde_json::to_string_pretty(&json!({
            "options": [
                { "slot": "first", "names": ["q"] },
                { "slot": "second", "names": ["q"] },
            ]
        }))
        .unwrap(),
    )
    .unwrap();

    let rejected = argmap(&["parse", "--schema", schema.to_str().unwrap(), "--", "-q"]);
    assert_eq!(rejected.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&rejected.stderr).contains("Invalid schema"));

    let config = dir.path().join("config.yaml");
    fs::write(&config, "duplicate_names: first_wins\n").unwrap();
    let accepted = argmap(&[
        "parse",
        "--schema",
        schema.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--",
        "-q",
    ]);
    assert_eq!(stdout_json(&accepted)["values"], json!({ "first": true }));
}

#[test]
fn parse_typed_entry_without_kind_takes_a_value() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("typed.yaml");
    fs::write(&schema, "options:\n  - slot: level\n    type: int32\n").unwrap();

    let output = argmap(&["parse", "--schema", schema.to_str().unwrap(), "--", "--level", "5"]);

    assert_eq!(
        stdout_json(&output),
        json!({ "values": { "level": 5 }, "positional": [] })
    );
}

#[test]
fn parse_non_finite_float_fails() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("ratio.yaml");
    fs::write(&schema, "options:\n  - slot: ratio\n    type: float64\n").unwrap();

    let output = argmap(&["parse", "--schema", schema.to_str().unwrap(), "--", "--ratio", "NaN"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("option 'ratio'"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn parse_missing_schema_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.yaml");

    let output = argmap(&["parse", "--schema", missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read schema"));
}

// ---------------------------------------------------------------------------
// usage
// ---------------------------------------------------------------------------

#[test]
fn usage_plain_lists_options() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());

    let output = argmap(&[
        "usage",
        "--schema",
        schema.to_str().unwrap(),
        "--header",
        "Usage: tool [OPTIONS] FILE",
        "--plain",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Usage: tool [OPTIONS] FILE\n\nOptions\n\n"));
    assert!(stdout.contains("  --verbose\n"));
    assert!(stdout.contains("  --no-v\n"));
    assert!(stdout.contains("  -o FILE\n"));
    assert!(stdout.contains("    Where to write results.\n"));
    assert!(stdout.contains("    Default: out.txt\n"));
    assert!(stdout.contains("  -/[0-9]/ VALUE\n"));
    assert!(!stdout.contains('\u{1b}'));
}

#[test]
fn usage_styled_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());

    let output = argmap(&["usage", "--schema", schema.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("\u{1b}[1m"));
}

#[test]
fn usage_header_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());
    let config = dir.path().join("config.yaml");
    fs::write(&config, "usage_header: \"Usage: configured\"\nstyled_usage: false\n").unwrap();

    let output = argmap(&[
        "usage",
        "--schema",
        schema.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Usage: configured\n\nOptions"));
}

// ---------------------------------------------------------------------------
// describe
// ---------------------------------------------------------------------------

#[test]
fn describe_reports_descriptor_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path());

    let output = argmap(&["describe", "--schema", schema.to_str().unwrap()]);
    let infos = stdout_json(&output);

    let infos = infos.as_array().expect("describe prints an array");
    assert_eq!(infos.len(), 4);
    assert_eq!(infos[0]["slot"], json!("verbose"));
    assert_eq!(infos[0]["opposite_names"], json!(["no-verbose", "no-v"]));
    assert_eq!(infos[0]["arity"], json!("flag"));
    let target = infos[1]["target"]["other"].as_str().expect("paths report an other target");
    assert!(target.ends_with("PathBuf"), "target: {target}");
    assert_eq!(infos[1]["placeholder"], json!("FILE"));
    assert_eq!(infos[2]["short_pattern"], json!("[0-9]"));
    assert_eq!(infos[3]["arity"], json!("multi"));
}
