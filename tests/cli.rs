//! Tests of the `tabanon` command line tool

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn tabanon(args: &[&Path], extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tabanon"))
        .args(args)
        .args(extra)
        .output()
        .expect("failed to run tabanon")
}

#[test]
fn test_anonymize_csv_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("people.csv");
    let config = dir.path().join("config.json");
    let output = dir.path().join("out/people.csv");
    fs::write(&input, "age,salary\n34,50000\n61,82000\n").unwrap();
    fs::write(
        &config,
        r#"{"age": {"method": "bucket", "parameters": {"width": 10}}}"#,
    )
    .unwrap();

    let result = tabanon(&[&input, &config, &output], &[]);
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "age,salary\n30-40,50000\n60-70,82000\n"
    );
}

#[test]
fn test_output_to_stdout_with_delimiters() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("people.csv");
    let config = dir.path().join("config.json");
    fs::write(&input, "name;city\nAlice;Paris\n").unwrap();
    fs::write(
        &config,
        r#"{"columns": {"name": {"method": "redact", "parameters": {"value": "***"}}}}"#,
    )
    .unwrap();

    let result = tabanon(
        &[&input, &config, Path::new("-")],
        &["--delimiter", ";", "--output-delimiter", ","],
    );
    assert!(result.status.success());
    assert_eq!(
        String::from_utf8(result.stdout).unwrap(),
        "name,city\n***,Paris\n"
    );
}

#[test]
fn test_seed_flag_makes_noise_reproducible() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("data.csv");
    let config = dir.path().join("config.json");
    fs::write(&input, "x\n1.0\n2.5\n3.5\n").unwrap();
    fs::write(
        &config,
        r#"{"x": {"method": "noise", "parameters": {"scale": 10}}}"#,
    )
    .unwrap();

    let run = || {
        let result = tabanon(&[&input, &config, Path::new("-")], &["--seed", "11"]);
        assert!(result.status.success());
        result.stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_invalid_rule_fails_without_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("people.csv");
    let config = dir.path().join("config.json");
    let output = dir.path().join("out.csv");
    fs::write(&input, "age\n34\n").unwrap();
    fs::write(
        &config,
        r#"{"age": {"method": "bucket", "parameters": {"width": -10}}}"#,
    )
    .unwrap();

    let result = tabanon(&[&input, &config, &output], &[]);
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("width"), "stderr: {stderr}");
    assert!(!output.exists());
}

#[test]
fn test_missing_config_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("people.csv");
    fs::write(&input, "age\n34\n").unwrap();

    let result = tabanon(
        &[&input, &dir.path().join("missing.json"), Path::new("-")],
        &[],
    );
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("failed to read config"));
}
