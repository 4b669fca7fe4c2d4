use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn mipha_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mipha"));
    cmd.env("RUST_LOG", "info");
    cmd
}

fn setup(root: &Path, config: &str) {
    let templates = root.join("templates");
    fs::create_dir_all(templates.join("sub")).expect("mkdir");
    fs::write(templates.join("a.tpl"), "Hello {{ Name }}").expect("write");
    fs::write(templates.join("sub").join("b.tpl"), "{{ Name | kebab_case }}").expect("write");
    fs::write(root.join("configurations.yaml"), config).expect("write");
}

fn render_args(root: &Path) -> Vec<String> {
    vec![
        "--templates".into(),
        root.join("templates").display().to_string(),
        "--config".into(),
        root.join("configurations.yaml").display().to_string(),
        "--output".into(),
        root.join("output").display().to_string(),
    ]
}

#[test]
fn renders_every_context_and_reports_done() {
    let tmp = TempDir::new().unwrap();
    setup(
        tmp.path(),
        "configurations:\n  ctx1:\n    Name: World\n  ctx2:\n    Name: GoLang\n",
    );

    mipha_cmd()
        .args(render_args(tmp.path()))
        .assert()
        .success()
        .stderr(contains(">> Parameters:"))
        .stderr(contains("Process done!"));

    let out = tmp.path().join("output");
    assert_eq!(fs::read_to_string(out.join("ctx1/a.tpl")).unwrap(), "Hello World");
    assert_eq!(fs::read_to_string(out.join("ctx2/a.tpl")).unwrap(), "Hello GoLang");
    assert_eq!(fs::read_to_string(out.join("ctx2/sub/b.tpl")).unwrap(), "go-lang");
}

#[test]
fn dry_run_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    setup(tmp.path(), "configurations:\n  ctx1:\n    Name: World\n");

    mipha_cmd()
        .args(render_args(tmp.path()))
        .arg("--dry-run")
        .assert()
        .success()
        .stderr(contains("[dry-run]"));

    assert!(!tmp.path().join("output").exists(), "dry-run must not create files");
}

#[test]
fn missing_configurations_section_fails() {
    let tmp = TempDir::new().unwrap();
    setup(tmp.path(), "other:\n  x: 1\n");

    mipha_cmd()
        .args(render_args(tmp.path()))
        .assert()
        .failure()
        .stderr(contains("no 'configurations' section"));

    assert!(!tmp.path().join("output").exists());
}

#[test]
fn undefined_variable_fails_with_error_chain() {
    let tmp = TempDir::new().unwrap();
    setup(tmp.path(), "configurations:\n  ctx1:\n    Other: x\n");

    mipha_cmd()
        .args(render_args(tmp.path()))
        .assert()
        .failure()
        .stderr(contains("a.tpl"));
}

#[test]
fn missing_required_flag_prints_usage_without_rendering() {
    let tmp = TempDir::new().unwrap();
    setup(tmp.path(), "configurations:\n  ctx1:\n    Name: World\n");

    mipha_cmd()
        .arg("--templates")
        .arg(tmp.path().join("templates"))
        .arg("--output")
        .arg(tmp.path().join("output"))
        .assert()
        .failure()
        .stderr(contains("Usage"));

    assert!(!tmp.path().join("output").exists());
}

#[test]
fn helper_flag_makes_macros_available() {
    let tmp = TempDir::new().unwrap();
    setup(tmp.path(), "configurations:\n  ctx1:\n    Name: World\n");
    fs::write(
        tmp.path().join("templates").join("greet.txt"),
        "{{ helpers::greet(name=Name) }}",
    )
    .unwrap();
    let helper = tmp.path().join("helper.tpl");
    fs::write(&helper, "{% macro greet(name) %}Hi {{ name }}{% endmacro greet %}").unwrap();

    mipha_cmd()
        .args(render_args(tmp.path()))
        .assert()
        .failure()
        .stderr(contains("helpers::greet"));

    mipha_cmd()
        .args(render_args(tmp.path()))
        .arg("--helper")
        .arg(&helper)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(tmp.path().join("output/ctx1/greet.txt")).unwrap(),
        "Hi World"
    );
}
