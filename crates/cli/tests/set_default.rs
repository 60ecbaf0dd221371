use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

const CONFIG: &str = r#"version = 1
default_vault = "work"

[vaults.work]
path = "/tmp/work"

[vaults.home]
path = "/tmp/home"

[logging]
level = "warn"
"#;

#[test]
fn set_default_switches_vault_and_keeps_the_rest() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    fs::write(&cfg, CONFIG).unwrap();

    Command::new(assert_cmd::cargo::cargo_bin!("notesmd"))
        .args(["--config", cfg.to_str().unwrap(), "set-default", "home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Default vault: home"));

    Command::new(assert_cmd::cargo::cargo_bin!("notesmd"))
        .args(["--config", cfg.to_str().unwrap(), "doctor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vault_root: /tmp/home"))
        .stdout(predicate::str::contains("logging.level: warn"));
}

#[test]
fn set_default_open_type() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    fs::write(&cfg, CONFIG).unwrap();

    Command::new(assert_cmd::cargo::cargo_bin!("notesmd"))
        .args(["--config", cfg.to_str().unwrap(), "sd", "--open-type", "editor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Open type: editor"));

    let written = fs::read_to_string(&cfg).unwrap();
    assert!(written.contains("open_type = \"editor\""));
    assert!(written.contains("default_vault = \"work\""));
}

#[test]
fn set_default_rejects_unknown_vault() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    fs::write(&cfg, CONFIG).unwrap();

    Command::new(assert_cmd::cargo::cargo_bin!("notesmd"))
        .env("XDG_CONFIG_HOME", tmp.path())
        .args(["--config", cfg.to_str().unwrap(), "set-default", "missing-9d1c"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("vault 'missing-9d1c'"));

    assert_eq!(fs::read_to_string(&cfg).unwrap(), CONFIG);
}

#[test]
fn set_default_rejects_bad_open_type() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    fs::write(&cfg, CONFIG).unwrap();

    Command::new(assert_cmd::cargo::cargo_bin!("notesmd"))
        .args(["--config", cfg.to_str().unwrap(), "sd", "--open-type", "vscode"])
        .assert()
        .failure();
}

#[test]
fn set_default_needs_an_argument() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");

    Command::new(assert_cmd::cargo::cargo_bin!("notesmd"))
        .args(["--config", cfg.to_str().unwrap(), "set-default"])
        .assert()
        .failure();

    assert!(!cfg.exists());
}
