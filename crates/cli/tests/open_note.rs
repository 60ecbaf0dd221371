use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

fn setup() -> (TempDir, PathBuf) {
    let tmp = tempdir().unwrap();
    let vault = tmp.path().join("vault");
    fs::create_dir_all(&vault).unwrap();
    fs::write(vault.join("a.md"), "# A\n").unwrap();

    let cfg = tmp.path().join("config.toml");
    fs::write(
        &cfg,
        format!(
            "version = 1\ndefault_vault = \"notes\"\nopen_type = \"editor\"\n\n[vaults.notes]\npath = \"{}\"\n",
            vault.display()
        ),
    )
    .unwrap();
    (tmp, cfg)
}

fn notesmd(cfg: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("notesmd"));
    cmd.args(["--config", cfg.to_str().unwrap()]);
    cmd
}

#[cfg(unix)]
#[test]
fn open_uses_configured_editor() {
    let (_tmp, cfg) = setup();

    notesmd(&cfg).env("EDITOR", "true").args(["open", "a"]).assert().success();
}

#[cfg(unix)]
#[test]
fn open_reports_editor_failure() {
    let (_tmp, cfg) = setup();

    notesmd(&cfg)
        .env("EDITOR", "false")
        .args(["o", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'false' exited with"));
}

#[test]
fn open_in_editor_rejects_escape() {
    let (_tmp, cfg) = setup();

    notesmd(&cfg).env("EDITOR", "true").args(["open", "../a"]).assert().failure();
}
