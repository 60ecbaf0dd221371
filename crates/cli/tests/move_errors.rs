use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

fn setup() -> (TempDir, PathBuf, PathBuf) {
    let tmp = tempdir().unwrap();
    let vault = tmp.path().join("vault");
    fs::create_dir_all(&vault).unwrap();
    fs::write(vault.join("a.md"), "# A\n").unwrap();
    fs::write(vault.join("b.md"), "[[a]]\n").unwrap();

    let cfg = tmp.path().join("config.toml");
    fs::write(
        &cfg,
        format!(
            "version = 1\ndefault_vault = \"notes\"\n\n[vaults.notes]\npath = \"{}\"\n",
            vault.display()
        ),
    )
    .unwrap();
    (tmp, vault, cfg)
}

fn notesmd(cfg: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("notesmd"));
    cmd.args(["--config", cfg.to_str().unwrap()]);
    cmd
}

#[test]
fn missing_source_fails() {
    let (_tmp, vault, cfg) = setup();

    notesmd(&cfg)
        .args(["move", "nope", "c"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source note not found"));

    assert!(!vault.join("c.md").exists());
}

#[test]
fn existing_destination_fails_and_changes_nothing() {
    let (_tmp, vault, cfg) = setup();

    notesmd(&cfg)
        .args(["move", "a", "b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Destination already exists"));

    assert_eq!(fs::read_to_string(vault.join("a.md")).unwrap(), "# A\n");
    assert_eq!(fs::read_to_string(vault.join("b.md")).unwrap(), "[[a]]\n");
}

#[test]
fn escaping_the_vault_fails() {
    let (tmp, vault, cfg) = setup();

    notesmd(&cfg)
        .args(["move", "a", "../outside"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("may not contain '..'"));

    assert!(vault.join("a.md").exists());
    assert!(!tmp.path().join("outside.md").exists());
}

#[cfg(unix)]
#[test]
fn symlinked_directory_out_of_the_vault_fails() {
    let (tmp, vault, cfg) = setup();
    let outside = tmp.path().join("outside");
    fs::create_dir_all(&outside).unwrap();
    std::os::unix::fs::symlink(&outside, vault.join("link")).unwrap();

    notesmd(&cfg).args(["move", "a", "link/a"]).assert().failure();

    assert!(vault.join("a.md").exists());
    assert!(!outside.join("a.md").exists());
}

#[test]
fn empty_name_fails() {
    let (_tmp, _vault, cfg) = setup();

    notesmd(&cfg).args(["move", "a", " "]).assert().failure();
}
