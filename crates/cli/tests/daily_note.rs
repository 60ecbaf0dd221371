use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[cfg(unix)]
#[test]
fn daily_creates_note_in_configured_folder() {
    let tmp = tempdir().unwrap();
    let vault = tmp.path().join("vault");
    fs::create_dir_all(vault.join(".obsidian")).unwrap();
    fs::write(
        vault.join(".obsidian/daily-notes.json"),
        r#"{"folder": "Journal", "format": "[day-]YYYY"}"#,
    )
    .unwrap();
    let cfg = tmp.path().join("config.toml");
    fs::write(
        &cfg,
        format!(
            "version = 1\ndefault_vault = \"notes\"\n\n[vaults.notes]\npath = \"{}\"\n",
            vault.display()
        ),
    )
    .unwrap();

    std::process::Command::new(assert_cmd::cargo::cargo_bin!("notesmd"))
        .env("EDITOR", "true")
        .args(["--config", cfg.to_str().unwrap(), "daily", "--editor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created Journal/day-"));

    let created: Vec<_> = fs::read_dir(vault.join("Journal")).unwrap().collect();
    assert_eq!(created.len(), 1);
}
