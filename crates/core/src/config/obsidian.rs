//! Settings Obsidian keeps for itself.
//!
//! Obsidian records every vault it has opened in `obsidian.json` under the
//! user config directory, and per-vault preferences under `<vault>/.obsidian/`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::loader::ConfigError;

const REGISTRY_FILE: &str = "obsidian.json";
const WSL_INTEROP: &str = "/proc/sys/fs/binfmt_misc/WSLInterop";

#[derive(Debug, Deserialize)]
struct VaultRegistry {
    #[serde(default)]
    vaults: BTreeMap<String, RegisteredVault>,
}

#[derive(Debug, Deserialize)]
struct RegisteredVault {
    path: String,
}

/// The subset of `.obsidian/app.json` that decides where new notes go.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppConfig {
    #[serde(default)]
    new_file_location: String,
    #[serde(default)]
    new_file_folder_path: String,
}

/// Settings of Obsidian's daily notes plugin, from `.obsidian/daily-notes.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DailyNotesConfig {
    /// Folder daily notes live in; empty for the vault root.
    #[serde(default)]
    pub folder: String,
    /// Moment.js date format; empty means `YYYY-MM-DD`.
    #[serde(default)]
    pub format: String,
    /// Note whose content seeds a new daily note.
    #[serde(default)]
    pub template: String,
}

/// Candidate locations of Obsidian's vault registry, most likely first.
pub fn registry_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(config) = dirs::config_dir() {
        candidates.push(config.join("obsidian").join(REGISTRY_FILE));
    }
    // Flatpak and Snap installs keep their own config trees
    if cfg!(target_os = "linux")
        && let Some(home) = dirs::home_dir()
    {
        candidates.push(
            home.join(".var/app/md.obsidian.Obsidian/config/obsidian").join(REGISTRY_FILE),
        );
        candidates.push(home.join("snap/obsidian/current/.config/obsidian").join(REGISTRY_FILE));
    }
    candidates
}

/// Look `name` up in the first registry that exists.
///
/// A vault matches when its recorded path ends with `name`. Returns the vault
/// root and the registry file it came from.
pub fn find_registered_vault(name: &str) -> Result<Option<(PathBuf, PathBuf)>, ConfigError> {
    let Some(registry) = registry_candidates().into_iter().find(|p| p.is_file()) else {
        return Ok(None);
    };
    let root = vault_path_in_registry(&registry, name)?;
    Ok(root.map(|root| (root, registry)))
}

/// Find the vault whose path ends with `name` in a registry file.
pub fn vault_path_in_registry(
    registry: &Path,
    name: &str,
) -> Result<Option<PathBuf>, ConfigError> {
    let content = fs::read_to_string(registry)
        .map_err(|e| ConfigError::RegistryReadError(registry.display().to_string(), e))?;
    let parsed: VaultRegistry = serde_json::from_str(&content)
        .map_err(|e| ConfigError::RegistryParseError(registry.display().to_string(), e))?;

    let found = parsed.vaults.into_values().map(|v| v.path).find(|path| path.ends_with(name));

    Ok(found.map(|path| {
        if running_in_wsl() {
            PathBuf::from(adjust_for_wsl_mount(&path))
        } else {
            PathBuf::from(path)
        }
    }))
}

fn running_in_wsl() -> bool {
    cfg!(target_os = "linux") && Path::new(WSL_INTEROP).exists()
}

/// Map a Windows drive path such as `C:\Users\me\Vault` to `/mnt/c/Users/me/Vault`.
pub fn adjust_for_wsl_mount(path: &str) -> String {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        let drive = char::from(bytes[0].to_ascii_lowercase());
        return format!("/mnt/{drive}{}", &path[2..]).replace('\\', "/");
    }
    path.to_string()
}

/// Folder Obsidian puts new notes in, if the vault configures one.
pub fn default_note_folder(vault_root: &Path) -> Option<String> {
    let content = fs::read_to_string(vault_root.join(".obsidian").join("app.json")).ok()?;
    let app: AppConfig = serde_json::from_str(&content).ok()?;
    (app.new_file_location == "folder" && !app.new_file_folder_path.is_empty())
        .then_some(app.new_file_folder_path)
}

/// Daily notes settings, or the defaults when the file is missing or broken.
pub fn daily_notes_config(vault_root: &Path) -> DailyNotesConfig {
    fs::read_to_string(vault_root.join(".obsidian").join("daily-notes.json"))
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn registry(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join(REGISTRY_FILE);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_vault_path_in_registry() {
        let dir = TempDir::new().unwrap();
        let file = registry(
            dir.path(),
            r#"{"vaults": {"abc": {"path": "/home/me/Work", "ts": 1}, "def": {"path": "/home/me/Personal"}}}"#,
        );

        let found = vault_path_in_registry(&file, "Personal").unwrap();
        assert_eq!(found, Some(PathBuf::from("/home/me/Personal")));
        assert_eq!(vault_path_in_registry(&file, "Missing").unwrap(), None);
    }

    #[test]
    fn test_vault_registry_parse_error() {
        let dir = TempDir::new().unwrap();
        let file = registry(dir.path(), "not json");

        assert!(matches!(
            vault_path_in_registry(&file, "x"),
            Err(ConfigError::RegistryParseError(..))
        ));
    }

    #[rstest]
    #[case(r"C:\Users\me\Vault", "/mnt/c/Users/me/Vault")]
    #[case(r"d:\notes", "/mnt/d/notes")]
    #[case("/home/me/Vault", "/home/me/Vault")]
    fn test_adjust_for_wsl_mount(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(adjust_for_wsl_mount(input), expected);
    }

    #[rstest]
    #[case(r#"{"newFileLocation": "folder", "newFileFolderPath": "Inbox"}"#, Some("Inbox"))]
    #[case(r#"{"newFileLocation": "root", "newFileFolderPath": "Inbox"}"#, None)]
    #[case(r#"{"newFileLocation": "folder", "newFileFolderPath": ""}"#, None)]
    #[case(r#"{"somethingElse": true}"#, None)]
    #[case("{broken", None)]
    fn test_default_note_folder(#[case] app_json: &str, #[case] expected: Option<&str>) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".obsidian")).unwrap();
        fs::write(dir.path().join(".obsidian/app.json"), app_json).unwrap();

        assert_eq!(default_note_folder(dir.path()).as_deref(), expected);
    }

    #[test]
    fn test_daily_notes_config() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".obsidian")).unwrap();
        fs::write(
            dir.path().join(".obsidian/daily-notes.json"),
            r#"{"folder": "Journal", "format": "YYYY/MM/DD", "autorun": false}"#,
        )
        .unwrap();

        let config = daily_notes_config(dir.path());
        assert_eq!(config.folder, "Journal");
        assert_eq!(config.format, "YYYY/MM/DD");
        assert_eq!(config.template, "");
    }

    #[test]
    fn test_daily_notes_config_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(daily_notes_config(dir.path()), DailyNotesConfig::default());
    }

    #[test]
    fn test_default_note_folder_without_obsidian_dir() {
        let dir = TempDir::new().unwrap();
        assert_eq!(default_note_folder(dir.path()), None);
    }
}
