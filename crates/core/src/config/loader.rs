use crate::config::obsidian::{default_note_folder, find_registered_vault};
use crate::config::types::{ConfigFile, LoggingConfig, ResolvedConfig, VaultSource};
use crate::vault::VaultContext;
use shellexpand::full;
use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::home_dir;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("vault '{0}' is neither configured nor registered with Obsidian")]
    VaultNotFound(String),

    #[error("no vault selected: pass --vault or set default_vault")]
    NoDefaultVault,

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("home directory not available to expand '~'")]
    NoHome,

    #[error("failed to read Obsidian vault registry {0}: {1}")]
    RegistryReadError(String, #[source] std::io::Error),

    #[error("failed to parse Obsidian vault registry {0}: {1}")]
    RegistryParseError(String, #[source] serde_json::Error),

    #[error("failed to write config file {0}: {1}")]
    WriteError(String, #[source] std::io::Error),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] toml::ser::Error),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Read and version-check the config file without resolving a vault.
    pub fn read(config_path: Option<&Path>) -> Result<(PathBuf, ConfigFile), ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let s = fs::read_to_string(&path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

        let cf: ConfigFile = toml::from_str(&s)
            .map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?;

        if cf.version != 1 {
            return Err(ConfigError::BadVersion(cf.version));
        }

        Ok((path, cf))
    }

    /// Logging settings alone, with the log file path expanded.
    pub fn load_logging(config_path: Option<&Path>) -> Result<LoggingConfig, ConfigError> {
        let (_, cf) = Self::read(config_path)?;
        resolve_logging(&cf.logging)
    }

    pub fn load(
        config_path: Option<&Path>,
        vault_override: Option<&str>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let (path, cf) = Self::read(config_path)?;

        let name = vault_override
            .map(ToOwned::to_owned)
            .or(cf.default_vault.clone())
            .ok_or(ConfigError::NoDefaultVault)?;

        let (root, vault_source) = Self::resolve_vault(&cf, &name)?;
        debug!("vault '{name}' at {} ({vault_source:?})", root.display());

        let default_folder = default_note_folder(&root);
        let vault = VaultContext::new(name, root).with_default_folder(default_folder);

        Ok(ResolvedConfig {
            config_path: path,
            vault,
            vault_source,
            open_type: cf.open_type,
            logging: resolve_logging(&cf.logging)?,
        })
    }

    fn resolve_vault(cf: &ConfigFile, name: &str) -> Result<(PathBuf, VaultSource), ConfigError> {
        if let Some(entry) = cf.vaults.get(name) {
            return Ok((expand_path(&entry.path)?, VaultSource::Config));
        }

        match find_registered_vault(name)? {
            Some((root, registry)) => Ok((root, VaultSource::Obsidian(registry))),
            None => Err(ConfigError::VaultNotFound(name.to_string())),
        }
    }
}

fn resolve_logging(log_cfg: &LoggingConfig) -> Result<LoggingConfig, ConfigError> {
    let file = match log_cfg.file {
        Some(ref file) => Some(expand_path(&file.to_string_lossy())?),
        None => None,
    };
    Ok(LoggingConfig { file, ..log_cfg.clone() })
}

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("notesmd").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("notesmd").join("config.toml")
}

pub(crate) fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(expanded.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opener::OpenType;
    use tempfile::TempDir;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("config.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_default_vault() {
        let dir = TempDir::new().unwrap();
        let vault = dir.path().join("notes");
        fs::create_dir_all(vault.join(".obsidian")).unwrap();
        fs::write(
            vault.join(".obsidian/app.json"),
            r#"{"newFileLocation": "folder", "newFileFolderPath": "Inbox"}"#,
        )
        .unwrap();
        let cfg = write_config(
            dir.path(),
            &format!(
                "version = 1\ndefault_vault = \"notes\"\nopen_type = \"editor\"\n\n[vaults.notes]\npath = \"{}\"\n",
                vault.display()
            ),
        );

        let rc = ConfigLoader::load(Some(&cfg), None).unwrap();

        assert_eq!(rc.vault.name, "notes");
        assert_eq!(rc.vault.root, vault);
        assert_eq!(rc.vault.default_folder.as_deref(), Some("Inbox"));
        assert_eq!(rc.vault_source, VaultSource::Config);
        assert_eq!(rc.open_type, OpenType::Editor);
        assert_eq!(rc.logging.level, "info");
    }

    #[test]
    fn test_vault_override_wins() {
        let dir = TempDir::new().unwrap();
        let cfg = write_config(
            dir.path(),
            "version = 1\ndefault_vault = \"a\"\n[vaults.a]\npath = \"/tmp/a\"\n[vaults.b]\npath = \"/tmp/b\"\n",
        );

        let rc = ConfigLoader::load(Some(&cfg), Some("b")).unwrap();
        assert_eq!(rc.vault.root, PathBuf::from("/tmp/b"));
        assert_eq!(rc.open_type, OpenType::Obsidian);
    }

    #[test]
    fn test_missing_default_vault() {
        let dir = TempDir::new().unwrap();
        let cfg = write_config(dir.path(), "version = 1\n");

        assert!(matches!(ConfigLoader::load(Some(&cfg), None), Err(ConfigError::NoDefaultVault)));
    }

    #[test]
    fn test_bad_version() {
        let dir = TempDir::new().unwrap();
        let cfg = write_config(dir.path(), "version = 2\n");

        assert!(matches!(ConfigLoader::read(Some(&cfg)), Err(ConfigError::BadVersion(2))));
    }

    #[test]
    fn test_invalid_open_type_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let cfg = write_config(dir.path(), "version = 1\nopen_type = \"vscode\"\n");

        assert!(matches!(ConfigLoader::read(Some(&cfg)), Err(ConfigError::ParseError(..))));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");

        assert!(matches!(ConfigLoader::read(Some(&missing)), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_logging_file_is_expanded() {
        let dir = TempDir::new().unwrap();
        let cfg = write_config(
            dir.path(),
            "version = 1\n[logging]\nlevel = \"debug\"\nfile = \"~/notesmd.log\"\n",
        );

        let logging = ConfigLoader::load_logging(Some(&cfg)).unwrap();
        assert_eq!(logging.level, "debug");
        let file = logging.file.unwrap();
        assert!(!file.to_string_lossy().starts_with('~'));
        assert!(file.ends_with("notesmd.log"));
    }
}
