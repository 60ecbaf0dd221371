use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::opener::OpenType;
use crate::vault::VaultContext;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub default_vault: Option<String>,
    #[serde(default)]
    pub open_type: OpenType,
    #[serde(default)]
    pub vaults: HashMap<String, VaultEntry>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct VaultEntry {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Where the active vault's location came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultSource {
    /// A `[vaults.<name>]` table in the config file.
    Config,
    /// Obsidian's own vault registry.
    Obsidian(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config_path: PathBuf,
    pub vault: VaultContext,
    pub vault_source: VaultSource,
    pub open_type: OpenType,
    pub logging: LoggingConfig,
}
