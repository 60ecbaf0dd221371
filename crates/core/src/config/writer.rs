//! Updating the config file in place.

use std::fs;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::info;

use crate::config::loader::{ConfigError, default_config_path};
use crate::config::obsidian::find_registered_vault;
use crate::opener::OpenType;

/// Set `default_vault` and/or `open_type`, keeping every other key intact.
///
/// A missing config file is created with `version = 1`. The vault must be
/// configured under `[vaults]` or known to Obsidian. Returns the path that
/// was written.
pub fn set_defaults(
    config_path: Option<&Path>,
    vault: Option<&str>,
    open_type: Option<OpenType>,
) -> Result<PathBuf, ConfigError> {
    let path = config_path.map_or_else(default_config_path, Path::to_path_buf);

    let mut table = if path.exists() {
        let s = fs::read_to_string(&path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;
        s.parse::<Table>().map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?
    } else {
        Table::new()
    };

    if let Some(name) = vault {
        ensure_vault_known(&table, name)?;
    }

    table.entry("version").or_insert(Value::Integer(1));
    if let Some(name) = vault {
        table.insert("default_vault".to_string(), Value::String(name.to_string()));
    }
    if let Some(open_type) = open_type {
        table.insert("open_type".to_string(), Value::String(open_type.to_string()));
    }

    let rendered = toml::to_string_pretty(&table).map_err(ConfigError::SerializeError)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| ConfigError::WriteError(parent.display().to_string(), e))?;
    }
    fs::write(&path, rendered).map_err(|e| ConfigError::WriteError(path.display().to_string(), e))?;

    info!("updated {}", path.display());
    Ok(path)
}

fn ensure_vault_known(table: &Table, name: &str) -> Result<(), ConfigError> {
    let configured = table
        .get("vaults")
        .and_then(Value::as_table)
        .is_some_and(|vaults| vaults.contains_key(name));
    if configured || find_registered_vault(name)?.is_some() {
        Ok(())
    } else {
        Err(ConfigError::VaultNotFound(name.to_string()))
    }
}
