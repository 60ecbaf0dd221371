pub mod backlinks;
pub mod create;
pub mod daily;
pub mod doctor;
pub mod move_cmd;
pub mod open;
pub mod output;
pub mod search;
pub mod set_default;

use std::path::Path;

use notesmd_core::config::{ConfigError, ConfigLoader, ResolvedConfig};
use notesmd_core::opener::{EditorOpener, Launcher, SystemOpener};

/// Load the config and resolve the vault, or exit with status 1.
pub fn load_or_exit(config: Option<&Path>, vault: Option<&str>) -> ResolvedConfig {
    match ConfigLoader::load(config, vault) {
        Ok(rc) => rc,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            if let Some(hint) = config_hint(&e) {
                eprintln!("Hint: {hint}");
            }
            crate::logging::exit(1);
        }
    }
}

pub fn config_hint(e: &ConfigError) -> Option<&'static str> {
    match e {
        ConfigError::NotFound(_) => Some("create the file, or point --config at one"),
        ConfigError::NoDefaultVault => {
            Some("run 'notesmd set-default <vault>' or pass --vault <vault>")
        }
        ConfigError::VaultNotFound(_) => {
            Some("add it under [vaults.<name>] in the config, or open it once in Obsidian")
        }
        _ => None,
    }
}

/// The real openers: the platform URI handler and `$EDITOR`.
pub struct Openers {
    app: SystemOpener,
    editor: EditorOpener,
}

impl Openers {
    pub fn from_env() -> Self {
        Self { app: SystemOpener, editor: EditorOpener::from_env() }
    }

    pub fn launcher(&self) -> Launcher<'_> {
        Launcher::new(&self.app, &self.editor)
    }
}
