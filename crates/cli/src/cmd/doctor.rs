use notesmd_core::config::{default_config_path, ConfigLoader, VaultSource};
use std::path::Path;

use super::config_hint;

pub fn run(config: Option<&Path>, vault: Option<&str>) {
    match ConfigLoader::load(config, vault) {
        Ok(rc) => {
            println!("OK   notesmd doctor");
            println!("path: {}", rc.config_path.display());
            println!("vault: {}", rc.vault.name);
            println!("vault_root: {}", rc.vault.root.display());
            match rc.vault_source {
                VaultSource::Config => println!("vault_source: config"),
                VaultSource::Obsidian(ref registry) => {
                    println!("vault_source: obsidian ({})", registry.display())
                }
            }
            println!("vault_exists: {}", rc.vault.root.is_dir());
            println!("default_folder: {}", rc.vault.default_folder.as_deref().unwrap_or("-"));
            println!("open_type: {}", rc.open_type);
            println!("logging.level: {}", rc.logging.level);
        }
        Err(e) => {
            println!("FAIL notesmd doctor");
            println!("{e}");
            if let Some(hint) = config_hint(&e) {
                println!("hint: {hint}");
            }
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            crate::logging::exit(1);
        }
    }
}
