//! Set-default command implementation.

use std::path::Path;

use notesmd_core::config::writer::set_defaults;

use super::config_hint;
use crate::SetDefaultArgs;

pub fn run(config: Option<&Path>, args: SetDefaultArgs) {
    match set_defaults(config, args.name.as_deref(), args.open_type) {
        Ok(path) => {
            if let Some(name) = args.name {
                println!("Default vault: {name}");
            }
            if let Some(open_type) = args.open_type {
                println!("Open type: {open_type}");
            }
            println!("Saved to {}", path.display());
        }
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(hint) = config_hint(&e) {
                eprintln!("Hint: {hint}");
            }
            crate::logging::exit(1);
        }
    }
}
