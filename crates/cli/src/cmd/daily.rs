//! Daily command implementation.

use std::path::Path;

use chrono::Local;
use notesmd_core::daily::open_daily;

use super::{load_or_exit, Openers};
use crate::{open_type_for, DailyArgs};

pub fn run(config: Option<&Path>, vault: Option<&str>, args: DailyArgs) {
    let rc = load_or_exit(config, vault);

    let openers = Openers::from_env();
    let now = Local::now().naive_local();
    let open_type = open_type_for(args.editor, rc.open_type);
    match open_daily(&rc.vault, now, open_type, &openers.launcher()) {
        Ok(note) if note.created => println!("Created {}", note.name),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            crate::logging::exit(1);
        }
    }
}
