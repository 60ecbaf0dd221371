//! Search command implementation.

use std::path::Path;

use dialoguer::theme::ColorfulTheme;
use dialoguer::FuzzySelect;
use notesmd_core::notes::{list_notes, open_note, OpenRequest};
use tracing::debug;

use super::{load_or_exit, Openers};
use crate::{open_type_for, SearchArgs};

pub fn run(config: Option<&Path>, vault: Option<&str>, args: SearchArgs) {
    let rc = load_or_exit(config, vault);

    let notes = match list_notes(&rc.vault) {
        Ok(notes) => notes,
        Err(e) => {
            eprintln!("Error listing notes: {e}");
            crate::logging::exit(1);
        }
    };

    if notes.is_empty() {
        println!("(no notes found in {})", rc.vault.root.display());
        return;
    }

    let selection = match FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Note")
        .items(&notes)
        .default(0)
        .interact_opt()
    {
        Ok(selection) => selection,
        Err(e) => {
            eprintln!("Selector error: {e}");
            crate::logging::exit(1);
        }
    };

    let Some(idx) = selection else {
        debug!("selection cancelled");
        return;
    };

    let request = OpenRequest {
        name: notes[idx].clone(),
        section: None,
        open_type: open_type_for(args.editor, rc.open_type),
    };
    let openers = Openers::from_env();
    if let Err(e) = open_note(&rc.vault, &request, &openers.launcher()) {
        eprintln!("Error: {e}");
        crate::logging::exit(1);
    }
}
