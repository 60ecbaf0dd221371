//! Open command implementation.

use std::path::Path;

use notesmd_core::notes::{open_note, OpenRequest};

use super::{load_or_exit, Openers};
use crate::{open_type_for, OpenArgs};

pub fn run(config: Option<&Path>, vault: Option<&str>, args: OpenArgs) {
    let rc = load_or_exit(config, vault);

    let request = OpenRequest {
        name: args.name,
        section: args.section,
        open_type: open_type_for(args.editor, rc.open_type),
    };

    let openers = Openers::from_env();
    if let Err(e) = open_note(&rc.vault, &request, &openers.launcher()) {
        eprintln!("Error: {e}");
        crate::logging::exit(1);
    }
}
