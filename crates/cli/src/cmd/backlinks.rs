//! Backlinks command implementation.

use std::path::Path;

use notesmd_core::notes::{find_backlinks, NoteError};

use super::load_or_exit;
use super::output::{
    print_backlinks_json, print_backlinks_quiet, print_backlinks_table, BacklinkOutput,
};
use crate::{BacklinksArgs, OutputFormat};

pub fn run(config: Option<&Path>, vault: Option<&str>, args: BacklinksArgs) {
    let rc = load_or_exit(config, vault);

    let backlinks = match find_backlinks(&rc.vault, &args.name) {
        Ok(links) => links,
        Err(NoteError::NotFound(path)) => {
            eprintln!("Note not found: {}", path.display());
            eprintln!("Hint: names are relative to the vault root, e.g. 'folder/note'.");
            crate::logging::exit(1);
        }
        Err(e) => {
            eprintln!("Error finding backlinks: {e}");
            crate::logging::exit(1);
        }
    };

    let outputs: Vec<BacklinkOutput> = backlinks.iter().map(BacklinkOutput::from).collect();

    match resolve_format(args.output, args.json, args.quiet) {
        OutputFormat::Table => print_backlinks_table(&outputs),
        OutputFormat::Json => print_backlinks_json(&outputs),
        OutputFormat::Quiet => print_backlinks_quiet(&outputs),
    }
}

fn resolve_format(output: OutputFormat, json: bool, quiet: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else if quiet {
        OutputFormat::Quiet
    } else {
        output
    }
}
