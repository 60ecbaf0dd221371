//! Create command implementation.

use std::path::Path;

use notesmd_core::notes::{create_note, CreateRequest, NoteError, WriteOutcome};
use notesmd_core::opener::OpenType;

use super::{load_or_exit, Openers};
use crate::{open_type_for, CreateArgs};

pub fn run(config: Option<&Path>, vault: Option<&str>, args: CreateArgs) {
    let rc = load_or_exit(config, vault);

    let open = (args.open || args.editor).then(|| open_type_for(args.editor, rc.open_type));
    let request = CreateRequest {
        name: args.name,
        content: args.content,
        append: args.append,
        overwrite: args.overwrite,
        open,
    };

    let openers = Openers::from_env();
    match create_note(&rc.vault, &request, &openers.launcher()) {
        Ok(note) => {
            let verb = match note.outcome {
                WriteOutcome::Created => "Created",
                WriteOutcome::Appended => "Appended to",
                WriteOutcome::Overwritten => "Overwrote",
                WriteOutcome::Unchanged => "Exists, left unchanged:",
            };
            println!("{verb} {}", note.name);
            if note.outcome == WriteOutcome::Unchanged {
                eprintln!("Hint: use --append or --overwrite to change an existing note.");
            }
        }
        Err(e) => {
            print_error(&e, open);
            crate::logging::exit(1);
        }
    }
}

fn print_error(e: &NoteError, open: Option<OpenType>) {
    match e {
        NoteError::Path(_) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: note names are relative to the vault and may not contain '..'.");
        }
        NoteError::Open(_) if open == Some(OpenType::Editor) => {
            eprintln!("Error: note written but the editor failed: {e}");
            eprintln!("Hint: check $EDITOR.");
        }
        NoteError::Open(_) => {
            eprintln!("Error: note written but could not be opened: {e}");
        }
        _ => eprintln!("Error: {e}"),
    }
}
