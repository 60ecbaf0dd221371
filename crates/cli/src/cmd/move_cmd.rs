//! Move command implementation.

use std::path::{Path, PathBuf};

use notesmd_core::mover::{move_note, preview_move, MoveError, MovePreview, MoveReport, MoveRequest};
use notesmd_core::opener::OpenError;
use notesmd_core::rewrite::FileRewriteError;

use super::output::{relative, MoveOutput};
use super::{load_or_exit, Openers};
use crate::{open_type_for, MoveArgs};

pub fn run(config: Option<&Path>, vault: Option<&str>, args: MoveArgs) {
    let rc = load_or_exit(config, vault);
    // Walked paths are canonical; strip against the same form
    let root: PathBuf = rc.vault.root.canonicalize().unwrap_or_else(|_| rc.vault.root.clone());

    if args.dry_run {
        match preview_move(&rc.vault.root, &args.current, &args.new) {
            Ok(preview) if args.json => print_json(&MoveOutput::from_preview(&preview, &root)),
            Ok(preview) => print_preview(&preview, &root),
            Err(e) => {
                print_error(&e);
                crate::logging::exit(1);
            }
        }
        return;
    }

    let mut request = MoveRequest::new(args.current, args.new);
    if args.open || args.editor {
        request = request.open_with(open_type_for(args.editor, rc.open_type));
    }

    let openers = Openers::from_env();
    match move_note(&rc.vault, &request, &openers.launcher()) {
        Ok(report) if args.json => print_json(&MoveOutput::from_report(&report, &root)),
        Ok(report) => print_report(&report),
        Err(e) => {
            print_error(&e);
            crate::logging::exit(1);
        }
    }
}

fn print_json(output: &MoveOutput) {
    println!("{}", serde_json::to_string_pretty(output).unwrap_or_default());
}

fn print_error(e: &MoveError) {
    match e {
        MoveError::SourceNotFound(path) => {
            eprintln!("Error: Source note not found: {}", path.display());
        }
        MoveError::DestinationExists(path) => {
            eprintln!("Error: Destination already exists: {}", path.display());
            eprintln!("Hint: pick another name, or move the existing note first.");
        }
        MoveError::Path(_) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: note names are relative to the vault and may not contain '..'.");
        }
        _ => eprintln!("Error: {e}"),
    }
}

fn print_preview(preview: &MovePreview, root: &Path) {
    println!("Moving: {} -> {}", preview.plan.old_relative, preview.plan.new_relative);
    println!();

    if preview.changes.is_empty() {
        println!("No references found to update.");
    } else {
        println!(
            "Found {} reference(s) in {} file(s):",
            preview.total_references(),
            preview.files_affected()
        );
        for change in &preview.changes {
            println!("  {} ({})", relative(root, &change.path), change.replacements);
        }
    }

    print_failures(&preview.failures);
    println!();
    println!("(dry-run mode - no changes made)");
}

fn print_report(report: &MoveReport) {
    println!("Moved: {} -> {}", report.old_relative, report.new_relative);
    println!("Files modified: {}", report.rewrite.files_modified.len());
    println!("References updated: {}", report.rewrite.references_updated);

    print_failures(&report.rewrite.failures);
    if let Some(ref e) = report.open_error {
        print_open_error(e);
    }
}

fn print_failures(failures: &[FileRewriteError]) {
    if failures.is_empty() {
        return;
    }
    eprintln!("Warning: {} file(s) could not be updated:", failures.len());
    for failure in failures {
        eprintln!("  {failure}");
    }
}

fn print_open_error(e: &OpenError) {
    eprintln!("Warning: note moved but could not be opened: {e}");
    if matches!(e, OpenError::EmptyEditor) {
        eprintln!("Hint: set $EDITOR.");
    }
}
