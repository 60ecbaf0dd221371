//! Creating, opening, listing and back-referencing notes.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::links::backlink_search_patterns;
use crate::opener::{Launcher, NoteTarget, OpenError, OpenType};
use crate::paths::{
    PathError, apply_default_folder, relative_note_path, remove_md_suffix, validate_path,
};
use crate::rewrite::count_matches;
use crate::vault::{VaultContext, VaultWalker, VaultWalkerError};

#[derive(Debug, Error)]
pub enum NoteError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("note not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write note {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Walk(#[from] VaultWalkerError),

    #[error(transparent)]
    Open(#[from] OpenError),

    #[error("cannot format a date with '{0}'")]
    DateFormat(String),
}

/// What [`write_note_file`] did to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Appended,
    Overwritten,
    /// The note existed and neither append nor overwrite was requested.
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    pub name: String,
    /// Raw content; escape sequences are expanded before writing.
    pub content: String,
    pub append: bool,
    pub overwrite: bool,
    pub open: Option<OpenType>,
}

#[derive(Debug)]
pub struct CreatedNote {
    pub path: PathBuf,
    /// Name after the default folder was applied.
    pub name: String,
    pub outcome: WriteOutcome,
}

#[derive(Debug, Clone)]
pub struct OpenRequest {
    pub name: String,
    pub section: Option<String>,
    pub open_type: OpenType,
}

/// A note that links to another one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backlink {
    pub path: PathBuf,
    pub relative_path: String,
    pub references: usize,
}

/// Expand the backslash escapes a shell leaves in `--content`.
///
/// Handles `\n`, `\r`, `\t`, `\\`, `\"` and `\'` in a single pass, so `\\n`
/// becomes a literal backslash followed by `n`.
pub fn normalize_content(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let replacement = match chars.peek() {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('\\') => '\\',
            Some('"') => '"',
            Some('\'') => '\'',
            _ => {
                out.push(c);
                continue;
            }
        };
        chars.next();
        out.push(replacement);
    }

    out
}

/// Write `content` to `path`, honouring append and overwrite.
///
/// A missing file is always created. An existing file is appended to,
/// replaced, or left untouched when neither flag is set.
pub fn write_note_file(
    path: &Path,
    content: &str,
    append: bool,
    overwrite: bool,
) -> Result<WriteOutcome, NoteError> {
    let write_err = |source| NoteError::Write { path: path.to_path_buf(), source };

    if !path.exists() {
        fs::write(path, content).map_err(write_err)?;
        return Ok(WriteOutcome::Created);
    }

    if append {
        let mut file = OpenOptions::new().append(true).open(path).map_err(write_err)?;
        file.write_all(content.as_bytes()).map_err(write_err)?;
        return Ok(WriteOutcome::Appended);
    }

    if overwrite {
        fs::write(path, content).map_err(write_err)?;
        return Ok(WriteOutcome::Overwritten);
    }

    Ok(WriteOutcome::Unchanged)
}

/// Create (or extend) a note and optionally open it.
pub fn create_note(
    vault: &VaultContext,
    request: &CreateRequest,
    launcher: &Launcher<'_>,
) -> Result<CreatedNote, NoteError> {
    let name = apply_default_folder(&request.name, vault.default_folder.as_deref());
    let path = validate_path(&vault.root, &name)?;

    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .map_err(|source| NoteError::CreateDir { path: parent.to_path_buf(), source })?;
    }

    let content = normalize_content(&request.content);
    let outcome = write_note_file(&path, &content, request.append, request.overwrite)?;
    debug!("{} -> {outcome:?}", path.display());

    if let Some(open_type) = request.open {
        let target = NoteTarget { name: &name, path: &path, section: None };
        launcher.launch(vault, target, open_type)?;
    }

    Ok(CreatedNote { path, name, outcome })
}

/// Open a note in the app (by name) or in the editor (by validated path).
pub fn open_note(
    vault: &VaultContext,
    request: &OpenRequest,
    launcher: &Launcher<'_>,
) -> Result<(), NoteError> {
    // The app resolves names itself; only the editor needs a real path.
    let path = match request.open_type {
        OpenType::Editor => validate_path(&vault.root, &request.name)?,
        OpenType::Obsidian => vault.root.join(&request.name),
    };
    let target = NoteTarget {
        name: &request.name,
        path: &path,
        section: request.section.as_deref(),
    };
    launcher.launch(vault, target, request.open_type)?;
    Ok(())
}

/// Vault-relative note names without `.md`, sorted.
pub fn list_notes(vault: &VaultContext) -> Result<Vec<String>, VaultWalkerError> {
    let walker = VaultWalker::new(&vault.root)?;
    let outcome = walker.walk()?;
    Ok(outcome
        .files
        .iter()
        .map(|f| {
            let relative = relative_note_path(walker.root(), &f.absolute_path);
            remove_md_suffix(&relative).to_string()
        })
        .collect())
}

/// Every other note that references `name`, with a count of references.
pub fn find_backlinks(vault: &VaultContext, name: &str) -> Result<Vec<Backlink>, NoteError> {
    let path = validate_path(&vault.root, name)?;
    if !path.is_file() {
        return Err(NoteError::NotFound(path));
    }

    let walker = VaultWalker::new(&vault.root)?;
    let patterns = backlink_search_patterns(&relative_note_path(walker.root(), &path));
    let outcome = walker.walk()?;

    let mut backlinks = Vec::new();
    for file in outcome.files {
        if file.absolute_path == path {
            continue;
        }
        let content = match fs::read(&file.absolute_path) {
            Ok(content) => content,
            Err(e) => {
                warn!("skipping {}: {e}", file.absolute_path.display());
                continue;
            }
        };
        let references = count_matches(&content, &patterns);
        if references > 0 {
            backlinks.push(Backlink {
                relative_path: relative_note_path(walker.root(), &file.absolute_path),
                path: file.absolute_path,
                references,
            });
        }
    }

    Ok(backlinks)
}
