//! Note path handling.
//!
//! Note names arrive from the command line with or without the `.md` suffix,
//! with either separator, and possibly with subdirectories. Everything that
//! touches the filesystem goes through [`validate_path`] first so that no
//! operation can reach outside the vault root.

use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::vault::walker;

/// Suffix every note file carries on disk.
pub const MD_SUFFIX: &str = ".md";

#[derive(Debug, Error)]
pub enum PathError {
    #[error("note name is empty")]
    EmptyName,

    #[error("'{0}' does not name a note file")]
    NotAFile(String),

    #[error("'{name}' resolves outside the vault root {root}")]
    Escape { root: PathBuf, name: String },

    #[error("failed to resolve vault root {path}: {source}")]
    VaultRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Append `.md` unless the name already ends with it (case-sensitive).
pub fn add_md_suffix(name: &str) -> String {
    if name.ends_with(MD_SUFFIX) { name.to_string() } else { format!("{name}{MD_SUFFIX}") }
}

/// Strip a single trailing `.md`.
pub fn remove_md_suffix(name: &str) -> &str {
    name.strip_suffix(MD_SUFFIX).unwrap_or(name)
}

/// Convert backslashes to forward slashes. Links always use `/`.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Resolve a note name to an absolute path inside the vault.
///
/// The `.md` suffix is added when missing. Names containing a `..` segment
/// are rejected outright, and so is any name whose deepest existing ancestor
/// directory resolves (through symlinks) outside the canonical vault root.
/// The note itself does not need to exist; if it is a symlink, the link is
/// returned rather than its target. The file name must be visible: `notes/`
/// or `.hidden` would produce a dotfile the vault walker never sees.
pub fn validate_path(vault_root: &Path, note_name: &str) -> Result<PathBuf, PathError> {
    if note_name.trim().is_empty() {
        return Err(PathError::EmptyName);
    }

    let root = vault_root
        .canonicalize()
        .map_err(|source| PathError::VaultRoot { path: vault_root.to_path_buf(), source })?;

    let requested = PathBuf::from(add_md_suffix(note_name));
    let escape = || PathError::Escape { root: root.clone(), name: note_name.to_string() };

    if requested.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(escape());
    }
    match requested.file_name() {
        Some(file) if !walker::is_hidden(file) => {}
        _ => return Err(PathError::NotAFile(note_name.to_string())),
    }

    // An absolute name replaces the root here; the prefix check below decides.
    let candidate: PathBuf = root.join(&requested).components().collect();
    let resolved = resolve_existing_prefix(&candidate);

    if resolved.starts_with(&root) { Ok(resolved) } else { Err(escape()) }
}

/// Canonicalize the longest existing prefix of `path`'s parent and re-attach
/// the rest. The final component is never resolved.
fn resolve_existing_prefix(path: &Path) -> PathBuf {
    let (Some(file), Some(parent)) = (path.file_name(), path.parent()) else {
        return path.to_path_buf();
    };
    let mut existing = parent.to_path_buf();
    let mut missing = vec![file.to_os_string()];

    loop {
        if let Ok(resolved) = existing.canonicalize() {
            return missing.iter().rev().fold(resolved, |acc, part| acc.join(part));
        }
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(parent)) => {
                missing.push(name.to_os_string());
                existing = parent.to_path_buf();
            }
            _ => return path.to_path_buf(),
        }
    }
}

/// Vault-relative, slash-separated form of `path`, as it appears in links.
pub fn relative_note_path(vault_root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(vault_root).unwrap_or(path);
    let parts: Vec<_> = relative
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    normalize_separators(&parts.join("/"))
}

/// Place a bare note name under the vault's default folder for new notes.
///
/// Names that already carry a directory are left alone.
pub fn apply_default_folder(name: &str, folder: Option<&str>) -> String {
    let folder = folder.map(|f| f.trim_matches('/')).filter(|f| !f.is_empty());
    match folder {
        Some(folder) if !name.contains('/') && !name.contains('\\') => {
            format!("{folder}/{name}")
        }
        _ => name.to_string(),
    }
}
