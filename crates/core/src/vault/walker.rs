//! Recursive vault directory walker.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum VaultWalkerError {
    #[error("vault root does not exist: {0}")]
    MissingRoot(String),

    #[error("failed to walk vault directory {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),

    #[error("skipped unreadable entry {0}: {1}")]
    EntryError(String, #[source] walkdir::Error),
}

/// A Markdown file discovered in the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// Absolute path to the file.
    pub absolute_path: PathBuf,
    /// Path relative to vault root.
    pub relative_path: PathBuf,
}

/// Everything a walk found, plus the entries it could not read.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub files: Vec<WalkedFile>,
    pub errors: Vec<VaultWalkerError>,
}

/// Walker for discovering markdown files in a vault.
#[derive(Debug)]
pub struct VaultWalker {
    root: PathBuf,
}

impl VaultWalker {
    /// Create a new walker for the given vault root.
    pub fn new(root: &Path) -> Result<Self, VaultWalkerError> {
        let root = root
            .canonicalize()
            .map_err(|_| VaultWalkerError::MissingRoot(root.display().to_string()))?;

        if !root.is_dir() {
            return Err(VaultWalkerError::MissingRoot(root.display().to_string()));
        }

        Ok(Self { root })
    }

    /// Walk the vault and return all markdown files.
    ///
    /// Hidden entries are pruned and symlinks are not followed. A failure to
    /// read the root aborts the walk; failures further down are collected in
    /// [`WalkOutcome::errors`] and the walk carries on.
    pub fn walk(&self) -> Result<WalkOutcome, VaultWalkerError> {
        let mut outcome = WalkOutcome::default();

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(VaultWalkerError::WalkError(
                        self.root.display().to_string(),
                        e,
                    ));
                }
                Err(e) => {
                    let path = e.path().unwrap_or(self.root.as_path()).display().to_string();
                    warn!("skipping {path}: {e}");
                    outcome.errors.push(VaultWalkerError::EntryError(path, e));
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            let relative_path = path.strip_prefix(&self.root).unwrap_or(path).to_path_buf();

            outcome.files.push(WalkedFile { absolute_path: path.to_path_buf(), relative_path });
        }

        outcome.files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(outcome)
    }

    /// Get the vault root path.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Dotfiles and dot-directories are never part of the vault's notes.
pub fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

pub fn is_markdown_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e == "md")
}
