//! Vault discovery.
//!
//! A vault is a directory of Markdown notes. [`VaultContext`] carries what the
//! note operations need to know about the active one; [`walker`] enumerates
//! its notes.

pub mod walker;

use std::path::PathBuf;

pub use walker::{VaultWalker, VaultWalkerError, WalkOutcome, WalkedFile};

/// The active vault, as resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultContext {
    /// Name Obsidian knows the vault by; used in `obsidian://` URIs.
    pub name: String,
    /// Absolute path of the vault directory.
    pub root: PathBuf,
    /// Folder new notes go into when the name carries no directory.
    pub default_folder: Option<String>,
}

impl VaultContext {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), root: root.into(), default_folder: None }
    }

    pub fn with_default_folder(mut self, folder: Option<String>) -> Self {
        self.default_folder = folder;
        self
    }
}
