//! Moving and renaming notes while keeping links intact.
//!
//! A move runs through fixed stages:
//!
//! 1. **Validating** both names against the vault root; the source must be
//!    an existing file and the destination must not exist.
//! 2. **Renaming** the file, creating missing parent directories.
//! 3. **Rewriting links** in every Markdown file, the moved note included.
//! 4. **Opening** the note at its new location, when asked to.
//!
//! An error in the first two stages aborts the move with nothing changed on
//! disk beyond created directories. From stage 3 on the rename is committed:
//! per-file rewrite failures and an opener failure are returned in the
//! [`MoveReport`] instead.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::links::{ReplacementSet, link_replacements};
use crate::opener::{Launcher, NoteTarget, OpenError, OpenType};
use crate::paths::{PathError, relative_note_path, remove_md_suffix, validate_path};
use crate::rewrite::{
    FileRewriteError, RewriteReport, StagedChange, plan_vault, rewrite_vault,
};
use crate::vault::{VaultContext, VaultWalkerError};

/// Stage a move is in, or stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStage {
    Validating,
    Renaming,
    RewritingLinks,
    Opening,
    Done,
}

#[derive(Debug, Error)]
pub enum MoveError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("source note not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Walk(#[from] VaultWalkerError),
}

impl MoveError {
    /// The stage the move was aborted in.
    pub fn stage(&self) -> MoveStage {
        match self {
            Self::Path(_) | Self::SourceNotFound(_) | Self::DestinationExists(_) => {
                MoveStage::Validating
            }
            Self::CreateDir { .. } | Self::Rename { .. } => MoveStage::Renaming,
            Self::Walk(_) => MoveStage::RewritingLinks,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoveRequest {
    /// Current note name, with or without `.md`.
    pub current: String,
    /// New note name, with or without `.md`.
    pub new: String,
    /// Open the note afterwards, and how.
    pub open: Option<OpenType>,
}

impl MoveRequest {
    pub fn new(current: impl Into<String>, new: impl Into<String>) -> Self {
        Self { current: current.into(), new: new.into(), open: None }
    }

    pub fn open_with(mut self, open_type: OpenType) -> Self {
        self.open = Some(open_type);
        self
    }
}

/// Validated source and destination, and the links that will change.
#[derive(Debug, Clone)]
pub struct MovePlan {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    /// Vault-relative, slash-separated.
    pub old_relative: String,
    pub new_relative: String,
    pub replacements: ReplacementSet,
}

/// What a move would do, computed without touching the vault.
#[derive(Debug)]
pub struct MovePreview {
    pub plan: MovePlan,
    pub changes: Vec<StagedChange>,
    pub failures: Vec<FileRewriteError>,
}

impl MovePreview {
    pub fn total_references(&self) -> usize {
        self.changes.iter().map(|c| c.replacements).sum()
    }

    pub fn files_affected(&self) -> usize {
        self.changes.len()
    }
}

/// Result of a move whose rename went through.
#[derive(Debug)]
pub struct MoveReport {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub old_relative: String,
    pub new_relative: String,
    pub rewrite: RewriteReport,
    pub open_error: Option<OpenError>,
    pub stage: MoveStage,
}

impl MoveReport {
    /// Whether every rewrite and the optional open succeeded.
    pub fn is_clean(&self) -> bool {
        self.rewrite.failures.is_empty() && self.open_error.is_none()
    }
}

/// Validate a move and derive the replacements it implies.
pub fn plan_move(vault_root: &Path, current: &str, new: &str) -> Result<MovePlan, MoveError> {
    debug!(stage = ?MoveStage::Validating, current, new);

    let old_path = validate_path(vault_root, current)?;
    let new_path = validate_path(vault_root, new)?;

    if !old_path.is_file() {
        return Err(MoveError::SourceNotFound(old_path));
    }
    // symlink_metadata so a dangling link still counts as taken
    if fs::symlink_metadata(&new_path).is_ok() {
        return Err(MoveError::DestinationExists(new_path));
    }

    // validate_path canonicalized the root these live under
    let root = vault_root.canonicalize().map_err(|source| PathError::VaultRoot {
        path: vault_root.to_path_buf(),
        source,
    })?;
    let old_relative = relative_note_path(&root, &old_path);
    let new_relative = relative_note_path(&root, &new_path);
    let replacements = link_replacements(&old_relative, &new_relative);

    Ok(MovePlan { old_path, new_path, old_relative, new_relative, replacements })
}

/// Compute everything a move would change, without changing anything.
pub fn preview_move(
    vault_root: &Path,
    current: &str,
    new: &str,
) -> Result<MovePreview, MoveError> {
    let plan = plan_move(vault_root, current, new)?;
    let staged = plan_vault(vault_root, &plan.replacements)?;
    Ok(MovePreview { plan, changes: staged.changes, failures: staged.failures })
}

/// Move a note and retarget every link to it.
pub fn move_note(
    vault: &VaultContext,
    request: &MoveRequest,
    launcher: &Launcher<'_>,
) -> Result<MoveReport, MoveError> {
    let plan = plan_move(&vault.root, &request.current, &request.new)?;

    debug!(
        stage = ?MoveStage::Renaming,
        from = %plan.old_path.display(),
        to = %plan.new_path.display()
    );
    if let Some(parent) = plan.new_path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .map_err(|source| MoveError::CreateDir { path: parent.to_path_buf(), source })?;
    }
    fs::rename(&plan.old_path, &plan.new_path).map_err(|source| MoveError::Rename {
        from: plan.old_path.clone(),
        to: plan.new_path.clone(),
        source,
    })?;
    info!("moved {} -> {}", plan.old_relative, plan.new_relative);

    debug!(stage = ?MoveStage::RewritingLinks, patterns = plan.replacements.len());
    let rewrite = rewrite_after_rename(&vault.root, &plan.replacements);

    let mut report = MoveReport {
        old_path: plan.old_path,
        new_path: plan.new_path,
        old_relative: plan.old_relative,
        new_relative: plan.new_relative,
        rewrite,
        open_error: None,
        stage: MoveStage::Done,
    };

    if let Some(open_type) = request.open {
        debug!(stage = ?MoveStage::Opening, open_type = %open_type);
        let target = NoteTarget {
            name: remove_md_suffix(&report.new_relative),
            path: &report.new_path,
            section: None,
        };
        if let Err(e) = launcher.launch(vault, target, open_type) {
            warn!("note moved but could not be opened: {e}");
            report.open_error = Some(e);
        }
    }

    Ok(report)
}

/// Rewrite links once the rename is committed. A walk that cannot start is
/// reported as a failure, since there is nothing left to abort.
fn rewrite_after_rename(vault_root: &Path, set: &ReplacementSet) -> RewriteReport {
    match rewrite_vault(vault_root, set) {
        Ok(report) => report,
        Err(e) => {
            warn!("note moved but links were not rewritten: {e}");
            RewriteReport { failures: vec![FileRewriteError::Walk(e)], ..Default::default() }
        }
    }
}
