//! Shared output formatting for move and backlinks.

use std::path::Path;

use notesmd_core::mover::{MovePreview, MoveReport};
use notesmd_core::notes::Backlink;
use notesmd_core::rewrite::FileRewriteError;
use serde::Serialize;

/// Formatted backlink for JSON output.
#[derive(Debug, Serialize)]
pub struct BacklinkOutput {
    pub path: String,
    pub references: usize,
}

impl From<&Backlink> for BacklinkOutput {
    fn from(link: &Backlink) -> Self {
        Self { path: link.relative_path.clone(), references: link.references }
    }
}

#[derive(Debug, Serialize)]
pub struct FileOutput {
    pub path: String,
    /// Only known before the rewrite is committed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct FailureOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub error: String,
}

/// Result of `move`, or of `move --dry-run`.
#[derive(Debug, Serialize)]
pub struct MoveOutput {
    pub from: String,
    pub to: String,
    pub dry_run: bool,
    pub files: Vec<FileOutput>,
    pub references_updated: usize,
    pub failures: Vec<FailureOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_error: Option<String>,
}

impl MoveOutput {
    pub fn from_preview(preview: &MovePreview, root: &Path) -> Self {
        Self {
            from: preview.plan.old_relative.clone(),
            to: preview.plan.new_relative.clone(),
            dry_run: true,
            files: preview
                .changes
                .iter()
                .map(|c| FileOutput {
                    path: relative(root, &c.path),
                    references: Some(c.replacements),
                })
                .collect(),
            references_updated: preview.total_references(),
            failures: failures(&preview.failures, root),
            open_error: None,
        }
    }

    pub fn from_report(report: &MoveReport, root: &Path) -> Self {
        Self {
            from: report.old_relative.clone(),
            to: report.new_relative.clone(),
            dry_run: false,
            files: report
                .rewrite
                .files_modified
                .iter()
                .map(|p| FileOutput { path: relative(root, p), references: None })
                .collect(),
            references_updated: report.rewrite.references_updated,
            failures: failures(&report.rewrite.failures, root),
            open_error: report.open_error.as_ref().map(ToString::to_string),
        }
    }
}

fn failures(errors: &[FileRewriteError], root: &Path) -> Vec<FailureOutput> {
    errors
        .iter()
        .map(|e| FailureOutput { path: e.path().map(|p| relative(root, p)), error: e.to_string() })
        .collect()
}

/// Vault-relative, slash-separated display path.
pub fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).to_string_lossy().replace('\\', "/")
}

/// Print backlinks as a table.
pub fn print_backlinks_table(links: &[BacklinkOutput]) {
    if links.is_empty() {
        println!("(no backlinks found)");
        return;
    }

    let path_width = links.iter().map(|l| l.path.len()).max().unwrap_or(4).clamp(4, 60);

    println!("{:<path_width$}  REFS", "PATH");
    println!("{:-<path_width$}  {:-<4}", "", "");
    for link in links {
        println!("{:<path_width$}  {}", truncate(&link.path, path_width), link.references);
    }

    println!();
    println!("-- {} backlinks --", links.len());
}

/// Print backlinks as JSON.
pub fn print_backlinks_json(links: &[BacklinkOutput]) {
    println!("{}", serde_json::to_string_pretty(&links).unwrap_or_default());
}

/// Print backlinks as paths only (quiet mode).
pub fn print_backlinks_quiet(links: &[BacklinkOutput]) {
    for link in links {
        println!("{}", link.path);
    }
}

/// Truncate string with ellipsis if needed.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(3);
    format!("{}...", s.chars().take(keep).collect::<String>())
}
