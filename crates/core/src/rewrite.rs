//! Vault-wide link rewriting.
//!
//! Rewriting happens in two steps. [`plan_rewrites`] reads every file and
//! computes its new contents in memory; [`commit_rewrites`] then writes only
//! the files that actually changed. Failures on individual files are
//! collected rather than aborting the run, and nothing is rolled back.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::links::ReplacementSet;
use crate::vault::walker::{VaultWalker, VaultWalkerError, WalkedFile};

#[derive(Debug, Error)]
pub enum FileRewriteError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Walk(#[from] VaultWalkerError),
}

impl FileRewriteError {
    /// The file the failure relates to, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } => Some(path.as_path()),
            Self::Walk(_) => None,
        }
    }
}

/// New contents for one file, computed but not yet written.
#[derive(Debug, Clone)]
pub struct StagedChange {
    pub path: PathBuf,
    pub content: Vec<u8>,
    /// Number of substitutions made in this file.
    pub replacements: usize,
}

#[derive(Debug, Default)]
pub struct RewritePlan {
    pub files_scanned: usize,
    pub changes: Vec<StagedChange>,
    pub failures: Vec<FileRewriteError>,
}

/// What a committed rewrite did.
#[derive(Debug, Default)]
pub struct RewriteReport {
    pub files_scanned: usize,
    pub files_modified: Vec<PathBuf>,
    pub references_updated: usize,
    pub failures: Vec<FileRewriteError>,
}

/// Longest-match lookup over a fixed set of byte patterns.
struct Matcher<'a> {
    /// Sorted longest first so the first hit is the longest.
    pairs: Vec<(&'a [u8], &'a [u8])>,
    starts: [bool; 256],
}

impl<'a> Matcher<'a> {
    fn new(pairs: impl IntoIterator<Item = (&'a [u8], &'a [u8])>) -> Self {
        let mut pairs: Vec<_> = pairs.into_iter().filter(|(s, _)| !s.is_empty()).collect();
        pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut starts = [false; 256];
        for (search, _) in &pairs {
            starts[usize::from(search[0])] = true;
        }
        Self { pairs, starts }
    }

    fn longest_at(&self, haystack: &[u8]) -> Option<(&'a [u8], &'a [u8])> {
        let first = *haystack.first()?;
        if !self.starts[usize::from(first)] {
            return None;
        }
        self.pairs.iter().copied().find(|(search, _)| haystack.starts_with(search))
    }
}

/// Apply every pair in `set` to `content` in one left-to-right pass.
///
/// At each position the longest matching search key wins. Replacement text
/// is never rescanned, so the result does not depend on the order of the set
/// and a pair cannot re-match text produced by another. Returns the new
/// content and the number of substitutions that changed the text.
pub fn replace_content(content: &[u8], set: &ReplacementSet) -> (Vec<u8>, usize) {
    let matcher = Matcher::new(set.iter().map(|(s, r)| (s.as_bytes(), r.as_bytes())));
    let mut out = Vec::with_capacity(content.len());
    let mut count = 0;
    let mut i = 0;

    while i < content.len() {
        match matcher.longest_at(&content[i..]) {
            Some((search, replacement)) => {
                out.extend_from_slice(replacement);
                i += search.len();
                if search != replacement {
                    count += 1;
                }
            }
            None => {
                out.push(content[i]);
                i += 1;
            }
        }
    }

    (out, count)
}

/// Count occurrences of any of `patterns`, non-overlapping, longest first.
pub fn count_matches(content: &[u8], patterns: &[String]) -> usize {
    let matcher = Matcher::new(patterns.iter().map(|p| (p.as_bytes(), p.as_bytes())));
    let mut count = 0;
    let mut i = 0;

    while i < content.len() {
        match matcher.longest_at(&content[i..]) {
            Some((search, _)) => {
                i += search.len();
                count += 1;
            }
            None => i += 1,
        }
    }

    count
}

/// Read each file and stage its rewritten contents.
///
/// Files whose content would not change are left out of the plan.
pub fn plan_rewrites(files: &[WalkedFile], set: &ReplacementSet) -> RewritePlan {
    let mut plan = RewritePlan { files_scanned: files.len(), ..Default::default() };

    for file in files {
        let original = match fs::read(&file.absolute_path) {
            Ok(bytes) => bytes,
            Err(source) => {
                warn!("cannot read {}: {source}", file.absolute_path.display());
                plan.failures
                    .push(FileRewriteError::Read { path: file.absolute_path.clone(), source });
                continue;
            }
        };

        let (content, replacements) = replace_content(&original, set);
        if content != original {
            plan.changes.push(StagedChange {
                path: file.absolute_path.clone(),
                content,
                replacements,
            });
        }
    }

    plan
}

/// Write every staged change, collecting failures.
pub fn commit_rewrites(plan: RewritePlan) -> RewriteReport {
    let mut report = RewriteReport {
        files_scanned: plan.files_scanned,
        failures: plan.failures,
        ..Default::default()
    };

    for change in plan.changes {
        match fs::write(&change.path, &change.content) {
            Ok(()) => {
                debug!("rewrote {} ({} links)", change.path.display(), change.replacements);
                report.references_updated += change.replacements;
                report.files_modified.push(change.path);
            }
            Err(source) => {
                warn!("cannot write {}: {source}", change.path.display());
                report.failures.push(FileRewriteError::Write { path: change.path, source });
            }
        }
    }

    report
}

/// Walk the vault and stage every rewrite, without writing anything.
pub fn plan_vault(
    vault_root: &Path,
    set: &ReplacementSet,
) -> Result<RewritePlan, VaultWalkerError> {
    let outcome = VaultWalker::new(vault_root)?.walk()?;
    let mut plan = plan_rewrites(&outcome.files, set);
    plan.failures.extend(outcome.errors.into_iter().map(FileRewriteError::from));
    Ok(plan)
}

/// Walk the vault, then rewrite every Markdown file that references the set.
pub fn rewrite_vault(
    vault_root: &Path,
    set: &ReplacementSet,
) -> Result<RewriteReport, VaultWalkerError> {
    Ok(commit_rewrites(plan_vault(vault_root, set)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::link_replacements;
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn mtime(path: &Path) -> SystemTime {
        fs::metadata(path).unwrap().modified().unwrap()
    }

    #[test]
    fn test_replace_content_all_link_styles() {
        let set = link_replacements("notes/a.md", "notes/b.md");
        let input = "[[a]] [[a|alias]] [[a#Heading]] [[notes/a]] [x](notes/a.md) [y](./notes/a.md) [z](notes/a)";

        let (out, count) = replace_content(input.as_bytes(), &set);

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[[b]] [[b|alias]] [[b#Heading]] [[notes/b]] [x](notes/b.md) [y](./notes/b.md) [z](notes/b)"
        );
        assert_eq!(count, 7);
    }

    #[test]
    fn test_replace_content_leaves_similar_names_alone() {
        let set = link_replacements("a.md", "b.md");
        let input = "[[ab]] [[a b]] [[xa]] [t](ba.md) a.md";

        let (out, count) = replace_content(input.as_bytes(), &set);

        assert_eq!(out, input.as_bytes());
        assert_eq!(count, 0);
    }

    #[test]
    fn test_replace_content_is_single_pass() {
        // a -> b and b -> c must not chain into a -> c
        let mut set = ReplacementSet::new();
        set.insert("[[a]]", "[[b]]");
        set.insert("[[b]]", "[[c]]");

        let (out, _) = replace_content(b"[[a]] [[b]]", &set);
        assert_eq!(out, b"[[b]] [[c]]");
    }

    #[test]
    fn test_replace_content_prefers_longest_match() {
        let mut set = ReplacementSet::new();
        set.insert("](a)", "](short)");
        set.insert("](a)x", "](long)");

        let (out, _) = replace_content(b"](a)x ](a)", &set);
        assert_eq!(out, b"](long) ](short)");
    }

    #[test]
    fn test_replace_content_is_idempotent() {
        let set = link_replacements("notes/a.md", "notes/deeper/a.md");
        let input = b"[[a]] [[notes/a|x]] [l](./notes/a.md)";

        let (once, _) = replace_content(input, &set);
        let (twice, count) = replace_content(&once, &set);

        assert_eq!(once, twice);
        assert_eq!(
            String::from_utf8(once).unwrap(),
            "[[a]] [[notes/deeper/a|x]] [l](./notes/deeper/a.md)"
        );
        // the identity basename pair matches but is not counted
        assert_eq!(count, 0);
    }

    #[test]
    fn test_replace_content_handles_non_utf8() {
        let set = link_replacements("a.md", "b.md");
        let input = [0xff, 0xfe, b'[', b'[', b'a', b']', b']', 0x80];

        let (out, count) = replace_content(&input, &set);
        assert_eq!(out, vec![0xff, 0xfe, b'[', b'[', b'b', b']', b']', 0x80]);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_count_matches() {
        let patterns = vec!["[[a]]".to_string(), "[[a|".to_string()];
        assert_eq!(count_matches(b"[[a]] text [[a|x]] [[ab]]", &patterns), 2);
        assert_eq!(count_matches(b"", &patterns), 0);
    }

    #[test]
    fn test_rewrite_vault_only_touches_changed_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let linking = write(root, "linking.md", "See [[a]].");
        let unrelated = write(root, "unrelated.md", "Nothing here.");
        let before = mtime(&unrelated);

        let set = link_replacements("a.md", "b.md");
        let report = rewrite_vault(root, &set).unwrap();

        assert_eq!(fs::read_to_string(&linking).unwrap(), "See [[b]].");
        assert_eq!(fs::read_to_string(&unrelated).unwrap(), "Nothing here.");
        assert_eq!(mtime(&unrelated), before);
        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.files_modified.len(), 1);
        assert_eq!(report.references_updated, 1);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_rewrite_vault_skips_hidden_and_non_markdown() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let text = write(root, "notes.txt", "[[a]]");
        let hidden = write(root, ".obsidian/cache.md", "[[a]]");
        let dotfile = write(root, ".scratch.md", "[[a]]");

        let set = link_replacements("a.md", "b.md");
        let report = rewrite_vault(root, &set).unwrap();

        assert_eq!(report.files_scanned, 0);
        for path in [text, hidden, dotfile] {
            assert_eq!(fs::read_to_string(path).unwrap(), "[[a]]");
        }
    }

    #[test]
    fn test_plan_collects_read_failures() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let present = write(root, "present.md", "[[a]]");
        let missing = WalkedFile {
            absolute_path: root.join("gone.md"),
            relative_path: PathBuf::from("gone.md"),
        };
        let files = vec![
            missing,
            WalkedFile {
                absolute_path: present.clone(),
                relative_path: PathBuf::from("present.md"),
            },
        ];

        let plan = plan_rewrites(&files, &link_replacements("a", "b"));

        assert_eq!(plan.failures.len(), 1);
        assert_eq!(plan.failures[0].path(), Some(root.join("gone.md").as_path()));
        assert_eq!(plan.changes.len(), 1);
        assert_eq!(plan.changes[0].path, present);
        // staging writes nothing
        assert_eq!(fs::read_to_string(&present).unwrap(), "[[a]]");
    }

    #[test]
    fn test_commit_collects_write_failures() {
        let dir = TempDir::new().unwrap();
        let ok = dir.path().join("ok.md");
        let plan = RewritePlan {
            files_scanned: 2,
            changes: vec![
                StagedChange {
                    path: dir.path().join("no/such/dir/x.md"),
                    content: b"x".to_vec(),
                    replacements: 1,
                },
                StagedChange { path: ok.clone(), content: b"[[b]]".to_vec(), replacements: 1 },
            ],
            failures: Vec::new(),
        };

        let report = commit_rewrites(plan);

        assert_eq!(report.files_modified, vec![ok.clone()]);
        assert_eq!(report.references_updated, 1);
        assert!(matches!(report.failures[0], FileRewriteError::Write { .. }));
        assert_eq!(fs::read_to_string(ok).unwrap(), "[[b]]");
    }

    #[test]
    fn test_rewrite_vault_missing_root() {
        let set = link_replacements("a", "b");
        assert!(rewrite_vault(Path::new("/nonexistent/vault"), &set).is_err());
    }
}
