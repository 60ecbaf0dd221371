//! Textual patterns by which one note references another.
//!
//! Obsidian accepts several spellings for the same link target: the bare
//! basename (`[[note]]`), the vault-relative path (`[[folder/note]]`), each
//! optionally followed by an alias (`|`) or heading (`#`), and plain Markdown
//! links with or without the `.md` suffix and a leading `./`.

use std::collections::BTreeMap;

use crate::paths::{add_md_suffix, normalize_separators, remove_md_suffix};

/// Search keys mapped to their replacements.
///
/// Keys are unique. Iteration is sorted by key, but the rewriter applies the
/// whole set in a single pass so the order never affects the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementSet {
    entries: BTreeMap<String, String>,
}

impl ReplacementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair. Empty search keys are ignored.
    pub fn insert(&mut self, search: impl Into<String>, replacement: impl Into<String>) {
        let search = search.into();
        if !search.is_empty() {
            self.entries.insert(search, replacement.into());
        }
    }

    pub fn get(&self, search: &str) -> Option<&str> {
        self.entries.get(search).map(String::as_str)
    }

    pub fn contains(&self, search: &str) -> bool {
        self.entries.contains_key(search)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, r)| (s.as_str(), r.as_str()))
    }
}

/// The spellings of one note path that links are built from.
struct NoteForms {
    /// Basename without `.md`.
    base: String,
    /// Full slash-separated path without `.md`.
    stem: String,
    /// Full slash-separated path with `.md`.
    md: String,
}

impl NoteForms {
    fn new(path: &str) -> Self {
        let normalized = normalize_separators(path);
        let basename = normalized.rsplit('/').next().unwrap_or(&normalized);
        Self {
            base: remove_md_suffix(basename).to_string(),
            stem: remove_md_suffix(&normalized).to_string(),
            md: add_md_suffix(&normalized),
        }
    }

    fn has_directory(&self) -> bool {
        self.stem != self.base
    }

    fn markdown_links(&self) -> [String; 4] {
        [
            format!("]({})", self.md),
            format!("]({})", self.stem),
            format!("](./{})", self.md),
            format!("](./{})", self.stem),
        ]
    }
}

/// `[[name]]`, `[[name|` and `[[name#`.
fn wikilink_patterns(name: &str) -> [String; 3] {
    [format!("[[{name}]]"), format!("[[{name}|"), format!("[[{name}#")]
}

/// Every replacement needed to retarget links from `old_path` to `new_path`.
///
/// Both paths are vault-relative; the `.md` suffix is optional. Basename
/// wikilinks are always included. Full-path wikilinks are added only when the
/// old note lives in a subdirectory.
pub fn link_replacements(old_path: &str, new_path: &str) -> ReplacementSet {
    let old = NoteForms::new(old_path);
    let new = NoteForms::new(new_path);
    let mut set = ReplacementSet::new();

    for (search, replacement) in
        wikilink_patterns(&old.base).into_iter().zip(wikilink_patterns(&new.base))
    {
        set.insert(search, replacement);
    }

    if old.has_directory() {
        for (search, replacement) in
            wikilink_patterns(&old.stem).into_iter().zip(wikilink_patterns(&new.stem))
        {
            set.insert(search, replacement);
        }
    }

    for (search, replacement) in old.markdown_links().into_iter().zip(new.markdown_links())
    {
        set.insert(search, replacement);
    }

    set
}

/// Substrings whose presence in a file means it links to `note_path`.
pub fn backlink_search_patterns(note_path: &str) -> Vec<String> {
    let forms = NoteForms::new(note_path);
    let mut patterns = wikilink_patterns(&forms.base).to_vec();
    if forms.has_directory() {
        patterns.extend(wikilink_patterns(&forms.stem));
    }
    patterns.extend(forms.markdown_links());
    patterns
}
