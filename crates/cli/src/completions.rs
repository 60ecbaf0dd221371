//! Shell completion support with dynamic value completers.
//!
//! Completers read the default config, so they see the default vault only.

use clap_complete::engine::CompletionCandidate;
use notesmd_core::config::{ConfigLoader, ResolvedConfig};
use notesmd_core::notes::list_notes;
use std::ffi::OsStr;

/// Load the resolved config, returning None if it fails.
fn load_config() -> Option<ResolvedConfig> {
    ConfigLoader::load(None, None).ok()
}

/// Complete note names (vault-relative, without `.md`).
pub fn complete_notes(current: &OsStr) -> Vec<CompletionCandidate> {
    let current_str = current.to_str().unwrap_or("");

    let Some(cfg) = load_config() else {
        return vec![];
    };
    let notes = list_notes(&cfg.vault).unwrap_or_default();
    filter_prefix(notes, current_str).into_iter().map(CompletionCandidate::new).collect()
}

/// Complete vault names configured under `[vaults]`.
pub fn complete_vaults(current: &OsStr) -> Vec<CompletionCandidate> {
    let current_str = current.to_str().unwrap_or("");

    let Ok((_, cf)) = ConfigLoader::read(None) else {
        return vec![];
    };
    filter_prefix(cf.vaults.into_keys().collect(), current_str)
        .into_iter()
        .map(CompletionCandidate::new)
        .collect()
}

fn filter_prefix(mut names: Vec<String>, prefix: &str) -> Vec<String> {
    names.retain(|n| n.starts_with(prefix));
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_prefix() {
        let names = vec!["daily/2024-01-01".to_string(), "projects/x".into(), "daily/b".into()];
        assert_eq!(filter_prefix(names, "daily/"), vec!["daily/2024-01-01", "daily/b"]);
    }

    #[test]
    fn test_filter_prefix_empty_matches_all() {
        let names = vec!["b".to_string(), "a".into()];
        assert_eq!(filter_prefix(names, ""), vec!["a", "b"]);
    }
}
