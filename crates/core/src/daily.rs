//! Today's note, named and placed the way Obsidian's daily notes plugin does.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::config::obsidian::{DailyNotesConfig, daily_notes_config};
use crate::notes::{NoteError, WriteOutcome, write_note_file};
use crate::opener::{Launcher, NoteTarget, OpenType};
use crate::paths::{add_md_suffix, validate_path};
use crate::vault::VaultContext;

/// Format the plugin falls back to.
pub const DEFAULT_DAILY_FORMAT: &str = "YYYY-MM-DD";

/// Moment.js tokens and their strftime equivalents. Tokens sharing a first
/// letter are listed longest first.
const MOMENT_TOKENS: [(&str, &str); 18] = [
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("dd", "%a"),
    ("HH", "%H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("A", "%p"),
    ("a", "%P"),
];

#[derive(Debug)]
pub struct DailyNote {
    /// Vault-relative name without `.md`.
    pub name: String,
    pub path: PathBuf,
    pub created: bool,
}

/// Translate a Moment.js format into a chrono strftime string.
///
/// Converted in one pass, so text produced for one token is never read as
/// another. `[...]` spans are copied literally, as Moment does.
pub fn moment_to_strftime(format: &str) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut rest = format;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            let (literal, tail) = match rest[1..].split_once(']') {
                Some((literal, tail)) => (literal, tail),
                None => (&rest[1..], ""),
            };
            out.push_str(&literal.replace('%', "%%"));
            rest = tail;
            continue;
        }

        if let Some((token, strftime)) = MOMENT_TOKENS.iter().find(|(t, _)| rest.starts_with(t)) {
            out.push_str(strftime);
            rest = &rest[token.len()..];
            continue;
        }

        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Vault-relative name (without `.md`) of the daily note for `now`.
pub fn daily_note_name(config: &DailyNotesConfig, now: NaiveDateTime) -> Result<String, NoteError> {
    let format = if config.format.is_empty() { DEFAULT_DAILY_FORMAT } else { &config.format };

    let mut name = String::new();
    write!(name, "{}", now.format(&moment_to_strftime(format)))
        .map_err(|_| NoteError::DateFormat(format.to_string()))?;

    let folder = config.folder.trim_matches('/');
    if folder.is_empty() { Ok(name) } else { Ok(format!("{folder}/{name}")) }
}

/// Create the daily note for `now` if it is missing, then open it.
///
/// A new note starts from the configured template; an unreadable template
/// gives an empty note.
pub fn open_daily(
    vault: &VaultContext,
    now: NaiveDateTime,
    open_type: OpenType,
    launcher: &Launcher<'_>,
) -> Result<DailyNote, NoteError> {
    let config = daily_notes_config(&vault.root);
    let name = daily_note_name(&config, now)?;
    let path = validate_path(&vault.root, &name)?;

    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .map_err(|source| NoteError::CreateDir { path: parent.to_path_buf(), source })?;
    }

    let content = if path.exists() { String::new() } else { template_content(vault, &config) };
    let created = write_note_file(&path, &content, false, false)? == WriteOutcome::Created;
    debug!("daily note {name} (created: {created})");

    let target = NoteTarget { name: &name, path: &path, section: None };
    launcher.launch(vault, target, open_type)?;

    Ok(DailyNote { name, path, created })
}

fn template_content(vault: &VaultContext, config: &DailyNotesConfig) -> String {
    if config.template.is_empty() {
        return String::new();
    }
    let template = vault.root.join(add_md_suffix(&config.template));
    fs::read_to_string(&template).unwrap_or_else(|e| {
        warn!("ignoring daily note template {}: {e}", template.display());
        String::new()
    })
}
