//! Handing notes to something that can display them.
//!
//! Notes open either in the Obsidian app, through an `obsidian://open` URI
//! passed to the platform's URI handler, or in a text editor taken from
//! `$EDITOR`. Both sit behind the [`Opener`] trait so note operations can be
//! exercised without spawning processes.

use std::fmt;
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::vault::VaultContext;

/// Base of the URI that asks Obsidian to open a note.
pub const OBSIDIAN_OPEN_URI: &str = "obsidian://open";

/// Editors that return immediately unless told to wait.
const WAIT_EDITORS: [&str; 5] = ["code", "vscode", "subl", "atom", "mate"];

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("editor command is empty")]
    EmptyEditor,

    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}")]
    Failed { program: String, status: ExitStatus },
}

/// Where notes are opened by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenType {
    #[default]
    Obsidian,
    Editor,
}

impl OpenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Obsidian => "obsidian",
            Self::Editor => "editor",
        }
    }
}

impl fmt::Display for OpenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("invalid open type '{0}': must be 'obsidian' or 'editor'")]
pub struct ParseOpenTypeError(String);

impl FromStr for OpenType {
    type Err = ParseOpenTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "obsidian" => Ok(Self::Obsidian),
            "editor" => Ok(Self::Editor),
            other => Err(ParseOpenTypeError(other.to_string())),
        }
    }
}

/// Something that can open a target string.
pub trait Opener {
    /// Build `base?k=v&...` with percent-encoded values, in the given order.
    fn construct_uri(&self, base: &str, params: &[(&str, &str)]) -> String {
        construct_uri(base, params)
    }

    fn invoke(&self, target: &str) -> Result<(), OpenError>;
}

pub fn construct_uri(base: &str, params: &[(&str, &str)]) -> String {
    let query: Vec<String> =
        params.iter().map(|(k, v)| format!("{k}={}", urlencoding::encode(v))).collect();
    if query.is_empty() { base.to_string() } else { format!("{base}?{}", query.join("&")) }
}

/// Opens URIs with the platform's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl Opener for SystemOpener {
    fn invoke(&self, target: &str) -> Result<(), OpenError> {
        let (program, args) = system_open_command(target);
        run(program, &args)
    }
}

#[cfg(target_os = "macos")]
fn system_open_command(target: &str) -> (&'static str, Vec<String>) {
    ("open", vec![target.to_string()])
}

// `cmd /C start` would split the URI at `&`
#[cfg(target_os = "windows")]
fn system_open_command(target: &str) -> (&'static str, Vec<String>) {
    ("rundll32", vec!["url.dll,FileProtocolHandler".into(), target.to_string()])
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn system_open_command(target: &str) -> (&'static str, Vec<String>) {
    ("xdg-open", vec![target.to_string()])
}

/// Opens files in a terminal or GUI text editor.
#[derive(Debug, Clone)]
pub struct EditorOpener {
    command: String,
}

impl EditorOpener {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into() }
    }

    /// `$EDITOR`, then `$VISUAL`, then `vim`.
    pub fn from_env() -> Self {
        let command = ["EDITOR", "VISUAL"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "vim".to_string());
        Self::new(command)
    }

    /// Program and arguments used to open `file`.
    ///
    /// Arguments already present in the editor command are kept. GUI editors
    /// that detach get `--wait` unless `-w` or `--wait` is already there.
    pub fn command_line(&self, file: &str) -> Result<(String, Vec<String>), OpenError> {
        let mut parts = self.command.split_whitespace();
        let program = parts.next().ok_or(OpenError::EmptyEditor)?.to_string();
        let mut args: Vec<String> = parts.map(str::to_string).collect();

        if needs_wait_flag(&program) && !args.iter().any(|a| a == "--wait" || a == "-w") {
            args.push("--wait".to_string());
        }
        args.push(file.to_string());

        Ok((program, args))
    }
}

impl Opener for EditorOpener {
    fn invoke(&self, target: &str) -> Result<(), OpenError> {
        let (program, args) = self.command_line(target)?;
        run(&program, &args)
    }
}

fn needs_wait_flag(program: &str) -> bool {
    let name = Path::new(program)
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    WAIT_EDITORS.iter().any(|editor| name.contains(editor))
}

fn run(program: &str, args: &[String]) -> Result<(), OpenError> {
    debug!("running {program} {}", args.join(" "));
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| OpenError::Spawn { program: program.to_string(), source })?;

    if status.success() {
        Ok(())
    } else {
        Err(OpenError::Failed { program: program.to_string(), status })
    }
}

/// What to open: the note name as Obsidian knows it, and its file.
#[derive(Debug, Clone, Copy)]
pub struct NoteTarget<'a> {
    /// Vault-relative name, used in the URI.
    pub name: &'a str,
    /// Absolute path, used by the editor.
    pub path: &'a Path,
    /// Heading to jump to. Only the app honours it.
    pub section: Option<&'a str>,
}

/// Pair of openers, one per [`OpenType`].
pub struct Launcher<'a> {
    pub app: &'a dyn Opener,
    pub editor: &'a dyn Opener,
}

impl<'a> Launcher<'a> {
    pub fn new(app: &'a dyn Opener, editor: &'a dyn Opener) -> Self {
        Self { app, editor }
    }

    pub fn launch(
        &self,
        vault: &VaultContext,
        target: NoteTarget<'_>,
        open_type: OpenType,
    ) -> Result<(), OpenError> {
        match open_type {
            OpenType::Editor => self.editor.invoke(&target.path.to_string_lossy()),
            OpenType::Obsidian => {
                let file = match target.section {
                    Some(section) if !section.is_empty() => {
                        format!("{}#{section}", target.name)
                    }
                    _ => target.name.to_string(),
                };
                let params = [("vault", vault.name.as_str()), ("file", file.as_str())];
                let uri = self.app.construct_uri(OBSIDIAN_OPEN_URI, &params);
                debug!("opening {uri}");
                self.app.invoke(&uri)
            }
        }
    }
}
