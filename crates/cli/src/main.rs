mod cmd;
mod completions;
mod logging;

use clap::{ArgGroup, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::engine::ArgValueCompleter;
use clap_complete::env::CompleteEnv;
use notesmd_core::config::ConfigLoader;
use notesmd_core::opener::OpenType;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "notesmd",
    version,
    about = "Create, open, search and move notes in an Obsidian vault without breaking links"
)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Vault to act on instead of the default one
    #[arg(short = 'v', long, global = true)]
    vault: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print the resolved vault
    Doctor,

    /// Create a note, or add to an existing one
    #[command(visible_alias = "c")]
    Create(CreateArgs),

    /// Open a note in Obsidian or in $EDITOR
    #[command(visible_alias = "o")]
    Open(OpenArgs),

    /// Move or rename a note and update every link to it
    #[command(visible_alias = "m")]
    Move(MoveArgs),

    /// Create today's daily note if needed, then open it
    #[command(visible_alias = "d")]
    Daily(DailyArgs),

    /// Pick a note with a fuzzy finder and open it
    #[command(visible_alias = "s")]
    Search(SearchArgs),

    /// List the notes that link to a note
    #[command(visible_alias = "b")]
    Backlinks(BacklinksArgs),

    /// Set the default vault and/or how notes are opened
    #[command(visible_alias = "sd")]
    SetDefault(SetDefaultArgs),
}

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
    /// Paths only, one per line
    Quiet,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("mode").args(["append", "overwrite"])))]
pub struct CreateArgs {
    /// Note name, relative to the vault (".md" optional)
    pub name: String,

    /// Text to write; \n, \t and friends are expanded
    #[arg(short, long, default_value = "")]
    pub content: String,

    /// Append to the note if it already exists
    #[arg(short, long)]
    pub append: bool,

    /// Replace the note if it already exists
    #[arg(short, long)]
    pub overwrite: bool,

    /// Open the note afterwards
    #[arg(long)]
    pub open: bool,

    /// Open in $EDITOR instead of Obsidian (implies --open)
    #[arg(short, long)]
    pub editor: bool,
}

#[derive(Debug, Args)]
pub struct OpenArgs {
    /// Note name, relative to the vault
    #[arg(add = ArgValueCompleter::new(completions::complete_notes))]
    pub name: String,

    /// Heading to jump to
    #[arg(short, long)]
    pub section: Option<String>,

    /// Open in $EDITOR instead of Obsidian
    #[arg(short, long)]
    pub editor: bool,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Current note name, relative to the vault
    #[arg(add = ArgValueCompleter::new(completions::complete_notes))]
    pub current: String,

    /// New note name, relative to the vault
    pub new: String,

    /// Open the note at its new location
    #[arg(short, long)]
    pub open: bool,

    /// Open in $EDITOR instead of Obsidian (implies --open)
    #[arg(short, long)]
    pub editor: bool,

    /// Show what would change without moving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct DailyArgs {
    /// Open in $EDITOR instead of Obsidian
    #[arg(short, long)]
    pub editor: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Open the selected note in $EDITOR instead of Obsidian
    #[arg(short, long)]
    pub editor: bool,
}

#[derive(Debug, Args)]
pub struct BacklinksArgs {
    /// Note to find references to
    #[arg(add = ArgValueCompleter::new(completions::complete_notes))]
    pub name: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, conflicts_with = "quiet")]
    pub json: bool,

    /// Shorthand for --output quiet
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("setting").args(["name", "open_type"]).required(true).multiple(true)))]
pub struct SetDefaultArgs {
    /// Vault to use when --vault is not given
    #[arg(add = ArgValueCompleter::new(completions::complete_vaults))]
    pub name: Option<String>,

    /// Where notes open by default: obsidian or editor
    #[arg(long)]
    pub open_type: Option<OpenType>,
}

/// Pick the open type for a command: `--editor` wins over the configured one.
pub fn open_type_for(editor_flag: bool, configured: OpenType) -> OpenType {
    if editor_flag { OpenType::Editor } else { configured }
}

fn main() {
    CompleteEnv::with_factory(Cli::command).complete();

    let cli = Cli::parse();

    // Logging only needs the config file, not a resolvable vault
    let logging = ConfigLoader::load_logging(cli.config.as_deref()).unwrap_or_default();
    logging::init(&logging);

    let config = cli.config.as_deref();
    let vault = cli.vault.as_deref();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(config, vault),
        Commands::Create(args) => cmd::create::run(config, vault, args),
        Commands::Open(args) => cmd::open::run(config, vault, args),
        Commands::Move(args) => cmd::move_cmd::run(config, vault, args),
        Commands::Daily(args) => cmd::daily::run(config, vault, args),
        Commands::Search(args) => cmd::search::run(config, vault, args),
        Commands::Backlinks(args) => cmd::backlinks::run(config, vault, args),
        Commands::SetDefault(args) => cmd::set_default::run(config, args),
    }

    logging::flush();
}
