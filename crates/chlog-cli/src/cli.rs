use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "chlog",
    about = "Change-log viewer: highlighted before/after diffs of edited fields",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "ansi")]
    pub format: OutputFormat,

    /// TOML file with diff settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Terminal colours
    Ansi,
    Html,
    Markdown,
    /// `[-removed-]` / `{+added+}` brackets
    Plain,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render the change cards of a change-log document
    Render(RenderArgs),
    /// Diff two raw values given on the command line
    Diff(DiffArgs),
}

#[derive(Args)]
pub struct RenderArgs {
    /// JSON file holding a change-log entry or a list of change records
    pub file: PathBuf,
    /// Card title prefix (overrides the configured field label)
    #[arg(long)]
    pub label: Option<String>,
}

#[derive(Args)]
pub struct DiffArgs {
    /// Value before the change (JSON, or literal text)
    pub old: String,
    /// Value after the change (JSON, or literal text)
    pub new: String,
    /// Field name used in the card title
    #[arg(long, default_value = "value")]
    pub field: String,
    /// Identity key for pairing array elements
    #[arg(long)]
    pub identity_key: Option<String>,
}
