//! CLI definition and parsing.
//! Defines Args and the subcommands, and provides parse() for command-line handling.
//!
//! Notes:
//! - Subcommand names keep their underscores (`set_links`, `restore_source`, ...).
//! - --debug is a shorthand for --log-level debug.
//! - `-d` inside a subcommand means --dryrun, never --debug.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};

/// Take over files or folders: move them into a catalog folder and leave symlinks behind.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Move files into a managed catalog folder and replace them with symlinks",
    arg_required_else_help = true
)]
pub struct Args {
    /// Folder holding the catalog file and item storage (default: current directory).
    #[arg(long, short = 'C', global = true, value_hint = ValueHint::DirPath)]
    pub catalog_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(long, global = true, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, value_name = "LEVEL", help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<LogLevel>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where take_over will look for the config file (or TAKE_OVER_CONFIG if set), then exit.
    #[arg(long, help = "Print the config file location used by take_over and exit")]
    pub print_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Shared `-d/--dryrun` flag.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct DryRun {
    /// Only report what would happen; the file system is not touched.
    #[arg(short = 'd', long = "dryrun")]
    pub dryrun: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create an empty catalog in the catalog folder.
    Init {
        #[command(flatten)]
        dry: DryRun,
    },

    /// Move a file or folder into the catalog and link it back.
    #[command(name = "takeover")]
    TakeOver {
        /// Path to the file or folder to take over.
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
        /// Path links should point at instead of the catalog folder (share name, %VAR%, ...).
        #[arg(short = 't', long = "target")]
        target: Option<String>,
        /// Only take over files with these extensions, e.g. `-e xml ini`.
        #[arg(short = 'e', long = "extensions", num_args = 1..)]
        extensions: Vec<String>,
        #[command(flatten)]
        dry: DryRun,
    },

    /// (Re)create links for one item or all of them.
    #[command(name = "set_links")]
    SetLinks {
        /// Item name (see `list`). All items when omitted.
        #[arg(short = 'n', long)]
        name: Option<String>,
        /// Path links should point at for this run.
        #[arg(short = 't', long = "target")]
        target: Option<String>,
        /// Replace existing files or links.
        #[arg(short = 'f', long)]
        force: bool,
        #[command(flatten)]
        dry: DryRun,
    },

    /// Remove the links created for one item or all of them.
    #[command(name = "unset_links")]
    UnsetLinks {
        #[arg(short = 'n', long)]
        name: Option<String>,
        #[command(flatten)]
        dry: DryRun,
    },

    /// Copy stored files back to their original location.
    #[command(name = "restore_source")]
    RestoreSource {
        #[arg(short = 'n', long)]
        name: Option<String>,
        /// Forget the item afterwards; it will no longer be managed.
        #[arg(short = 'r', long)]
        remove: bool,
        /// Replace existing files or links.
        #[arg(short = 'f', long)]
        force: bool,
        #[command(flatten)]
        dry: DryRun,
    },

    /// Delete an item's storage and catalog entry.
    #[command(name = "remove_source")]
    RemoveSource {
        #[arg(short = 'n', long)]
        name: String,
        #[command(flatten)]
        dry: DryRun,
    },

    /// Re-capture an item with new extensions (not implemented).
    Update {
        #[arg(short = 'n', long)]
        name: String,
        #[arg(short = 'e', long = "extensions", num_args = 1..)]
        extensions: Vec<String>,
        #[command(flatten)]
        dry: DryRun,
    },

    /// List managed items.
    List {
        /// Show name and id.
        #[arg(short = 'v', long)]
        verbose: bool,
        /// Show every stored field.
        #[arg(long = "very_verbose")]
        very_verbose: bool,
    },
}

impl Command {
    /// Whether this invocation asked for a dry run.
    pub fn dry_run(&self) -> bool {
        match self {
            Command::Init { dry }
            | Command::TakeOver { dry, .. }
            | Command::SetLinks { dry, .. }
            | Command::UnsetLinks { dry, .. }
            | Command::RestoreSource { dry, .. }
            | Command::RemoveSource { dry, .. }
            | Command::Update { dry, .. } => dry.dryrun,
            Command::List { .. } => false,
        }
    }
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.clone()
    }

    pub fn dry_run(&self) -> bool {
        self.command.as_ref().is_some_and(Command::dry_run)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(dir) = &self.catalog_dir {
            cfg.catalog_dir = dir.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if self.dry_run() {
            cfg.dry_run = true;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
