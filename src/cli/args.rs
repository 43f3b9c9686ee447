//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Report library calls that have native alternatives
//! - `fix`: Rewrite those calls in place (dry-run by default)
//! - `list`: Print the function catalogue
//! - `rewrite`: Rewrite a single call expression given on the command line
//! - `init`: Write a default configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Fix(cmd)) => cmd.common.verbose,
            Some(Command::List(_) | Command::Rewrite(_) | Command::Init) | None => false,
        }
    }
}

/// Arguments shared by the commands that scan a project.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Source code root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct FixCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Actually rewrite files (default is dry-run)
    #[arg(long)]
    pub apply: bool,
}

#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only list functions in this category (e.g. Array, Object)
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Debug, Args)]
pub struct RewriteCommand {
    /// Call expression to rewrite, e.g. '_.pick(obj, ["a"])'
    pub call: String,

    /// Target pattern (defaults to the catalogue entry for the callee)
    #[arg(long)]
    pub pattern: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report utility-library calls that have native alternatives
    Check(CheckCommand),
    /// Rewrite utility-library calls into native code
    Fix(FixCommand),
    /// List catalogued functions and their native alternatives
    List(ListCommand),
    /// Rewrite a single call expression and print the result
    Rewrite(RewriteCommand),
    /// Initialize a new .nativizerc.json configuration file
    Init,
}
