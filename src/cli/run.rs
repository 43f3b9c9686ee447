use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{
        CommandResult, check::check, fix::fix, init::init, list::list, rewrite::rewrite,
    },
};

/// Dispatch to the handler for the parsed command.
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Check(cmd)) => check(cmd),
        Some(Command::Fix(cmd)) => fix(cmd),
        Some(Command::List(cmd)) => list(cmd),
        Some(Command::Rewrite(cmd)) => rewrite(cmd),
        Some(Command::Init) => init(),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
