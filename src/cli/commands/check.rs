use anyhow::Result;

use super::super::args::CheckCommand;
use super::{CheckSummary, CommandResult, CommandSummary, helper::finish};
use crate::core::CheckContext;

pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let ctx = CheckContext::new(&cmd.common)?;
    let results = ctx.analyze();

    Ok(finish(
        CommandSummary::Check(CheckSummary { format: cmd.format }),
        results.issues(),
        ctx.files.len(),
    ))
}
