use anyhow::{Context, Result};

use super::super::args::RewriteCommand;
use super::{CommandResult, CommandSummary, RewriteSummary, helper::summary_only};
use crate::{
    autofix::CallInfo,
    catalogue::{Catalogue, CatalogueEntry},
    rules::fix_call,
};

pub fn rewrite(cmd: RewriteCommand) -> Result<CommandResult> {
    let summary = rewrite_call(&cmd.call, cmd.pattern.as_deref(), &Catalogue::builtin()?)?;
    Ok(summary_only(CommandSummary::Rewrite(summary)))
}

/// Run the engine on a standalone call expression such as `_.pick(o, ["a"])`.
fn rewrite_call(
    call_text: &str,
    pattern: Option<&str>,
    catalogue: &Catalogue,
) -> Result<RewriteSummary> {
    let (name, call) = CallInfo::from_call_text(call_text)
        .with_context(|| format!("Not a single call expression: {}", call_text))?;

    let entry = match pattern {
        Some(pattern) => CatalogueEntry::custom(name, pattern),
        None => catalogue
            .get(name)
            .cloned()
            .with_context(|| format!("'{}' is not catalogued; pass --pattern", name))?,
    };

    Ok(RewriteSummary {
        function_name: entry.name.clone(),
        replacement: fix_call(&call, &entry).map(|fix| fix.text),
        alternative: entry.alternative,
    })
}
