use super::{CommandResult, CommandSummary};
use crate::issues::Issue;

/// Build a [`CommandResult`] from a command's issues, in report order.
pub fn finish(
    summary: CommandSummary,
    mut issues: Vec<Issue>,
    source_files_checked: usize,
) -> CommandResult {
    issues.sort();

    let parse_error_count = issues
        .iter()
        .filter(|i| matches!(i, Issue::ParseError(_)))
        .count();

    CommandResult {
        summary,
        issues,
        parse_error_count,
        source_files_checked,
    }
}

/// Result of a command that checks no source files.
pub fn summary_only(summary: CommandSummary) -> CommandResult {
    finish(summary, Vec::new(), 0)
}
