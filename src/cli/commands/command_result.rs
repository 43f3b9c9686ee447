use super::super::{actions::FixStats, args::OutputFormat, exit_status::ExitStatus};
use crate::catalogue::CatalogueEntry;
use crate::issues::{Issue, PreferNativeIssue};

#[derive(Debug)]
pub enum CommandSummary {
    Check(CheckSummary),
    Fix(FixSummary),
    List(ListSummary),
    Rewrite(RewriteSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct CheckSummary {
    pub format: OutputFormat,
}

/// One rewritten call, as shown in the fix preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub file_path: String,
    pub line: usize,
    pub col: usize,
    pub function_name: String,
    pub before: String,
    pub after: String,
}

#[derive(Debug)]
pub struct FixSummary {
    pub is_apply: bool,
    pub stats: FixStats,
    pub rewrites: Vec<Rewrite>,
    /// Calls still reported after the last pass, with no safe rewrite.
    pub unfixable: Vec<PreferNativeIssue>,
}

#[derive(Debug)]
pub struct ListSummary {
    pub entries: Vec<CatalogueEntry>,
}

#[derive(Debug)]
pub struct RewriteSummary {
    pub function_name: String,
    pub alternative: String,
    /// `None` when the engine declined.
    pub replacement: Option<String>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running a command.
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Issues to report. For `fix` this holds parse errors only.
    pub issues: Vec<Issue>,
    /// Number of files that failed to parse.
    pub parse_error_count: usize,
    /// Number of source files that were checked.
    pub source_files_checked: usize,
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        if self.parse_error_count > 0 {
            return ExitStatus::Error;
        }
        let failed = match &self.summary {
            CommandSummary::Check(_) => !self.issues.is_empty(),
            // A dry run with pending rewrites signals work to do.
            CommandSummary::Fix(summary) => !summary.is_apply && !summary.rewrites.is_empty(),
            CommandSummary::List(_) => false,
            CommandSummary::Rewrite(summary) => summary.replacement.is_none(),
            CommandSummary::Init(summary) => !summary.created,
        };
        if failed {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}
