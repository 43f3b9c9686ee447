//! Fix command - rewrite library calls into native code.
//!
//! Each file is rewritten in passes: analyze, apply every non-overlapping
//! fix, then re-analyze the result. Nested calls that overlapped an outer
//! rewrite are picked up by the next pass. A pass whose output no longer
//! parses is discarded.
//!
//! Use `--apply` to write the files (default is dry-run mode).

use std::fs;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::debug;

use super::super::{
    actions::{FixStats, apply_fixes},
    args::FixCommand,
};
use super::{CommandResult, CommandSummary, FixSummary, Rewrite, helper::finish};
use crate::{
    autofix::Fix,
    catalogue::Catalogue,
    config::Config,
    core::{CheckContext, FileAnalysis, analyze_source},
    issues::{Issue, ParseErrorIssue, PreferNativeIssue},
};

/// Upper bound on rewrite passes per file.
pub const MAX_PASSES: usize = 10;

/// Outcome of fixing one file in memory.
#[derive(Debug)]
pub struct FileFix {
    pub content: String,
    pub rewrites: Vec<Rewrite>,
    pub unfixable: Vec<PreferNativeIssue>,
    pub passes: usize,
}

impl FileFix {
    pub fn stats(&self) -> FixStats {
        FixStats {
            changes_applied: self.rewrites.len(),
            skipped: self.unfixable.len(),
            files_modified: usize::from(!self.rewrites.is_empty()),
            passes: self.passes,
        }
    }
}

pub fn fix(cmd: FixCommand) -> Result<CommandResult> {
    let ctx = CheckContext::new(&cmd.common)?;
    let is_apply = cmd.apply;

    let results: Vec<(&String, Result<FileFix>)> = ctx
        .files
        .par_iter()
        .map(|file_path| (file_path, fix_file(&ctx, file_path)))
        .collect();

    let mut stats = FixStats::default();
    let mut rewrites = Vec::new();
    let mut unfixable = Vec::new();
    let mut issues = Vec::new();

    for (file_path, result) in results {
        let file_fix = match result {
            Ok(file_fix) => file_fix,
            Err(e) => {
                if ctx.verbose {
                    eprintln!("Warning: {} - {:#}", file_path, e);
                }
                issues.push(Issue::ParseError(ParseErrorIssue {
                    file_path: file_path.clone(),
                    error: format!("{:#}", e),
                }));
                continue;
            }
        };

        if is_apply && !file_fix.rewrites.is_empty() {
            fs::write(file_path, &file_fix.content)
                .with_context(|| format!("Failed to write file: {}", file_path))?;
        }
        stats += file_fix.stats();
        rewrites.extend(file_fix.rewrites);
        unfixable.extend(file_fix.unfixable);
    }

    let summary = FixSummary {
        is_apply,
        stats,
        rewrites,
        unfixable,
    };
    Ok(finish(CommandSummary::Fix(summary), issues, ctx.files.len()))
}

fn fix_file(ctx: &CheckContext, file_path: &str) -> Result<FileFix> {
    let original = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read file: {}", file_path))?;
    fix_source(original, file_path, &ctx.config, &ctx.catalogue)
}

/// Rewrite `code` until no fix applies or [`MAX_PASSES`] is reached.
///
/// Fails only when the original code does not parse.
pub fn fix_source(
    code: String,
    file_path: &str,
    config: &Config,
    catalogue: &Catalogue,
) -> Result<FileFix> {
    let mut analysis = analyze_source(code.clone(), file_path, config, catalogue)?;
    let mut content = code;
    let mut rewrites = Vec::new();
    let mut passes = 0;

    while passes < MAX_PASSES {
        let fixes: Vec<Fix> = analysis
            .issues
            .iter()
            .filter_map(|issue| issue.fix.clone())
            .collect();
        if fixes.is_empty() {
            break;
        }

        let outcome = apply_fixes(&content, &fixes);
        if outcome.applied.is_empty() {
            break;
        }

        let next = match analyze_source(outcome.content.clone(), file_path, config, catalogue) {
            Ok(next) => next,
            Err(e) => {
                debug!(file = file_path, pass = passes + 1, error = %e, "pass discarded");
                break;
            }
        };

        debug!(
            file = file_path,
            pass = passes + 1,
            applied = outcome.applied.len(),
            deferred = outcome.dropped,
            "rewrite pass"
        );
        rewrites.extend(describe(&analysis, &content, &outcome.applied));
        content = outcome.content;
        analysis = next;
        passes += 1;
    }

    let unfixable = analysis
        .issues
        .into_iter()
        .filter(|issue| issue.fix.is_none())
        .collect();

    Ok(FileFix {
        content,
        rewrites,
        unfixable,
        passes,
    })
}

/// Preview entries for the fixes applied to `content` in one pass.
fn describe(analysis: &FileAnalysis, content: &str, applied: &[Fix]) -> Vec<Rewrite> {
    applied
        .iter()
        .filter_map(|fix| {
            let issue = analysis
                .issues
                .iter()
                .find(|issue| issue.fix.as_ref() == Some(fix))?;
            Some(Rewrite {
                file_path: analysis.file_path.clone(),
                line: issue.context.line(),
                col: issue.context.col(),
                function_name: issue.function_name.clone(),
                before: content.get(fix.start()..fix.end())?.to_string(),
                after: fix.text.clone(),
            })
        })
        .collect()
}
