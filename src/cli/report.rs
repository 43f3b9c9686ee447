//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo-style format, or as JSON for `check
//! --format json`. Kept apart from the analysis so nativize can be used as
//! a library.

use std::io::{self, Write};

use colored::Colorize;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use super::{
    args::OutputFormat,
    commands::{
        CommandResult, CommandSummary, FixSummary, InitSummary, ListSummary, Rewrite,
        RewriteSummary,
    },
};
use crate::config::CONFIG_FILE_NAME;
use crate::issues::{Issue, PreferNativeIssue, Report, ReportLocation, Rule, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to stdout.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
///
/// Useful for testing or redirecting output.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    // Calculate max line number width for alignment
    let max_line_width = calculate_max_line_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

/// Print a success message when no issues are found.
pub fn print_success(source_files: usize) {
    print_success_to(source_files, &mut io::stdout().lock());
}

/// Print a success message to a custom writer.
pub fn print_success_to<W: Write>(source_files: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} source {} - no issues found",
            source_files,
            if source_files == 1 { "file" } else { "files" }
        )
        .green()
    );
}

/// Print a warning about files that could not be parsed.
pub fn print_parse_warning(count: usize, verbose: bool) {
    print_parse_warning_to(count, verbose, &mut io::stderr().lock());
}

/// Print a parse warning to a custom writer.
pub fn print_parse_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

// ============================================================
// JSON Output
// ============================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    files_checked: usize,
    issues: Vec<JsonIssue<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonIssue<'a> {
    file: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    col: Option<usize>,
    severity: Severity,
    rule: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    function: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alternative: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<&'a str>,
}

impl<'a> JsonIssue<'a> {
    fn new(issue: &'a Issue) -> Self {
        let (line, col) = match issue.location() {
            ReportLocation::Source(ctx) => (Some(ctx.line()), Some(ctx.col())),
            ReportLocation::File { .. } => (None, None),
        };
        let native = match issue {
            Issue::PreferNative(issue) => Some(issue),
            Issue::ParseError(_) => None,
        };
        Self {
            file: issue.file_path(),
            line,
            col,
            severity: issue.report_severity(),
            rule: issue.report_rule().to_string(),
            message: issue.message(),
            function: native.map(|i| i.function_name.as_str()),
            alternative: native.map(|i| i.alternative.as_str()),
            note: native.and_then(|i| i.note.as_deref()),
            fix: issue.fix().map(|f| f.text.as_str()),
        }
    }
}

/// Print issues as a single JSON document.
pub fn report_json_to<W: Write>(
    issues: &[Issue],
    source_files: usize,
    writer: &mut W,
) -> serde_json::Result<()> {
    let doc = JsonReport {
        files_checked: source_files,
        issues: issues.iter().map(JsonIssue::new).collect(),
    };
    serde_json::to_writer_pretty(&mut *writer, &doc)?;
    let _ = writeln!(writer);
    Ok(())
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    match issue.location() {
        ReportLocation::Source(ctx) => {
            let _ = writeln!(
                writer,
                "  {} {}:{}:{}",
                "-->".blue(),
                ctx.file_path(),
                ctx.line(),
                ctx.col()
            );
            print_source_context(
                writer,
                &ctx.source_line,
                ctx.line(),
                ctx.col(),
                severity,
                max_line_width,
            );
        }
        ReportLocation::File { path } => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
        }
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    if let Some(hint) = issue.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_source_context<W: Write>(
    writer: &mut W,
    source_line: &str,
    line: usize,
    col: usize,
    severity: Severity,
    max_line_width: usize,
) {
    let caret_char = match severity {
        Severity::Error => "^".red(),
        Severity::Warning => "^".yellow(),
    };

    let _ = writeln!(
        writer,
        "{:>width$} {}",
        "",
        "|".blue(),
        width = max_line_width
    );
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        line.to_string().blue(),
        "|".blue(),
        source_line,
        width = max_line_width
    );

    // Caret pointing to the column (col is 1-based)
    let prefix: String = source_line.chars().take(col.saturating_sub(1)).collect();
    let caret_padding = UnicodeWidthStr::width(prefix.as_str());
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        caret_char,
        width = max_line_width,
        padding = caret_padding
    );
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues.len() - total_errors;
    let fixable = issues.iter().filter(|i| i.fix().is_some()).count();

    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})",
        FAILURE_MARK.red(),
        issues.len(),
        total_errors,
        if total_errors == 1 { "error" } else { "errors" }.red(),
        total_warnings,
        if total_warnings == 1 {
            "warning"
        } else {
            "warnings"
        }
        .yellow()
    );
    if fixable > 0 {
        let _ = writeln!(
            writer,
            "  {} of them can be rewritten with `{}`",
            fixable,
            "nativize fix".cyan()
        );
    }
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source(ctx) => Some(ctx.line()),
            ReportLocation::File { .. } => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

// ============================================================
// Command Output
// ============================================================

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Check(summary) if summary.format == OutputFormat::Json => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = report_json_to(&result.issues, result.source_files_checked, &mut stdout)
            {
                eprintln!("Error: failed to write JSON report: {}", e);
            }
            return;
        }
        CommandSummary::Check(_) => {
            report(&result.issues);
            if result.issues.is_empty() {
                print_success(result.source_files_checked);
            }
        }
        CommandSummary::Fix(summary) => {
            report(&result.issues);
            print_fix_to(summary, &mut io::stdout().lock());
        }
        CommandSummary::List(summary) => print_list_to(summary, &mut io::stdout().lock()),
        CommandSummary::Rewrite(summary) => print_rewrite_to(summary, &mut io::stdout().lock()),
        CommandSummary::Init(summary) => print_init(summary),
    }

    print_parse_warning(result.parse_error_count, verbose);
}

fn print_fix_to<W: Write>(summary: &FixSummary, writer: &mut W) {
    if !summary.is_apply {
        for rewrite in &summary.rewrites {
            print_rewrite_preview(rewrite, writer);
        }
    }

    let count = summary.rewrites.len();
    if count == 0 {
        let _ = writeln!(writer, "{} Nothing to rewrite", SUCCESS_MARK.green());
    } else if summary.is_apply {
        let _ = writeln!(
            writer,
            "{} {} call(s) in {} file(s).",
            "Rewrote".green().bold(),
            count,
            summary.stats.files_modified
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {} call(s) in {} file(s).",
            "Would rewrite".yellow().bold(),
            count,
            summary.stats.files_modified
        );
        let _ = writeln!(writer, "Run with {} to rewrite these calls.", "--apply".cyan());
    }

    if !summary.unfixable.is_empty() {
        let _ = writeln!(
            writer,
            "Note: {} call(s) have no safe automatic rewrite:",
            summary.unfixable.len()
        );
        for issue in &summary.unfixable {
            print_unfixable(issue, writer);
        }
    }
}

fn print_rewrite_preview<W: Write>(rewrite: &Rewrite, writer: &mut W) {
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}  {}",
        "-->".blue(),
        rewrite.file_path,
        rewrite.line,
        rewrite.col,
        rewrite.function_name.bold()
    );
    let _ = writeln!(writer, "    {} {}", "-".red(), rewrite.before.red());
    let _ = writeln!(writer, "    {} {}", "+".green(), rewrite.after.green());
    let _ = writeln!(writer);
}

fn print_unfixable<W: Write>(issue: &PreferNativeIssue, writer: &mut W) {
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}  {} {}",
        "-->".blue(),
        issue.context.file_path(),
        issue.context.line(),
        issue.context.col(),
        issue.function_name.bold(),
        format!("({})", Rule::PreferNative).dimmed()
    );
}

fn print_list_to<W: Write>(summary: &ListSummary, writer: &mut W) {
    let name_width = column_width(summary.entries.iter().map(|e| e.name.as_str()));
    let alt_width = column_width(summary.entries.iter().map(|e| e.alternative.as_str()));

    for entry in &summary.entries {
        let _ = writeln!(
            writer,
            "{}  {}  {}  {}",
            pad(&entry.name, name_width).bold(),
            pad(&entry.alternative, alt_width),
            entry.category.cyan(),
            entry.fix_kind().dimmed()
        );
    }
    let _ = writeln!(writer, "\n{} function(s)", summary.entries.len());
}

/// Display width of the widest cell.
fn column_width<'a>(cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(UnicodeWidthStr::width).max().unwrap_or(0)
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(cell));
    format!("{}{}", cell, " ".repeat(fill))
}

fn print_rewrite_to<W: Write>(summary: &RewriteSummary, writer: &mut W) {
    match &summary.replacement {
        Some(replacement) => {
            let _ = writeln!(writer, "{}", replacement);
        }
        None => {
            let _ = writeln!(
                writer,
                "{} no safe fix for {} (pattern: {})",
                FAILURE_MARK.red(),
                summary.function_name.bold(),
                summary.alternative
            );
        }
    }
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else {
        eprintln!(
            "{} {} already exists",
            FAILURE_MARK.red(),
            CONFIG_FILE_NAME
        );
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::autofix::Fix;
    use crate::catalogue::Catalogue;
    use crate::cli::actions::FixStats;
    use crate::core::{SourceContext, SourceLocation};
    use crate::issues::ParseErrorIssue;

    fn strip_ansi(s: &str) -> String {
        // Simple ANSI escape code stripper for testing
        let mut result = String::new();
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                // Skip until 'm'
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next == 'm' {
                        break;
                    }
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    fn native_issue(file: &str, line: usize, col: usize, fix: Option<&str>) -> PreferNativeIssue {
        PreferNativeIssue {
            context: SourceContext::new(
                SourceLocation::new(file, line, col),
                "const ks = _.keys(o);",
            ),
            function_name: "keys".to_string(),
            alternative: "Object.keys".to_string(),
            category: "Object".to_string(),
            note: None,
            fix: fix.map(|text| Fix {
                range: (11, 20),
                text: text.to_string(),
            }),
        }
    }

    fn render<F: FnOnce(&mut Vec<u8>)>(f: F) -> String {
        let mut output = Vec::new();
        f(&mut output);
        strip_ansi(&String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_report_empty() {
        let mut output = Vec::new();
        report_to(&[], &mut output);
        assert!(output.is_empty());
    }

    #[test]
    fn test_report_prefer_native_issue() {
        let issue = Issue::PreferNative(native_issue("./src/a.js", 3, 12, Some("Object.keys(o)")));
        let stripped = render(|out| report_to(&[issue], out));

        assert!(stripped.contains("warning: keys -> Object.keys  prefer-native"));
        assert!(stripped.contains("--> ./src/a.js:3:12"));
        assert!(stripped.contains("3 | const ks = _.keys(o);"));
        assert!(stripped.contains("|            ^"));
        assert!(stripped.contains("= note: fix: Object.keys(o)"));
        assert!(stripped.contains("1 problems (0 errors, 1 warning)"));
        assert!(stripped.contains("1 of them can be rewritten"));
    }

    #[test]
    fn test_report_hint_and_unfixable() {
        let mut issue = native_issue("./src/a.js", 1, 1, None);
        issue.note = Some("Deep paths are not supported.".to_string());
        let stripped = render(|out| report_to(&[Issue::PreferNative(issue)], out));

        assert!(stripped.contains("= note: no safe automatic fix"));
        assert!(stripped.contains("= hint: Deep paths are not supported."));
        assert!(!stripped.contains("can be rewritten"));
    }

    #[test]
    fn test_report_parse_error() {
        let issue = Issue::ParseError(ParseErrorIssue {
            file_path: "./src/broken.ts".to_string(),
            error: "1:7: Expected ident".to_string(),
        });
        let stripped = render(|out| report_to(&[issue], out));

        assert!(stripped.contains("error: 1:7: Expected ident  parse-error"));
        assert!(stripped.contains("--> ./src/broken.ts"));
        assert!(stripped.contains("1 problems (1 error, 0 warnings)"));
    }

    #[test]
    fn test_report_sorting_by_file_and_line() {
        let issues = vec![
            Issue::PreferNative(native_issue("./b.js", 1, 1, None)),
            Issue::PreferNative(native_issue("./a.js", 9, 1, None)),
            Issue::PreferNative(native_issue("./a.js", 2, 1, None)),
        ];
        let stripped = render(|out| report_to(&issues, out));

        let a2 = stripped.find("./a.js:2:1").unwrap();
        let a9 = stripped.find("./a.js:9:1").unwrap();
        let b1 = stripped.find("./b.js:1:1").unwrap();
        assert!(a2 < a9 && a9 < b1);
    }

    #[test]
    fn test_report_unicode_source_line() {
        let mut issue = native_issue("./a.js", 1, 7, None);
        issue.context.source_line = "'日本'; _.keys(o);".to_string();
        let stripped = render(|out| report_to(&[Issue::PreferNative(issue)], out));
        // Two wide characters take four columns.
        assert!(stripped.contains("|         ^"));
    }

    #[test]
    fn test_print_success() {
        let stripped = render(|out| print_success_to(1, out));
        assert!(stripped.contains("Checked 1 source file - no issues found"));

        let stripped = render(|out| print_success_to(3, out));
        assert!(stripped.contains("Checked 3 source files - no issues found"));
    }

    #[test]
    fn test_parse_warning() {
        let stripped = render(|out| print_parse_warning_to(2, false, out));
        assert!(stripped.contains("2 file(s) could not be parsed (use -v for details)"));

        assert!(render(|out| print_parse_warning_to(2, true, out)).is_empty());
        assert!(render(|out| print_parse_warning_to(0, false, out)).is_empty());
    }

    #[test]
    fn test_report_json() {
        let issues = vec![
            Issue::ParseError(ParseErrorIssue {
                file_path: "./src/broken.ts".to_string(),
                error: "1:7: Expected ident".to_string(),
            }),
            Issue::PreferNative(native_issue("./src/a.js", 3, 12, Some("Object.keys(o)"))),
        ];
        let mut output = Vec::new();
        report_json_to(&issues, 2, &mut output).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(json["filesChecked"], 2);
        assert_eq!(json["issues"][0]["rule"], "parse-error");
        assert_eq!(json["issues"][0]["severity"], "error");
        assert!(json["issues"][0].get("line").is_none());

        let native = &json["issues"][1];
        assert_eq!(native["line"], 3);
        assert_eq!(native["col"], 12);
        assert_eq!(native["function"], "keys");
        assert_eq!(native["alternative"], "Object.keys");
        assert_eq!(native["fix"], "Object.keys(o)");
        assert!(native.get("note").is_none());
    }

    #[test]
    fn test_print_fix_dry_run() {
        let summary = FixSummary {
            is_apply: false,
            stats: FixStats {
                changes_applied: 1,
                skipped: 1,
                files_modified: 1,
                passes: 1,
            },
            rewrites: vec![Rewrite {
                file_path: "./src/a.js".to_string(),
                line: 3,
                col: 12,
                function_name: "keys".to_string(),
                before: "_.keys(o)".to_string(),
                after: "Object.keys(o)".to_string(),
            }],
            unfixable: vec![native_issue("./src/b.js", 4, 1, None)],
        };
        let stripped = render(|out| print_fix_to(&summary, out));

        assert!(stripped.contains("--> ./src/a.js:3:12  keys"));
        assert!(stripped.contains("- _.keys(o)"));
        assert!(stripped.contains("+ Object.keys(o)"));
        assert!(stripped.contains("Would rewrite 1 call(s) in 1 file(s)."));
        assert!(stripped.contains("Run with --apply"));
        assert!(stripped.contains("Note: 1 call(s) have no safe automatic rewrite:"));
        assert!(stripped.contains("--> ./src/b.js:4:1  keys (prefer-native)"));
    }

    #[test]
    fn test_print_fix_applied() {
        let summary = FixSummary {
            is_apply: true,
            stats: FixStats {
                changes_applied: 2,
                files_modified: 1,
                ..FixStats::default()
            },
            rewrites: vec![
                Rewrite {
                    file_path: "./a.js".to_string(),
                    line: 1,
                    col: 1,
                    function_name: "keys".to_string(),
                    before: "_.keys(o)".to_string(),
                    after: "Object.keys(o)".to_string(),
                };
                2
            ],
            unfixable: Vec::new(),
        };
        let stripped = render(|out| print_fix_to(&summary, out));

        assert!(stripped.contains("Rewrote 2 call(s) in 1 file(s)."));
        assert!(!stripped.contains("- _.keys(o)"));
        assert!(!stripped.contains("--apply"));
    }

    #[test]
    fn test_print_fix_nothing() {
        let summary = FixSummary {
            is_apply: false,
            stats: FixStats::default(),
            rewrites: Vec::new(),
            unfixable: Vec::new(),
        };
        assert!(render(|out| print_fix_to(&summary, out)).contains("Nothing to rewrite"));
    }

    #[test]
    fn test_print_list() {
        let catalogue = Catalogue::builtin().unwrap();
        let entries = ["clamp", "keys"]
            .iter()
            .map(|name| catalogue.get(name).unwrap().clone())
            .collect();
        let stripped = render(|out| print_list_to(&ListSummary { entries }, out));

        let lines: Vec<&str> = stripped.lines().collect();
        assert!(lines[0].starts_with("clamp  "));
        assert!(lines[0].contains("Number"));
        assert!(lines[0].ends_with("specialized"));
        assert!(lines[1].starts_with("keys   Object.keys"));
        assert!(stripped.contains("2 function(s)"));
    }

    #[test]
    fn test_print_rewrite() {
        let summary = RewriteSummary {
            function_name: "first".to_string(),
            alternative: "Array.prototype.at[0]".to_string(),
            replacement: Some("xs.at(0)".to_string()),
        };
        assert_eq!(render(|out| print_rewrite_to(&summary, out)), "xs.at(0)\n");

        let declined = RewriteSummary {
            replacement: None,
            ..summary
        };
        assert!(
            render(|out| print_rewrite_to(&declined, out))
                .contains("no safe fix for first (pattern: Array.prototype.at[0])")
        );
    }
}
