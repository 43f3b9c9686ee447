//! Analysis engine: file discovery, parsing and call location.
//!
//! ## Module Structure
//!
//! - `data`: source positions shared with issues and reports
//! - `file_scanner`: walks the source root honouring includes and ignores
//! - `parsers`: swc parsing of JS/TS/JSX/TSX
//! - `extract`: locates library calls in a parsed module
//! - `context`: scans and analyzes a whole project in parallel

use anyhow::Result;

use crate::catalogue::Catalogue;
use crate::config::Config;
use crate::issues::PreferNativeIssue;
use crate::rules::prefer_native::check_prefer_native;

pub mod context;
pub mod data;
pub mod extract;
pub mod file_scanner;
pub mod parsers;

pub use context::{AnalysisResults, CheckContext};
pub use data::{SourceContext, SourceLocation};
pub use extract::{LocatedCall, OwnedCallInfo, locate_calls};
pub use parsers::{ParsedSource, parse_source};

/// Issues found in one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAnalysis {
    pub file_path: String,
    pub issues: Vec<PreferNativeIssue>,
}

impl FileAnalysis {
    pub fn fixable_count(&self) -> usize {
        self.issues.iter().filter(|i| i.fix.is_some()).count()
    }
}

/// Parse `code`, locate library calls and run the prefer-native rule.
///
/// Fails only when the file cannot be parsed.
pub fn analyze_source(
    code: String,
    file_path: &str,
    config: &Config,
    catalogue: &Catalogue,
) -> Result<FileAnalysis> {
    let parsed = parse_source(code, file_path)?;
    let calls = locate_calls(&parsed, file_path, &config.libraries, catalogue);
    let issues = check_prefer_native(parsed.code(), &calls, catalogue, &config.exclude_functions);
    Ok(FileAnalysis {
        file_path: file_path.to_string(),
        issues,
    })
}
