use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, anyhow};
use rayon::prelude::*;
use tracing::debug;

use crate::{
    catalogue::Catalogue,
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{FileAnalysis, analyze_source, file_scanner::scan_files},
    issues::{Issue, ParseErrorIssue},
};

/// Per-file results of analyzing a whole project.
#[derive(Debug, Default)]
pub struct AnalysisResults {
    /// Successfully parsed files, sorted by path.
    pub analyses: Vec<FileAnalysis>,
    pub parse_errors: Vec<ParseErrorIssue>,
}

impl AnalysisResults {
    /// All issues, parse errors included, in report order.
    pub fn issues(&self) -> Vec<Issue> {
        let mut issues: Vec<Issue> = self
            .analyses
            .iter()
            .flat_map(|analysis| analysis.issues.iter().cloned().map(Issue::PreferNative))
            .chain(self.parse_errors.iter().cloned().map(Issue::ParseError))
            .collect();
        issues.sort();
        issues
    }
}

/// Project-wide analysis state: merged configuration, catalogue and the
/// list of files to check.
///
/// Configuration priority (highest to lowest):
/// 1. CLI arguments (`--source-root`)
/// 2. `.nativizerc.json`
/// 3. Built-in defaults
pub struct CheckContext {
    pub config: Config,
    /// Built-in catalogue with the config's `alternatives` applied.
    pub catalogue: Catalogue,
    /// Directory the config file was searched from.
    pub root_dir: PathBuf,
    /// Source files to analyze, sorted.
    pub files: Vec<String>,
    pub verbose: bool,
}

impl CheckContext {
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let verbose = common_args.verbose;

        let root_dir = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let config_result = load_config(&root_dir)?;
        if verbose && !config_result.from_file {
            eprintln!(
                "Note: No {} found, using default configuration",
                CONFIG_FILE_NAME
            );
        }

        let mut config = config_result.config;
        if let Some(source_root) = &common_args.source_root {
            config.source_root = source_root
                .to_str()
                .with_context(|| anyhow!("Invalid path: {:?}", source_root))?
                .to_string();
        }

        let catalogue = Catalogue::builtin()?.with_overrides(&config.alternatives);

        let scan_result = scan_files(
            &config.source_root,
            &config.includes,
            &config.ignores,
            config.ignore_test_files,
            verbose,
        );
        if scan_result.skipped_count > 0 {
            eprintln!(
                "Warning: {} path(s) skipped due to access errors{}",
                scan_result.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }
        debug!(
            files = scan_result.files.len(),
            root = config.source_root.as_str(),
            "scanned source files"
        );

        Ok(Self {
            config,
            catalogue,
            root_dir,
            files: scan_result.files,
            verbose,
        })
    }

    /// Read and analyze one file.
    pub fn analyze_file(&self, file_path: &str) -> Result<FileAnalysis> {
        let code = std::fs::read_to_string(Path::new(file_path))
            .with_context(|| format!("Failed to read file: {}", file_path))?;
        analyze_source(code, file_path, &self.config, &self.catalogue)
    }

    /// Analyze every scanned file.
    ///
    /// Files are read and parsed in parallel, each with its own `SourceMap`.
    /// Results come back in file order.
    pub fn analyze(&self) -> AnalysisResults {
        let results: Vec<(&String, Result<FileAnalysis>)> = self
            .files
            .par_iter()
            .map(|file_path| (file_path, self.analyze_file(file_path)))
            .collect();

        let mut output = AnalysisResults::default();
        for (file_path, result) in results {
            match result {
                Ok(analysis) => output.analyses.push(analysis),
                Err(e) => {
                    if self.verbose {
                        eprintln!("Warning: {} - {:#}", file_path, e);
                    }
                    output.parse_errors.push(ParseErrorIssue {
                        file_path: file_path.clone(),
                        error: format!("{:#}", e),
                    });
                }
            }
        }
        output
    }
}
