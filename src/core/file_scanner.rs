//! Discovery of JavaScript and TypeScript source files under a root.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::WalkDir;

use crate::config::TEST_FILE_PATTERNS;

const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"];

/// Patterns without `*` or `?` are literal paths relative to the root.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

fn warn(verbose: bool, message: std::fmt::Arguments<'_>) {
    if verbose {
        eprintln!("{} {}", "warning:".bold().yellow(), message);
    }
}

/// Ignore rules resolved against a base directory.
#[derive(Debug, Default)]
struct IgnoreSet {
    /// Prefix-matched directories or files.
    literal_paths: Vec<PathBuf>,
    globs: Vec<Pattern>,
}

impl IgnoreSet {
    fn new(base_dir: &Path, ignores: &[String], ignore_test_files: bool, verbose: bool) -> Self {
        let mut set = Self::default();
        for raw in ignores {
            if !is_glob_pattern(raw) {
                set.literal_paths.push(base_dir.join(raw));
                continue;
            }
            match Pattern::new(raw) {
                Ok(pattern) => set.globs.push(pattern),
                Err(e) => warn(verbose, format_args!("Invalid ignore pattern '{raw}': {e}")),
            }
        }
        if ignore_test_files {
            set.globs
                .extend(TEST_FILE_PATTERNS.iter().filter_map(|p| Pattern::new(p).ok()));
        }
        set
    }

    fn is_ignored(&self, path: &Path) -> bool {
        if self.literal_paths.iter().any(|prefix| path.starts_with(prefix)) {
            return true;
        }
        let path_str = path.to_string_lossy();
        self.globs.iter().any(|p| p.matches(&path_str))
    }
}

/// Result of scanning files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Matching files, sorted and deduplicated.
    pub files: Vec<String>,
    /// Paths that could not be read while walking.
    pub skipped_count: usize,
}

/// Directories to walk: the base itself, or each include resolved against it.
fn scan_roots(base_dir: &Path, includes: &[String], verbose: bool) -> Vec<PathBuf> {
    if includes.is_empty() {
        return vec![base_dir.to_path_buf()];
    }

    let mut roots = Vec::new();
    for inc in includes {
        let full = base_dir.join(inc);
        if !is_glob_pattern(inc) {
            if full.exists() {
                roots.push(full);
            } else {
                warn(
                    verbose,
                    format_args!("Include path does not exist: {}", full.display()),
                );
            }
            continue;
        }
        match glob(&full.to_string_lossy()) {
            Ok(entries) => roots.extend(entries.flatten().filter(|entry| entry.is_dir())),
            Err(e) => warn(verbose, format_args!("Invalid glob pattern '{inc}': {e}")),
        }
    }
    roots
}

pub fn scan_files(
    base_dir: &str,
    includes: &[String],
    ignores: &[String],
    ignore_test_files: bool,
    verbose: bool,
) -> ScanResult {
    let base = Path::new(base_dir);
    let ignore_set = IgnoreSet::new(base, ignores, ignore_test_files, verbose);

    let mut files = BTreeSet::new();
    let mut skipped_count = 0;

    for root in scan_roots(base, includes, verbose) {
        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| !ignore_set.is_ignored(entry.path()));
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    warn(verbose, format_args!("Cannot access path: {e}"));
                    continue;
                }
            };
            if entry.file_type().is_file() && is_source_file(entry.path()) {
                files.insert(entry.path().to_string_lossy().into_owned());
            }
        }
    }

    ScanResult {
        files: files.into_iter().collect(),
        skipped_count,
    }
}

pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
        && !path.to_string_lossy().ends_with(".d.ts")
}
