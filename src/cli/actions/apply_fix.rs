//! Applying rewrites to file contents.

use crate::autofix::Fix;

/// Statistics from fixing one or more files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixStats {
    /// Calls rewritten.
    pub changes_applied: usize,
    /// Reported calls left as they are (no safe rewrite).
    pub skipped: usize,
    /// Files whose content changed.
    pub files_modified: usize,
    /// Rewrite passes run across all files.
    pub passes: usize,
}

impl std::ops::AddAssign for FixStats {
    fn add_assign(&mut self, other: Self) {
        self.changes_applied += other.changes_applied;
        self.skipped += other.skipped;
        self.files_modified += other.files_modified;
        self.passes += other.passes;
    }
}

/// Result of applying one batch of fixes to a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub content: String,
    /// Fixes that were applied, in source order.
    pub applied: Vec<Fix>,
    /// Fixes dropped because they overlap an applied one or do not fit
    /// the text.
    pub dropped: usize,
}

/// Apply non-overlapping `fixes` to `content`.
///
/// Fixes are taken in order of start offset, outermost first; a fix
/// overlapping one already accepted is dropped, to be retried on the next
/// pass against the updated text. Accepted fixes are spliced back to front so
/// earlier offsets stay valid.
pub fn apply_fixes(content: &str, fixes: &[Fix]) -> FixOutcome {
    let mut ordered: Vec<&Fix> = fixes.iter().collect();
    ordered.sort_by(|a, b| a.start().cmp(&b.start()).then(b.end().cmp(&a.end())));

    let mut accepted: Vec<Fix> = Vec::new();
    let mut dropped = 0;
    for fix in ordered {
        let fits = fix.start() < fix.end()
            && content.is_char_boundary(fix.start())
            && content.is_char_boundary(fix.end())
            && fix.end() <= content.len();
        if !fits || accepted.iter().any(|prev| prev.overlaps(fix)) {
            dropped += 1;
            continue;
        }
        accepted.push(fix.clone());
    }

    let mut output = content.to_string();
    for fix in accepted.iter().rev() {
        output.replace_range(fix.start()..fix.end(), &fix.text);
    }

    FixOutcome {
        content: output,
        applied: accepted,
        dropped,
    }
}
