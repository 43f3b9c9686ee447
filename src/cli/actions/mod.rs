//! Actions that modify source files.
//!
//! - [`apply_fixes`]: splice a batch of rewrites into a file's text

mod apply_fix;

pub use apply_fix::{FixOutcome, FixStats, apply_fixes};
