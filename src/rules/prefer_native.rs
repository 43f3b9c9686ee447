//! Prefer-native rule.
//!
//! Reports every located library call that has a catalogued native
//! alternative, attaching a rewrite when one is safe.

use crate::{
    autofix::{CallInfo, Fix, create_autofix_routing, create_specialized_fix, is_quoted_string},
    catalogue::{Catalogue, CatalogueEntry},
    core::LocatedCall,
    issues::PreferNativeIssue,
};

/// Functions whose second argument is an iteratee that also accepts the
/// library's property, matches and matchesProperty shorthands.
const ITERATEE_FUNCTIONS: &[&str] = &[
    "each",
    "every",
    "filter",
    "find",
    "findIndex",
    "findLast",
    "findLastIndex",
    "flatMap",
    "forEach",
    "map",
    "reject",
    "some",
];

/// Check located calls against the catalogue.
///
/// # Arguments
/// * `code` - Source text the calls were located in
/// * `calls` - Calls found by the locator
/// * `excludes` - Function names never reported
pub fn check_prefer_native(
    code: &str,
    calls: &[LocatedCall],
    catalogue: &Catalogue,
    excludes: &[String],
) -> Vec<PreferNativeIssue> {
    calls
        .iter()
        .filter(|located| !excludes.contains(&located.function_name))
        .filter_map(|located| {
            let entry = catalogue.get(&located.function_name)?;
            let fix = located
                .call
                .and_then(|info| info.borrow(code))
                .and_then(|call| fix_call(&call, entry));
            Some(PreferNativeIssue {
                context: located.context.clone(),
                function_name: entry.name.clone(),
                alternative: entry.alternative.clone(),
                category: entry.category.clone(),
                note: entry.note.clone(),
                fix,
            })
        })
        .collect()
}

/// Rewrite `call` as directed by `entry`, or `None` when no rewrite is safe.
pub fn fix_call(call: &CallInfo, entry: &CatalogueEntry) -> Option<Fix> {
    if has_shorthand_iteratee(call, &entry.name) {
        return None;
    }
    if entry.fallback {
        create_autofix_routing(call, &entry.alternative, &entry.name)
    } else {
        create_specialized_fix(call, &entry.name)
    }
}

/// Native iteration methods only take functions. `reject` converts a
/// property shorthand itself.
fn has_shorthand_iteratee(call: &CallInfo, name: &str) -> bool {
    if !ITERATEE_FUNCTIONS.contains(&name) {
        return false;
    }
    let args = call.args();
    let Some(iteratee) = args.get(1) else {
        return false;
    };
    iteratee.starts_with(['{', '['])
        || (name != "reject" && is_quoted_string(iteratee))
}
