//! Routing of a located call to a rewrite.

use tracing::debug;

use super::handlers::SpecializedHandler;
use super::pattern::PatternKind;
use super::precedence::is_atomic_expression;
use super::strategies::{
    create_constructor_fix, create_expression_fix, create_fixed_param_prototype_fix,
    create_prototype_method_fix, create_static_method_fix, create_zero_param_static_fix,
};
use super::{CallInfo, Fix};

/// Source functions whose predicate is negated when rewritten to `filter`.
const INVERTED_PREDICATE_FUNCTIONS: &[&str] = &["reject"];

/// Rewrite `call` of `original_name` into `target_pattern`.
///
/// A specialized handler registered for `original_name` is tried first; if it
/// declines, the strategy for the pattern's [`PatternKind`] runs. `None` means
/// no safe rewrite exists and the call should be reported without a fix.
///
/// # Examples
///
/// ```
/// use nativize::autofix::{CallInfo, create_autofix_routing};
///
/// let (name, call) = CallInfo::from_call_text("first(array)").unwrap();
/// let fix = create_autofix_routing(&call, "Array.prototype.at[0]", name).unwrap();
/// assert_eq!(fix.text, "array.at(0)");
/// ```
pub fn create_autofix_routing(
    call: &CallInfo,
    target_pattern: &str,
    original_name: &str,
) -> Option<Fix> {
    let fix = specialized(call, original_name)
        .or_else(|| generic(call, target_pattern, original_name))?;
    Some(fit_to_context(call, fix))
}

/// Rewrite `call` with the specialized handler for `original_name` only.
///
/// Used for functions whose target pattern is descriptive rather than a
/// template the generic strategies can apply.
pub fn create_specialized_fix(call: &CallInfo, original_name: &str) -> Option<Fix> {
    let fix = specialized(call, original_name)?;
    Some(fit_to_context(call, fix))
}

fn specialized(call: &CallInfo, original_name: &str) -> Option<Fix> {
    let handler = SpecializedHandler::for_function(original_name)?;
    let fix = handler.apply(call);
    match &fix {
        Some(_) => debug!(function = original_name, ?handler, "specialized rewrite"),
        None => debug!(function = original_name, ?handler, "specialized handler declined"),
    }
    fix
}

fn generic(call: &CallInfo, target_pattern: &str, original_name: &str) -> Option<Fix> {
    let kind = PatternKind::classify(target_pattern, original_name);
    let fix = match kind {
        PatternKind::ZeroParamStatic { path } => create_zero_param_static_fix(call, path),
        PatternKind::Static { type_name, method } => {
            create_static_method_fix(call, type_name, method)
        }
        PatternKind::Constructor { name } => create_constructor_fix(call, name),
        PatternKind::Prototype {
            method,
            fixed_params: Some(fixed_params),
        } => create_fixed_param_prototype_fix(call, method, fixed_params),
        PatternKind::Prototype {
            method,
            fixed_params: None,
        } => create_prototype_method_fix(
            call,
            method,
            INVERTED_PREDICATE_FUNCTIONS.contains(&original_name),
        ),
        PatternKind::Expression { template } => create_expression_fix(call, template),
    };

    match &fix {
        Some(_) => debug!(function = original_name, kind = kind.label(), "pattern rewrite"),
        None => debug!(function = original_name, kind = kind.label(), "no safe rewrite"),
    }
    fix
}

/// Parenthesize a compound replacement unless the call sits between plain
/// delimiters, where any expression can stand in for it.
fn fit_to_context(call: &CallInfo, fix: Fix) -> Fix {
    let (Some(before), Some(after)) = (
        call.full_text.get(..call.call_start),
        call.full_text.get(call.call_end..),
    ) else {
        return fix;
    };
    let before = before.trim_end();
    let after = after.trim_start();

    // `{` at the start of a statement or arrow body opens a block.
    let block_position = fix.text.starts_with('{')
        && (before.is_empty() || before.ends_with("=>") || before.ends_with([';', '{', '}']));
    let wrap = block_position
        || (!is_atomic_expression(&fix.text)
            && !(is_delimiter_before(before) && is_delimiter_after(after)));

    if wrap {
        Fix {
            text: format!("({})", fix.text),
            ..fix
        }
    } else {
        fix
    }
}

fn is_delimiter_before(before: &str) -> bool {
    if before.is_empty() || before.ends_with("=>") || before.ends_with("...") {
        return true;
    }
    if let Some(head) = before.strip_suffix("return")
        && !head
            .bytes()
            .last()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
    {
        return true;
    }

    let bytes = before.as_bytes();
    let prev = bytes.len().checked_sub(2).map(|i| bytes[i]);
    match bytes.last() {
        Some(b'(' | b',' | b'[' | b'{' | b';' | b'}' | b':') => true,
        // Assignment, not `==`, `!=`, `<=` or `>=`.
        Some(b'=') => !matches!(prev, Some(b'=' | b'!' | b'<' | b'>')),
        // Ternary branch, not `??`.
        Some(b'?') => prev != Some(b'?'),
        _ => false,
    }
}

fn is_delimiter_after(after: &str) -> bool {
    after.is_empty() || after.starts_with([')', ',', ']', '}', ';', ':'])
}
