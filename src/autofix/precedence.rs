//! Operator-precedence checks on raw expression text.
//!
//! Decides whether an argument must be parenthesized before it is used as the
//! receiver of `.method(...)` or spliced into a larger template. The check is a
//! single pass over top-level code bytes, not an expression parser, so it only
//! knows a fixed set of low-precedence operators.

use super::tokenizer::{CodeByte, CodeScanner};

/// Whether `text` would bind differently if `.method(...)` were appended to it.
///
/// True when any of these appear outside brackets, strings and templates:
/// `||`, `&&`, `??`, a ternary, an assignment operator, or an arrow function.
/// Comparisons and optional chaining alone never trigger wrapping.
///
/// # Examples
///
/// ```
/// use nativize::autofix::precedence::needs_parentheses;
///
/// assert!(needs_parentheses("data || []"));
/// assert!(!needs_parentheses("func(a || b)"));
/// assert!(!needs_parentheses("user?.items"));
/// ```
pub fn needs_parentheses(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }

    let bytes = text.as_bytes();
    let at = |i: usize| bytes.get(i).copied();

    CodeScanner::new(text)
        .filter(|code| code.depth.is_top_level())
        .any(|CodeByte { index, byte, .. }| match byte {
            b'|' => at(index + 1) == Some(b'|'),
            b'&' => at(index + 1) == Some(b'&'),
            // `?.` is optional chaining unless a digit follows (`a ?.5 : b`).
            b'?' => {
                at(index + 1) != Some(b'.') || at(index + 2).is_some_and(|b| b.is_ascii_digit())
            }
            b'=' => is_assignment_or_arrow(bytes, index),
            _ => false,
        })
}

/// `=` at `index` is an assignment (`=`, `+=`, `<<=`, ...) or the `=>` of an
/// arrow, but not part of `==`, `===`, `!=`, `<=` or `>=`.
fn is_assignment_or_arrow(bytes: &[u8], index: usize) -> bool {
    let next = bytes.get(index + 1).copied();
    if next == Some(b'=') {
        return false;
    }
    if next == Some(b'>') {
        return true;
    }

    let prev = index.checked_sub(1).map(|i| bytes[i]);
    match prev {
        Some(b'=') | Some(b'!') => false,
        // `<=` / `>=` compare, `<<=` / `>>=` / `>>>=` assign.
        Some(op @ (b'<' | b'>')) => index
            .checked_sub(2)
            .is_some_and(|i| bytes[i] == op),
        _ => true,
    }
}

/// Whether `text` is a single primary expression: an identifier, literal,
/// member chain or call, which can replace a call expression in any position.
///
/// Any top-level whitespace or operator (other than `.` and `?.`) makes the
/// text compound.
pub fn is_atomic_expression(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }

    let bytes = text.as_bytes();
    !CodeScanner::new(text)
        .filter(|code| code.depth.is_top_level())
        .any(|CodeByte { index, byte, .. }| match byte {
            b'?' => bytes.get(index + 1) != Some(&b'.'),
            b if b.is_ascii_whitespace() => true,
            b'+' | b'-' | b'*' | b'/' | b'%' | b'<' | b'>' | b'=' | b'!' | b'&' | b'|'
            | b'^' | b'~' | b':' | b',' => true,
            _ => false,
        })
}
