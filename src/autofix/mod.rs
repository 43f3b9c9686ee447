//! Autofix transformation engine.
//!
//! Turns the raw text of one located call expression plus a target pattern
//! into a single text replacement, or declines. Every function here is pure
//! and never panics on malformed input: "cannot safely rewrite" is `None`.
//!
//! ## Module Structure
//!
//! - `tokenizer`: top-level comma and matching-parenthesis scanning
//! - `precedence`: decides when spliced text needs parentheses
//! - `pattern`: classifies a target pattern into a [`PatternKind`]
//! - `strategies`: one generic rewrite per pattern kind
//! - `handlers`: per-function rewrites that supersede the generic ones
//! - `router`: tries handlers first, then the generic strategy
//!
//! Data flows one way: tokenizer → precedence → strategies/handlers → router.

use std::borrow::Cow;

use serde::Serialize;

pub mod handlers;
pub mod pattern;
pub mod precedence;
pub mod router;
pub mod strategies;
pub mod tokenizer;

pub use handlers::SpecializedHandler;
pub use pattern::PatternKind;
pub use router::{create_autofix_routing, create_specialized_fix};

use precedence::{is_atomic_expression, needs_parentheses};
use tokenizer::{find_closing_parenthesis, is_array_like_object, split_top_level};

/// A single located call expression.
///
/// `params` is the literal text between the call's matched parentheses and
/// `full_text` the enclosing source. Offsets are byte offsets into
/// `full_text`, with `call_start < call_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallInfo<'a> {
    pub call_start: usize,
    pub call_end: usize,
    pub params: &'a str,
    pub full_text: &'a str,
}

impl<'a> CallInfo<'a> {
    pub fn new(call_start: usize, call_end: usize, params: &'a str, full_text: &'a str) -> Self {
        Self {
            call_start,
            call_end,
            params,
            full_text,
        }
    }

    /// Locate the call in a standalone expression such as `_.pick(obj, keys)`.
    ///
    /// Returns the callee's final name segment (`pick`) with the call. Trailing
    /// text other than whitespace or `;` after the closing parenthesis is
    /// rejected, as is any callee that is not a plain dotted identifier.
    pub fn from_call_text(text: &'a str) -> Option<(&'a str, Self)> {
        let callee_start = text.len() - text.trim_start().len();
        let (name_start, callee_end) = scan_dotted_path(text, callee_start)?;
        let rest = &text[callee_end..];
        let open = callee_end + (rest.len() - rest.trim_start().len());
        if text.as_bytes().get(open) != Some(&b'(') {
            return None;
        }
        let name = &text[name_start..callee_end];

        let close = find_closing_parenthesis(text, open)?;
        if !text[close + 1..].trim().trim_end_matches(';').trim().is_empty() {
            return None;
        }

        let call = Self::new(callee_start, close + 1, &text[open + 1..close], text);
        Some((name, call))
    }

    /// Arguments split on top-level commas, trimmed.
    pub fn args(&self) -> Vec<&'a str> {
        split_top_level(self.params)
    }

    /// Original source text of the whole call.
    pub fn call_text(&self) -> &'a str {
        self.full_text
            .get(self.call_start..self.call_end)
            .unwrap_or_default()
    }

    /// A fix replacing the whole call with `text`.
    pub fn fix(&self, text: impl Into<String>) -> Fix {
        Fix {
            range: (self.call_start, self.call_end),
            text: text.into(),
        }
    }
}

/// Replace `full_text[range.0..range.1]` with `text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Fix {
    pub range: (usize, usize),
    pub text: String,
}

impl Fix {
    pub fn start(&self) -> usize {
        self.range.0
    }

    pub fn end(&self) -> usize {
        self.range.1
    }

    pub fn overlaps(&self, other: &Fix) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }
}

/// Text for `arg` as the receiver of `.method(...)`.
///
/// Array-like receivers are converted with `Array.from`, low-precedence
/// expressions are parenthesized.
pub(crate) fn receiver(arg: &str) -> Cow<'_, str> {
    if is_array_like_object(arg) {
        Cow::Owned(format!("Array.from({arg})"))
    } else {
        parenthesize_if(arg, needs_parentheses(arg))
    }
}

/// Text for `arg` as an operand of an infix operator, member base or callee.
pub(crate) fn operand(arg: &str) -> Cow<'_, str> {
    parenthesize_if(arg, !is_atomic_expression(arg))
}

pub(crate) fn parenthesize_if(arg: &str, wrap: bool) -> Cow<'_, str> {
    if wrap {
        Cow::Owned(format!("({arg})"))
    } else {
        Cow::Borrowed(arg)
    }
}

/// Whether `arg` is a single- or double-quoted string literal.
pub(crate) fn is_quoted_string(arg: &str) -> bool {
    let bytes = arg.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&first), Some(&last)) if bytes.len() >= 2 && first == last => {
            (first == b'"' || first == b'\'')
                && !arg[1..arg.len() - 1].contains([first as char, '\\'])
        }
        _ => false,
    }
}

/// Convert a quoted property path into an arrow function.
///
/// `"id"` becomes `item => item.id`, `"a.b"` becomes `item => item.a.b`, and a
/// segment that is not an identifier uses bracket access.
pub(crate) fn property_iteratee(arg: &str) -> Option<String> {
    if !is_quoted_string(arg) {
        return None;
    }
    let path = &arg[1..arg.len() - 1];
    if path.is_empty() {
        return None;
    }

    let mut access = String::from("item");
    for segment in path.split('.') {
        if is_identifier(segment) {
            access.push('.');
            access.push_str(segment);
        } else {
            access.push_str(&format!("[\"{segment}\"]"));
        }
    }
    Some(format!("item => {access}"))
}

/// First candidate name that no argument mentions as a free identifier, so a
/// generated closure parameter never captures a variable from the call site.
pub(crate) fn fresh_name(args: &[&str], candidates: &[&'static str]) -> Option<&'static str> {
    candidates
        .iter()
        .copied()
        .find(|name| !args.iter().any(|arg| mentions(arg, name)))
}

/// Text that can be evaluated more than once without side effects: a
/// reference, member chain or literal.
pub(crate) fn is_repeatable(arg: &str) -> bool {
    if let Some(number) = arg.strip_prefix('-') {
        return is_numeric_literal(number);
    }
    !arg.is_empty()
        && arg.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(b, b'_' | b'$' | b'.' | b'?' | b'[' | b']' | b'\'' | b'"')
        })
}

pub(crate) fn is_numeric_literal(arg: &str) -> bool {
    arg.bytes().any(|b| b.is_ascii_digit())
        && arg.bytes().all(|b| b.is_ascii_digit() || b == b'.' || b == b'_')
}

/// Whether `text` uses `name` as an identifier. Property names (`x.name`)
/// do not count, spreads (`...name`) do.
pub(crate) fn mentions(text: &str, name: &str) -> bool {
    let bytes = text.as_bytes();
    let is_ident_byte = |b: u8| b.is_ascii_alphanumeric() || b == b'_' || b == b'$';

    text.match_indices(name).any(|(start, _)| {
        let end = start + name.len();
        let prev = start.checked_sub(1).map(|i| bytes[i]);
        let property = prev == Some(b'.') && !text[..start].ends_with("...");
        !property
            && !prev.is_some_and(is_ident_byte)
            && !bytes.get(end).copied().is_some_and(is_ident_byte)
    })
}

/// Start of the last segment and end of the dotted identifier path at
/// `start`, e.g. `map` and the end of `_.map` in `_.map(xs)`.
fn scan_dotted_path(text: &str, start: usize) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let is_start = |b: u8| b.is_ascii_alphabetic() || b == b'_' || b == b'$';
    let is_part = |b: u8| b.is_ascii_alphanumeric() || b == b'_' || b == b'$';

    let mut pos = start;
    loop {
        let segment = pos;
        if !bytes.get(pos).copied().is_some_and(is_start) {
            return None;
        }
        pos += 1;
        while bytes.get(pos).copied().is_some_and(is_part) {
            pos += 1;
        }
        if bytes.get(pos) == Some(&b'.') {
            pos += 1;
        } else {
            return Some((segment, pos));
        }
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
