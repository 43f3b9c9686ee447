//! Generic rewrite strategies, one per [`PatternKind`](super::PatternKind).
//!
//! Each strategy takes the located call and the pieces of the classified
//! pattern and returns a fix replacing the whole call, or `None` when the
//! call's shape does not fit.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::precedence::needs_parentheses;
use super::tokenizer::{CodeScanner, find_first_top_level_comma};
use super::{
    CallInfo, Fix, fresh_name, is_repeatable, mentions, operand, parenthesize_if,
    property_iteratee, receiver,
};

/// Natives that take their operands as separate arguments, so a single
/// array argument must be spread.
const SPREAD_VARIADIC_METHODS: &[&str] = &["Math.max", "Math.min"];

/// Identifiers in an expression template that stand for call arguments.
const PLACEHOLDERS: &[&str] = &[
    "value",
    "a",
    "b",
    "array",
    "object",
    "string",
    "number",
    "lower",
    "upper",
    "collection",
    "func",
    "other",
    "n",
];

static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z_$][A-Za-z0-9_$]{0,50}").expect("identifier regex is valid")
});

/// `Date.now()`: original arguments are discarded.
pub fn create_zero_param_static_fix(call: &CallInfo, path: &str) -> Option<Fix> {
    Some(call.fix(format!("{path}()")))
}

/// `Type.method(args)`, spreading a single argument into `Math.max`/`Math.min`.
pub fn create_static_method_fix(call: &CallInfo, type_name: &str, method: &str) -> Option<Fix> {
    let path = format!("{type_name}.{method}");
    let args = call.params.trim();

    let spread = SPREAD_VARIADIC_METHODS.contains(&path.as_str())
        && !args.is_empty()
        && !args.starts_with("...")
        && find_first_top_level_comma(args).is_none();

    let text = if spread {
        format!("{path}(...{args})")
    } else {
        format!("{path}({args})")
    };
    Some(call.fix(text))
}

/// `Number(args)`. A conversion without arguments has no native form.
pub fn create_constructor_fix(call: &CallInfo, name: &str) -> Option<Fix> {
    let args = call.params.trim();
    if args.is_empty() {
        return None;
    }
    Some(call.fix(format!("{name}({args})")))
}

/// Split `params` into the receiver and the remaining argument text.
fn split_receiver(params: &str) -> Option<(&str, &str)> {
    let (head, rest) = match find_first_top_level_comma(params) {
        Some(index) => (&params[..index], &params[index + 1..]),
        None => (params, ""),
    };
    let head = head.trim();
    (!head.is_empty()).then(|| (head, rest.trim()))
}

/// `receiver.method(rest)` from `fn(receiver, rest)`.
///
/// With `invert_predicate` (the reject family) the predicate is negated:
/// `receiver.method(item => !pred(item))`. Function literals and
/// low-precedence predicates are parenthesized, named references are not.
pub fn create_prototype_method_fix(
    call: &CallInfo,
    method: &str,
    invert_predicate: bool,
) -> Option<Fix> {
    let (head, rest) = split_receiver(call.params)?;
    let target = receiver(head);

    if !invert_predicate {
        return Some(call.fix(format!("{target}.{method}({rest})")));
    }

    if rest.is_empty() || find_first_top_level_comma(rest).is_some() {
        return None;
    }
    let param = fresh_name(&[rest], &["item", "element", "entry"])?;
    let predicate = property_iteratee(rest).unwrap_or_else(|| rest.to_owned());
    let wrap = needs_parentheses(&predicate)
        || predicate.starts_with("function")
        || predicate.starts_with("async");
    let predicate = parenthesize_if(&predicate, wrap);

    Some(call.fix(format!(
        "{target}.{method}({param} => !{predicate}({param}))"
    )))
}

/// `receiver.method(p1, p2)` with parameters taken from the pattern's
/// `[p1, p2]` suffix instead of the call. Declines when the call passes
/// anything besides the receiver.
pub fn create_fixed_param_prototype_fix(
    call: &CallInfo,
    method: &str,
    fixed_params: &str,
) -> Option<Fix> {
    let (head, rest) = split_receiver(call.params)?;
    if !rest.is_empty() {
        return None;
    }
    let target = receiver(head);
    Some(call.fix(format!("{target}.{method}({})", fixed_params.trim())))
}

/// Substitute call arguments into an expression template.
///
/// Distinct placeholders bind to arguments in order of first appearance.
/// Declines unless the call passes exactly one argument per distinct
/// placeholder, so arguments are never invented or dropped. Also declines
/// when an argument mentions a name the template binds, or when a
/// placeholder used more than once is bound to an argument with side
/// effects.
pub fn create_expression_fix(call: &CallInfo, template: &str) -> Option<Fix> {
    if template.trim().is_empty() {
        return None;
    }
    let args = call.args();
    let is_code = code_mask(template);
    let spans = placeholder_spans(template, &is_code);

    let mut bindings: HashMap<&str, &str> = HashMap::new();
    let mut uses: HashMap<&str, usize> = HashMap::new();
    for (_, name) in &spans {
        if !bindings.contains_key(name) {
            let arg = *args.get(bindings.len())?;
            bindings.insert(*name, arg);
        }
        *uses.entry(*name).or_default() += 1;
    }
    if bindings.len() != args.len() {
        return None;
    }
    if uses
        .iter()
        .any(|(name, count)| *count > 1 && !is_repeatable(bindings[name]))
    {
        return None;
    }
    let bound = template_bindings(template, &is_code);
    if args
        .iter()
        .any(|arg| bound.iter().any(|name| mentions(arg, name)))
    {
        return None;
    }

    let whole_template = spans.len() == 1 && template.trim() == spans[0].1;
    let mut text = String::with_capacity(template.len() + call.params.len());
    let mut last = 0;
    for (start, name) in &spans {
        let arg = bindings[name];
        let end = start + name.len();
        text.push_str(&template[last..*start]);
        if whole_template || is_list_element(template, *start, end) {
            text.push_str(arg);
        } else {
            text.push_str(&operand(arg));
        }
        last = end;
    }
    text.push_str(&template[last..]);

    Some(call.fix(text))
}

/// Whether `template[start..end]` stands alone as an argument, array
/// element or parenthesized expression, where no operator can bind to it.
fn is_list_element(template: &str, start: usize, end: usize) -> bool {
    let before = template[..start].trim_end().bytes().last();
    let after = template[end..].trim_start().bytes().next();
    matches!(before, Some(b'(' | b',' | b'['))
        && matches!(after, Some(b')' | b',' | b']'))
}

/// `true` at every byte of `text` that is code rather than string, template
/// or comment content.
fn code_mask(text: &str) -> Vec<bool> {
    let mut is_code = vec![false; text.len()];
    for code in CodeScanner::new(text) {
        is_code[code.index] = true;
    }
    is_code
}

/// Byte offsets and names of placeholder identifiers in `template`.
///
/// Identifiers inside strings, after a property dot, or that are part of a
/// longer identifier are skipped.
fn placeholder_spans(template: &str, is_code: &[bool]) -> Vec<(usize, &'static str)> {
    let bytes = template.as_bytes();
    let is_ident_byte = |b: u8| b.is_ascii_alphanumeric() || b == b'_' || b == b'$';

    IDENTIFIER_REGEX
        .find_iter(template)
        .filter_map(|m| {
            let start = m.start();
            if !is_code[start] {
                return None;
            }
            let prev = start.checked_sub(1).map(|i| bytes[i]);
            if prev.is_some_and(is_ident_byte) {
                return None;
            }
            // `obj.value` is a property, `...value` a spread.
            if prev == Some(b'.') && (start < 3 || &bytes[start - 3..start] != b"...") {
                return None;
            }
            if bytes.get(m.end()).copied().is_some_and(is_ident_byte) {
                return None;
            }
            PLACEHOLDERS
                .iter()
                .find(|p| **p == m.as_str())
                .map(|p| (start, *p))
        })
        .collect()
}

/// Parameter names of the arrow functions in `template`: `x` in
/// `x => x + 1`, `total` and `x` in `(total, x) => ...`, `k` and `v` in
/// `([k, v]) => ...`.
fn template_bindings<'t>(template: &'t str, is_code: &[bool]) -> Vec<&'t str> {
    let mut names = Vec::new();
    for (arrow, _) in template.match_indices("=>") {
        if !is_code[arrow] {
            continue;
        }
        let head = template[..arrow].trim_end();
        let params = if head.ends_with(')') {
            match opening_parenthesis(head) {
                Some(open) => &head[open..],
                None => continue,
            }
        } else {
            let start = head
                .trim_end_matches(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$')
                .len();
            &head[start..]
        };
        names.extend(IDENTIFIER_REGEX.find_iter(params).map(|m| m.as_str()));
    }
    names
}

/// Index of the `(` matching the `)` that ends `text`.
fn opening_parenthesis(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate().rev() {
        match b {
            b')' => depth += 1,
            b'(' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
