//! Per-function rewrites that supersede the generic strategies.
//!
//! These cover functions whose native form restructures the call rather than
//! substituting arguments into a pattern, e.g. `pick(obj, keys)` becoming an
//! `Object.fromEntries` pipeline. A handler returning `None` is not an error:
//! the router falls through to the pattern-based strategy.

use super::precedence::needs_parentheses;
use super::tokenizer::CodeScanner;
use super::{
    CallInfo, Fix, fresh_name, is_numeric_literal, is_quoted_string, is_repeatable, mentions,
    operand, parenthesize_if, property_iteratee, receiver,
};

/// Closure parameter names for per-element callbacks.
const ITEM_NAMES: &[&str] = &["item", "element", "entry"];
/// Closure parameter names for generated indices.
const INDEX_NAMES: &[&str] = &["i", "index", "idx"];
/// Closure parameter names for object keys.
const KEY_NAMES: &[&str] = &["k", "key", "prop"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceKind {
    Drop,
    DropRight,
    Take,
    TakeRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOp {
    fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }
}

/// Value returned by a stub function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Array,
    Object,
    String,
    True,
    False,
    Undefined,
}

impl Constant {
    fn literal(self) -> &'static str {
        match self {
            Self::Array => "[]",
            Self::Object => "{}",
            Self::String => "''",
            Self::True => "true",
            Self::False => "false",
            Self::Undefined => "undefined",
        }
    }
}

/// A function with a bespoke rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecializedHandler {
    Pick,
    Omit,
    Merge,
    GroupBy,
    CountBy,
    KeyBy,
    /// `orderBy` and `sortBy`.
    OrderBy,
    Clone,
    CloneDeep,
    Chunk,
    Slice(SliceKind),
    Arithmetic(ArithmeticOp),
    Clamp,
    InRange,
    Random,
    Times,
    Range { reversed: bool },
    Stub(Constant),
    Identity,
    Delay,
    Defer,
}

impl SpecializedHandler {
    /// Handler registered for the source function `name`, if any.
    pub fn for_function(name: &str) -> Option<Self> {
        let handler = match name {
            "pick" => Self::Pick,
            "omit" => Self::Omit,
            "merge" => Self::Merge,
            "groupBy" => Self::GroupBy,
            "countBy" => Self::CountBy,
            "keyBy" => Self::KeyBy,
            "orderBy" | "sortBy" => Self::OrderBy,
            "clone" => Self::Clone,
            "cloneDeep" => Self::CloneDeep,
            "chunk" => Self::Chunk,
            "drop" => Self::Slice(SliceKind::Drop),
            "dropRight" => Self::Slice(SliceKind::DropRight),
            "take" => Self::Slice(SliceKind::Take),
            "takeRight" => Self::Slice(SliceKind::TakeRight),
            "add" => Self::Arithmetic(ArithmeticOp::Add),
            "subtract" => Self::Arithmetic(ArithmeticOp::Subtract),
            "multiply" => Self::Arithmetic(ArithmeticOp::Multiply),
            "divide" => Self::Arithmetic(ArithmeticOp::Divide),
            "clamp" => Self::Clamp,
            "inRange" => Self::InRange,
            "random" => Self::Random,
            "times" => Self::Times,
            "range" => Self::Range { reversed: false },
            "rangeRight" => Self::Range { reversed: true },
            "stubArray" => Self::Stub(Constant::Array),
            "stubObject" => Self::Stub(Constant::Object),
            "stubString" => Self::Stub(Constant::String),
            "stubTrue" => Self::Stub(Constant::True),
            "stubFalse" => Self::Stub(Constant::False),
            "noop" => Self::Stub(Constant::Undefined),
            "identity" => Self::Identity,
            "delay" => Self::Delay,
            "defer" => Self::Defer,
            _ => return None,
        };
        Some(handler)
    }

    /// Rewrite `call`, or `None` when its arity or shape does not fit.
    pub fn apply(&self, call: &CallInfo) -> Option<Fix> {
        let args = call.args();
        let text = match *self {
            Self::Pick => pick(&args)?,
            Self::Omit => omit(&args)?,
            Self::Merge => merge(&args)?,
            Self::GroupBy => group_by(&args)?,
            Self::CountBy => count_by(&args)?,
            Self::KeyBy => key_by(&args)?,
            Self::OrderBy => order_by(&args)?,
            Self::Clone => clone(&args)?,
            Self::CloneDeep => {
                let [value] = args[..] else {
                    return None;
                };
                format!("structuredClone({})", parenthesize_if(value, needs_parentheses(value)))
            }
            Self::Chunk => chunk(&args)?,
            Self::Slice(kind) => slice(&args, kind)?,
            Self::Arithmetic(op) => {
                let [a, b] = args[..] else {
                    return None;
                };
                format!("{} {} {}", operand(a), op.symbol(), operand(b))
            }
            Self::Clamp => {
                let [number, lower, upper] = args[..] else {
                    return None;
                };
                format!("Math.min(Math.max({number}, {lower}), {upper})")
            }
            Self::InRange => in_range(&args)?,
            Self::Random => random(&args)?,
            Self::Times => times(&args)?,
            Self::Range { reversed } => range(&args, reversed)?,
            Self::Stub(constant) => constant.literal().to_owned(),
            Self::Identity => {
                let [value] = args[..] else {
                    return None;
                };
                value.to_owned()
            }
            Self::Delay => {
                if args.len() < 2 {
                    return None;
                }
                format!("setTimeout({})", args.join(", "))
            }
            Self::Defer => {
                let (func, rest) = args.split_first()?;
                let mut forwarded = vec![*func, "0"];
                forwarded.extend_from_slice(rest);
                format!("setTimeout({})", forwarded.join(", "))
            }
        };
        Some(call.fix(text))
    }
}

/// Keys argument as an array expression: a single quoted key is wrapped.
fn key_list(keys: &str) -> String {
    if is_quoted_string(keys) {
        format!("[{keys}]")
    } else {
        receiver(keys).into_owned()
    }
}

/// Iteratee argument as a callable: property shorthands become arrows.
///
/// Object and array shorthands (`{ active: true }`, `["a", 1]`) have no
/// callable equivalent here.
fn iteratee(arg: &str) -> Option<String> {
    if arg.starts_with(['{', '[']) {
        return None;
    }
    Some(property_iteratee(arg).unwrap_or_else(|| arg.to_owned()))
}

fn pick(args: &[&str]) -> Option<String> {
    let [object, keys] = *args else {
        return None;
    };
    let key = fresh_name(&[object], KEY_NAMES)?;
    Some(format!(
        "Object.fromEntries({}.map({key} => [{key}, {}[{key}]]))",
        key_list(keys),
        operand(object)
    ))
}

fn omit(args: &[&str]) -> Option<String> {
    let [object, keys] = *args else {
        return None;
    };
    let key = fresh_name(&[keys], KEY_NAMES)?;
    Some(format!(
        "Object.fromEntries(Object.entries({object}).filter(([{key}]) => !{}.includes({key})))",
        key_list(keys)
    ))
}

fn merge(args: &[&str]) -> Option<String> {
    if args.is_empty() {
        return None;
    }
    Some(format!("Object.assign({{}}, {})", args.join(", ")))
}

/// Collection and iteratee for the grouping family, declining when the
/// iteratee refers to any of the template's own `locals`.
fn grouping_args<'a>(args: &[&'a str], locals: &[&str]) -> Option<(&'a str, String, &'static str)> {
    let [collection, func] = *args else {
        return None;
    };
    if !is_quoted_string(func) && locals.iter().any(|local| mentions(func, local)) {
        return None;
    }
    let item = fresh_name(&[func], ITEM_NAMES)?;
    Some((collection, iteratee(func)?, item))
}

fn group_by(args: &[&str]) -> Option<String> {
    let (collection, func, item) = grouping_args(args, &["groups", "key"])?;
    Some(format!(
        "{}.reduce((groups, {item}) => {{ const key = ({func})({item}); (groups[key] ||= []).push({item}); return groups; }}, {{}})",
        receiver(collection)
    ))
}

fn count_by(args: &[&str]) -> Option<String> {
    let (collection, func, item) = grouping_args(args, &["counts", "key"])?;
    Some(format!(
        "{}.reduce((counts, {item}) => {{ const key = ({func})({item}); counts[key] = (counts[key] || 0) + 1; return counts; }}, {{}})",
        receiver(collection)
    ))
}

fn key_by(args: &[&str]) -> Option<String> {
    let (collection, func, item) = grouping_args(args, &[])?;
    Some(format!(
        "Object.fromEntries({}.map({item} => [({func})({item}), {item}]))",
        receiver(collection)
    ))
}

fn order_by(args: &[&str]) -> Option<String> {
    // Multiple sort keys (an array iteratee) have no single-comparator form.
    let (collection, func, _) = grouping_args(args, &["left", "right", "l", "r"])?;
    Some(format!(
        "[...{collection}].sort((left, right) => {{ const l = ({func})(left), r = ({func})(right); return l < r ? -1 : l > r ? 1 : 0; }})"
    ))
}

fn clone(args: &[&str]) -> Option<String> {
    let [value] = *args else {
        return None;
    };
    let spread = parenthesize_if(value, needs_parentheses(value));
    if is_array_literal(value) {
        Some(format!("[...{spread}]"))
    } else {
        Some(format!("{{...{spread}}}"))
    }
}

/// Whether `text` is a single array literal: `[a, b]` but not `[a, b][i]`.
fn is_array_literal(text: &str) -> bool {
    text.starts_with('[')
        && CodeScanner::new(text)
            .skip(1)
            .find(|code| code.byte == b']' && code.depth.bracket == 0)
            .is_some_and(|code| code.index + 1 == text.len())
}

fn chunk(args: &[&str]) -> Option<String> {
    let [array, size] = *args else {
        return None;
    };
    if !is_repeatable(array) || !is_repeatable(size) {
        return None;
    }
    let i = fresh_name(args, INDEX_NAMES)?;
    Some(format!(
        "Array.from({{ length: Math.ceil({array}.length / {size}) }}, (_, {i}) => {array}.slice({i} * {size}, {i} * {size} + {size}))"
    ))
}

fn slice(args: &[&str], kind: SliceKind) -> Option<String> {
    let [array, n] = *args else {
        return None;
    };
    // `-0` is `0`, which selects the opposite end of the array.
    if n == "0" && matches!(kind, SliceKind::DropRight | SliceKind::TakeRight) {
        return None;
    }
    // A negative count counts as zero, `slice` would count from the end.
    if n.starts_with('-') {
        return None;
    }
    let array = receiver(array);
    let text = match kind {
        SliceKind::Drop => format!("{array}.slice({n})"),
        SliceKind::DropRight => format!("{array}.slice(0, -{})", operand(n)),
        SliceKind::Take => format!("{array}.slice(0, {n})"),
        SliceKind::TakeRight => format!("{array}.slice(-{})", operand(n)),
    };
    Some(text)
}

fn in_range(args: &[&str]) -> Option<String> {
    let [number, start, end] = *args else {
        return None;
    };
    if !args.iter().all(|arg| is_repeatable(arg)) {
        return None;
    }
    Some(format!(
        "{number} >= Math.min({start}, {end}) && {number} < Math.max({start}, {end})"
    ))
}

fn random(args: &[&str]) -> Option<String> {
    // Decimal bounds and the `floating` flag produce floats.
    let floating = |arg: &str| {
        (is_numeric_literal(arg.trim_start_matches('-')) && arg.contains('.'))
            || arg == "true"
            || arg == "false"
    };
    if args.iter().any(|arg| floating(arg)) {
        return None;
    }
    match *args {
        [] => Some("Math.round(Math.random())".to_owned()),
        [upper] => Some(format!("Math.floor(Math.random() * ({} + 1))", operand(upper))),
        [lower, upper] if is_repeatable(lower) => Some(format!(
            "Math.floor(Math.random() * ({} - {} + 1)) + {}",
            operand(upper),
            operand(lower),
            operand(lower)
        )),
        _ => None,
    }
}

fn times(args: &[&str]) -> Option<String> {
    let i = fresh_name(args, INDEX_NAMES)?;
    match *args {
        [n] => Some(format!("Array.from({{ length: {n} }}, (_, {i}) => {i})")),
        [n, func] => Some(format!(
            "Array.from({{ length: {n} }}, (_, {i}) => {}({i}))",
            operand(func)
        )),
        _ => None,
    }
}

fn range(args: &[&str], reversed: bool) -> Option<String> {
    let i = fresh_name(args, INDEX_NAMES)?;
    match (args, reversed) {
        ([end], false) => Some(format!("Array.from({{ length: {end} }}, (_, {i}) => {i})")),
        ([end], true) if is_repeatable(end) => Some(format!(
            "Array.from({{ length: {end} }}, (_, {i}) => {} - 1 - {i})",
            operand(end)
        )),
        ([start, end], false) if is_repeatable(start) => Some(format!(
            "Array.from({{ length: {} - {} }}, (_, {i}) => {} + {i})",
            operand(end),
            operand(start),
            operand(start)
        )),
        ([start, end], true) if is_repeatable(end) => Some(format!(
            "Array.from({{ length: {} - {} }}, (_, {i}) => {} - 1 - {i})",
            operand(end),
            operand(start),
            operand(end)
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    use super::*;

    fn rewrite(name: &str, params: &str) -> Option<String> {
        let call = CallInfo::new(0, params.len() + 2, params, params);
        SpecializedHandler::for_function(name)?.apply(&call).map(|fix| fix.text)
    }

    #[test]
    fn test_for_function() {
        assert_eq!(SpecializedHandler::for_function("pick"), Some(SpecializedHandler::Pick));
        assert_eq!(SpecializedHandler::for_function("sortBy"), Some(SpecializedHandler::OrderBy));
        assert_eq!(
            SpecializedHandler::for_function("noop"),
            Some(SpecializedHandler::Stub(Constant::Undefined))
        );
        assert_eq!(SpecializedHandler::for_function("map"), None);
    }

    #[test]
    fn test_pick() {
        assert_eq!(
            rewrite("pick", r#"obj, ["name","age"]"#).unwrap(),
            r#"Object.fromEntries(["name","age"].map(k => [k, obj[k]]))"#
        );
        assert_eq!(
            rewrite("pick", "obj, 'a'").unwrap(),
            "Object.fromEntries(['a'].map(k => [k, obj[k]]))"
        );
        assert_eq!(
            rewrite("pick", "k, keys").unwrap(),
            "Object.fromEntries(keys.map(key => [key, k[key]]))"
        );
        assert!(rewrite("pick", "obj").is_none());
    }

    #[test]
    fn test_omit() {
        assert_snapshot!(
            rewrite("omit", "user, ['password']").unwrap(),
            @"Object.fromEntries(Object.entries(user).filter(([k]) => !['password'].includes(k)))"
        );
    }

    #[test]
    fn test_merge_preserves_sources() {
        assert_eq!(rewrite("merge", "a, b").unwrap(), "Object.assign({}, a, b)");
        assert_eq!(rewrite("merge", "a, b, c").unwrap(), "Object.assign({}, a, b, c)");
        assert!(rewrite("merge", "").is_none());
    }

    #[test]
    fn test_key_by() {
        assert_eq!(
            rewrite("keyBy", r#"users, "id""#).unwrap(),
            "Object.fromEntries(users.map(item => [(item => item.id)(item), item]))"
        );
        assert_eq!(
            rewrite("keyBy", "users, item").unwrap(),
            "Object.fromEntries(users.map(element => [(item)(element), element]))"
        );
    }

    #[test]
    fn test_group_by() {
        assert_snapshot!(
            rewrite("groupBy", "users, 'role'").unwrap(),
            @"users.reduce((groups, item) => { const key = (item => item.role)(item); (groups[key] ||= []).push(item); return groups; }, {})"
        );
        // The iteratee would be shadowed by the accumulator.
        assert!(rewrite("groupBy", "users, groups").is_none());
    }

    #[test]
    fn test_count_by() {
        assert_snapshot!(
            rewrite("countBy", "words, w => w.length").unwrap(),
            @"words.reduce((counts, item) => { const key = (w => w.length)(item); counts[key] = (counts[key] || 0) + 1; return counts; }, {})"
        );
    }

    #[test]
    fn test_grouping_requires_two_arguments() {
        assert!(rewrite("groupBy", "users").is_none());
        assert!(rewrite("keyBy", "users, 'id', extra").is_none());
    }

    #[test]
    fn test_object_shorthand_iteratee_declines() {
        assert!(rewrite("groupBy", "users, { active: true }").is_none());
        assert!(rewrite("countBy", "users, ['active', true]").is_none());
    }

    #[test]
    fn test_order_by() {
        assert_snapshot!(
            rewrite("sortBy", "users, 'age'").unwrap(),
            @"[...users].sort((left, right) => { const l = (item => item.age)(left), r = (item => item.age)(right); return l < r ? -1 : l > r ? 1 : 0; })"
        );
        assert!(rewrite("orderBy", "users, ['age', 'name']").is_none());
        assert!(rewrite("orderBy", "users, 'age', 'desc'").is_none());
    }

    #[test]
    fn test_clone() {
        assert_eq!(rewrite("clone", "obj").unwrap(), "{...obj}");
        assert_eq!(rewrite("clone", "[1, 2]").unwrap(), "[...[1, 2]]");
        assert_eq!(rewrite("clone", "a || b").unwrap(), "{...(a || b)}");
        assert_eq!(rewrite("cloneDeep", "state").unwrap(), "structuredClone(state)");
        assert!(rewrite("clone", "").is_none());
    }

    #[test]
    fn test_clone_of_indexed_array_literal() {
        assert_eq!(rewrite("clone", "[a, b][i]").unwrap(), "{...[a, b][i]}");
        assert_eq!(rewrite("clone", "[[1], [2]]").unwrap(), "[...[[1], [2]]]");
        assert_eq!(rewrite("clone", "['[', x]").unwrap(), "[...['[', x]]");
        assert!(is_array_literal("[]"));
        assert!(!is_array_literal("[a][0]"));
        assert!(!is_array_literal("list[0]"));
    }

    #[test]
    fn test_chunk() {
        assert_snapshot!(
            rewrite("chunk", "items, 2").unwrap(),
            @"Array.from({ length: Math.ceil(items.length / 2) }, (_, i) => items.slice(i * 2, i * 2 + 2))"
        );
        assert!(rewrite("chunk", "getItems(), 2").is_none());
    }

    #[test]
    fn test_slice_family() {
        assert_eq!(rewrite("drop", "arr, 2").unwrap(), "arr.slice(2)");
        assert_eq!(rewrite("dropRight", "arr, 2").unwrap(), "arr.slice(0, -2)");
        assert_eq!(rewrite("take", "arr, n").unwrap(), "arr.slice(0, n)");
        assert_eq!(rewrite("takeRight", "arr, a + b").unwrap(), "arr.slice(-(a + b))");
        assert!(rewrite("drop", "arr").is_none());
        assert!(rewrite("takeRight", "arr, 0").is_none());
    }

    #[test]
    fn test_slice_family_declines_negative_counts() {
        assert!(rewrite("drop", "arr, -1").is_none());
        assert!(rewrite("dropRight", "arr, -2").is_none());
        assert!(rewrite("take", "arr, -1").is_none());
        assert!(rewrite("takeRight", "arr, -n").is_none());
        assert_eq!(rewrite("drop", "arr, n - 1").unwrap(), "arr.slice(n - 1)");
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(rewrite("add", "1, 2").unwrap(), "1 + 2");
        assert_eq!(rewrite("subtract", "a, b - c").unwrap(), "a - (b - c)");
        assert_eq!(rewrite("divide", "total, -1").unwrap(), "total / (-1)");
        assert!(rewrite("multiply", "a").is_none());
        assert!(rewrite("add", "a, b, c").is_none());
    }

    #[test]
    fn test_clamp_and_in_range() {
        assert_eq!(rewrite("clamp", "15, 0, 10").unwrap(), "Math.min(Math.max(15, 0), 10)");
        assert!(rewrite("clamp", "15, 10").is_none());
        assert_eq!(
            rewrite("inRange", "n, 0, 10").unwrap(),
            "n >= Math.min(0, 10) && n < Math.max(0, 10)"
        );
        assert!(rewrite("inRange", "next(), 0, 10").is_none());
    }

    #[test]
    fn test_random() {
        assert_eq!(rewrite("random", "10").unwrap(), "Math.floor(Math.random() * (10 + 1))");
        assert_eq!(
            rewrite("random", "1, 6").unwrap(),
            "Math.floor(Math.random() * (6 - 1 + 1)) + 1"
        );
        assert!(rewrite("random", "1.5, 2").is_none());
        assert!(rewrite("random", "0, 1, true").is_none());
        assert_eq!(rewrite("random", "").unwrap(), "Math.round(Math.random())");
    }

    #[test]
    fn test_times_and_range() {
        assert_eq!(rewrite("times", "3").unwrap(), "Array.from({ length: 3 }, (_, i) => i)");
        assert_eq!(
            rewrite("times", "3, makeRow").unwrap(),
            "Array.from({ length: 3 }, (_, i) => makeRow(i))"
        );
        assert_eq!(
            rewrite("times", "n, i => i * 2").unwrap(),
            "Array.from({ length: n }, (_, index) => (i => i * 2)(index))"
        );
        assert_eq!(rewrite("range", "5").unwrap(), "Array.from({ length: 5 }, (_, i) => i)");
        assert_eq!(
            rewrite("range", "1, 5").unwrap(),
            "Array.from({ length: 5 - 1 }, (_, i) => 1 + i)"
        );
        assert_eq!(
            rewrite("rangeRight", "5").unwrap(),
            "Array.from({ length: 5 }, (_, i) => 5 - 1 - i)"
        );
        assert!(rewrite("range", "0, 10, 2").is_none());
    }

    #[test]
    fn test_stubs_ignore_arguments() {
        assert_eq!(rewrite("stubArray", "").unwrap(), "[]");
        assert_eq!(rewrite("stubTrue", "ignored").unwrap(), "true");
        assert_eq!(rewrite("noop", "a, b").unwrap(), "undefined");
    }

    #[test]
    fn test_identity() {
        assert_eq!(rewrite("identity", "value").unwrap(), "value");
        assert!(rewrite("identity", "a, b").is_none());
    }

    #[test]
    fn test_delay_and_defer() {
        assert_eq!(rewrite("delay", "fn, 100").unwrap(), "setTimeout(fn, 100)");
        assert_eq!(
            rewrite("delay", "log, 100, 'done'").unwrap(),
            "setTimeout(log, 100, 'done')"
        );
        assert!(rewrite("delay", "fn").is_none());
        assert_eq!(rewrite("defer", "fn").unwrap(), "setTimeout(fn, 0)");
        assert_eq!(rewrite("defer", "log, 'x'").unwrap(), "setTimeout(log, 0, 'x')");
    }
}
