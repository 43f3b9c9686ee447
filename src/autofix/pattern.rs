//! Classification of target-pattern descriptors.
//!
//! A target pattern is an opaque string naming the native replacement shape,
//! e.g. `Array.prototype.map`, `Object.keys`, `Number` or `value === null`.
//! Its rewrite strategy is derived from the shape of the string alone.

use std::sync::LazyLock;

use regex::Regex;

use super::tokenizer::PROTOTYPE_REGEX;

/// Natives that take no arguments. Calls routed to them drop the original
/// arguments.
pub const ZERO_PARAM_STATIC_METHODS: &[&str] = &[
    "Date.now",
    "Math.random",
    "performance.now",
    "crypto.randomUUID",
];

/// Source functions whose native counterpart is a conversion constructor
/// such as `Number(value)` or `String(value)`.
pub const VALUE_CONVERSION_FUNCTIONS: &[&str] = &["toNumber", "toString", "toFinite"];

/// `Object.method` shape, any receiver casing.
static MEMBER_ACCESS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]{0,50}\.[A-Za-z_$][A-Za-z0-9_$]{0,50}$")
        .expect("member access regex is valid")
});

/// `Type.method` with a capitalized type.
static STATIC_METHOD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][A-Za-z0-9_$]{0,50})\.([A-Za-z_$][A-Za-z0-9_$]{0,50})$")
        .expect("static method regex is valid")
});

static CONSTRUCTOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]{0,50}$").expect("constructor regex is valid"));

/// Structural kind of a target pattern.
///
/// Built by [`PatternKind::classify`], which checks the kinds in a fixed
/// priority order so exactly one applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternKind<'a> {
    /// `Date.now`: a native from [`ZERO_PARAM_STATIC_METHODS`].
    ZeroParamStatic { path: &'a str },
    /// `Object.keys`, `Math.max`: capitalized type, arbitrary arity.
    Static { type_name: &'a str, method: &'a str },
    /// `Number`, `String`: conversion of the first argument.
    Constructor { name: &'a str },
    /// `Array.prototype.map`, optionally with `[fixed, params]`.
    Prototype {
        method: &'a str,
        fixed_params: Option<&'a str>,
    },
    /// Anything else: a template such as `value === null` or `a + b`.
    Expression { template: &'a str },
}

impl<'a> PatternKind<'a> {
    pub fn classify(pattern: &'a str, original_name: &str) -> Self {
        if is_zero_param_static_method(pattern) {
            return Self::ZeroParamStatic { path: pattern };
        }
        if let Some(caps) = STATIC_METHOD_REGEX.captures(pattern)
            && let (Some(type_name), Some(method)) = (caps.get(1), caps.get(2))
            && type_name.as_str() != "prototype"
            && method.as_str() != "prototype"
        {
            return Self::Static {
                type_name: type_name.as_str(),
                method: method.as_str(),
            };
        }
        if is_constructor_call(pattern, original_name) {
            return Self::Constructor { name: pattern };
        }
        if let Some(caps) = PROTOTYPE_REGEX.captures(pattern)
            && let Some(method) = caps.get(2)
        {
            return Self::Prototype {
                method: method.as_str(),
                fixed_params: caps.get(3).map(|m| m.as_str()),
            };
        }
        Self::Expression { template: pattern }
    }

    /// Short label used in listings and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ZeroParamStatic { .. } => "zero-param static",
            Self::Static { .. } => "static",
            Self::Constructor { .. } => "constructor",
            Self::Prototype {
                fixed_params: Some(_),
                ..
            } => "prototype (fixed params)",
            Self::Prototype { .. } => "prototype",
            Self::Expression { .. } => "expression",
        }
    }
}

pub fn is_zero_param_static_method(pattern: &str) -> bool {
    MEMBER_ACCESS_REGEX.is_match(pattern) && ZERO_PARAM_STATIC_METHODS.contains(&pattern)
}

pub fn is_static_method(pattern: &str) -> bool {
    STATIC_METHOD_REGEX.is_match(pattern) && !pattern.contains("prototype")
}

pub fn is_constructor_call(pattern: &str, original_name: &str) -> bool {
    CONSTRUCTOR_REGEX.is_match(pattern) && VALUE_CONVERSION_FUNCTIONS.contains(&original_name)
}

pub fn is_prototype_method(pattern: &str) -> bool {
    PROTOTYPE_REGEX.is_match(pattern)
}

pub fn is_fixed_param_prototype_method(pattern: &str) -> bool {
    PROTOTYPE_REGEX
        .captures(pattern)
        .is_some_and(|caps| caps.get(3).is_some())
}

/// Fallback: the pattern has none of the structured shapes.
pub fn is_expression_alternative(pattern: &str, original_name: &str) -> bool {
    matches!(
        PatternKind::classify(pattern, original_name),
        PatternKind::Expression { .. }
    )
}
