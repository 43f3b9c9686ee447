//! Low-level scanning primitives for raw call-argument text.
//!
//! Everything here works on the raw source substring between a call's
//! parentheses. Nothing parses a full grammar: the scanner only tracks
//! bracket nesting plus string, template-literal and comment regions, which is
//! enough to find top-level commas and matching parentheses.
//!
//! All offsets are byte offsets. Every delimiter the scanner reacts to is
//! ASCII, so a reported offset never points into a multi-byte character.

use std::sync::LazyLock;

use regex::Regex;

/// `Type.prototype.method` with an optional `[fixed, params]` suffix.
/// Groups: type, method, fixed params.
///
/// Atom lengths are capped so matching stays linear on crafted input.
pub(crate) static PROTOTYPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([A-Za-z_$][A-Za-z0-9_$]{0,50})\.prototype\.([A-Za-z_$][A-Za-z0-9_$]{0,50})(?:\[([^\]]{0,200})\])?$",
    )
    .expect("prototype regex is valid")
});

/// Lexical region the scanner is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    SingleQuote,
    DoubleQuote,
    Template,
    LineComment,
    BlockComment,
}

/// Bracket nesting enclosing a code byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Depth {
    pub paren: usize,
    pub bracket: usize,
    pub brace: usize,
    /// Number of `${ }` interpolations the byte sits in.
    pub interpolation: usize,
}

impl Depth {
    pub fn is_top_level(&self) -> bool {
        self.paren == 0 && self.bracket == 0 && self.brace == 0 && self.interpolation == 0
    }
}

/// A byte outside of any string, template text or comment.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CodeByte {
    pub index: usize,
    pub byte: u8,
    /// Nesting around this byte. An opening bracket reports the depth before
    /// it opens, a closing bracket the depth after it closes, so both halves
    /// of a pair report the same depth.
    pub depth: Depth,
}

/// Iterator over the code bytes of `text`, skipping string literals, template
/// text, and comments.
///
/// Quote characters themselves are not yielded. Unbalanced closing brackets
/// saturate at zero instead of underflowing.
pub(crate) struct CodeScanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    mode: Mode,
    depth: Depth,
    /// Brace depth at which each open interpolation started.
    interpolations: Vec<usize>,
}

impl<'a> CodeScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
            mode: Mode::Code,
            depth: Depth::default(),
            interpolations: Vec::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }
}

impl Iterator for CodeScanner<'_> {
    type Item = CodeByte;

    fn next(&mut self) -> Option<CodeByte> {
        while let Some(&byte) = self.bytes.get(self.pos) {
            let index = self.pos;
            self.pos += 1;

            match self.mode {
                Mode::SingleQuote | Mode::DoubleQuote => {
                    let quote = if self.mode == Mode::SingleQuote {
                        b'\''
                    } else {
                        b'"'
                    };
                    if byte == b'\\' {
                        self.pos += 1;
                    } else if byte == quote {
                        self.mode = Mode::Code;
                    }
                }
                Mode::Template => {
                    if byte == b'\\' {
                        self.pos += 1;
                    } else if byte == b'`' {
                        self.mode = Mode::Code;
                    } else if byte == b'$' && self.peek() == Some(b'{') {
                        self.pos += 1;
                        self.interpolations.push(self.depth.brace);
                        self.depth.interpolation += 1;
                        self.mode = Mode::Code;
                    }
                }
                Mode::LineComment => {
                    if byte == b'\n' {
                        self.mode = Mode::Code;
                    }
                }
                Mode::BlockComment => {
                    if byte == b'*' && self.peek() == Some(b'/') {
                        self.pos += 1;
                        self.mode = Mode::Code;
                    }
                }
                Mode::Code => {
                    let before = self.depth;
                    match byte {
                        b'\'' => self.mode = Mode::SingleQuote,
                        b'"' => self.mode = Mode::DoubleQuote,
                        b'`' => self.mode = Mode::Template,
                        b'/' if self.peek() == Some(b'/') => {
                            self.pos += 1;
                            self.mode = Mode::LineComment;
                        }
                        b'/' if self.peek() == Some(b'*') => {
                            self.pos += 1;
                            self.mode = Mode::BlockComment;
                        }
                        b'(' => {
                            self.depth.paren += 1;
                            return Some(CodeByte { index, byte, depth: before });
                        }
                        b'[' => {
                            self.depth.bracket += 1;
                            return Some(CodeByte { index, byte, depth: before });
                        }
                        b'{' => {
                            self.depth.brace += 1;
                            return Some(CodeByte { index, byte, depth: before });
                        }
                        b')' => {
                            self.depth.paren = self.depth.paren.saturating_sub(1);
                            return Some(CodeByte { index, byte, depth: self.depth });
                        }
                        b']' => {
                            self.depth.bracket = self.depth.bracket.saturating_sub(1);
                            return Some(CodeByte { index, byte, depth: self.depth });
                        }
                        b'}' => {
                            if self.interpolations.last() == Some(&self.depth.brace) {
                                self.interpolations.pop();
                                self.depth.interpolation -= 1;
                                self.mode = Mode::Template;
                                continue;
                            }
                            self.depth.brace = self.depth.brace.saturating_sub(1);
                            return Some(CodeByte { index, byte, depth: self.depth });
                        }
                        _ => return Some(CodeByte { index, byte, depth: before }),
                    }
                }
            }
        }
        None
    }
}

/// Find the first comma that is not nested in brackets, strings, templates or
/// interpolations.
///
/// # Examples
///
/// ```
/// use nativize::autofix::tokenizer::find_first_top_level_comma;
///
/// assert_eq!(find_first_top_level_comma("a, b"), Some(1));
/// assert_eq!(find_first_top_level_comma("func(a, b, c)"), None);
/// assert_eq!(find_first_top_level_comma(r#""x, y", z"#), Some(6));
/// ```
pub fn find_first_top_level_comma(text: &str) -> Option<usize> {
    CodeScanner::new(text)
        .find(|b| b.byte == b',' && b.depth.is_top_level())
        .map(|b| b.index)
}

/// Split `text` on every top-level comma, trimming each segment.
///
/// Blank input yields no segments; a trailing comma does not add an empty one.
pub fn split_top_level(text: &str) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut start = 0;
    for code in CodeScanner::new(text) {
        if code.byte == b',' && code.depth.is_top_level() {
            segments.push(text[start..code.index].trim());
            start = code.index + 1;
        }
    }

    let last = text[start..].trim();
    if !last.is_empty() || segments.is_empty() {
        segments.push(last);
    }
    segments
}

/// Find the `)` matching the `(` at `open_index`.
///
/// Returns `None` when there is no `(` at `open_index` or it is never closed.
pub fn find_closing_parenthesis(text: &str, open_index: usize) -> Option<usize> {
    if text.as_bytes().get(open_index) != Some(&b'(') {
        return None;
    }

    CodeScanner::new(&text[open_index..])
        .skip(1)
        .find(|b| b.byte == b')' && b.depth.paren == 0)
        .map(|b| open_index + b.index)
}

/// Method name of a `Type.prototype.method` or `Type.prototype.method[args]`
/// pattern.
pub fn extract_method_name(pattern: &str) -> Option<&str> {
    PROTOTYPE_REGEX
        .captures(pattern)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// Whether `text` is a receiver known to be array-like but not an `Array`.
///
/// Only a fixed list of shapes is recognized (`arguments`, DOM query results,
/// child collections). Anything else is assumed to be a real array.
pub fn is_array_like_object(text: &str) -> bool {
    let text = text.trim();
    text == "arguments"
        || text.contains(".querySelectorAll(")
        || text.contains(".getElementsBy")
        || text.ends_with(".children")
        || text.ends_with(".childNodes")
}
