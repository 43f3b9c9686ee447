//! Core data types shared by the locator, rules and reporters.

pub mod source;

pub use source::{SourceContext, SourceLocation};
