//! Nativize - rewrite utility-library calls into native JavaScript
//!
//! Nativize is a CLI tool and library that finds lodash/underscore calls in
//! JavaScript and TypeScript sources and rewrites them into the equivalent
//! native code (`_.keys(o)` becomes `Object.keys(o)`).
//!
//! ## Module Structure
//!
//! - `autofix`: Text-level rewrite engine (pattern classification, strategies,
//!   specialized handlers)
//! - `catalogue`: Function table mapping library functions to native patterns
//! - `cli`: Command-line interface layer (user-facing commands and actions)
//! - `config`: Configuration file loading and parsing
//! - `core`: Source scanning, parsing and call location
//! - `issues`: Issue type definitions and reporting
//! - `logging`: Opt-in diagnostic tracing
//! - `rules`: The prefer-native rule tying located calls to fixes

pub mod autofix;
pub mod catalogue;
pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod logging;
pub mod rules;
