//! Rule implementations.
//!
//! Rules are pure functions: they take only the inputs they need and return
//! a specific issue type.
//!
//! ## Module Structure
//!
//! - `prefer_native`: library calls with a native alternative

pub mod prefer_native;

pub use prefer_native::{check_prefer_native, fix_call};
