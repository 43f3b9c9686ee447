//! Diagnostic tracing for rewrite decisions.
//!
//! ```bash
//! NATIVIZE_LOG=debug nativize check
//! NATIVIZE_LOG="nativize::autofix=debug" nativize fix
//! ```
//!
//! The subscriber is only installed when `NATIVIZE_LOG` (or `RUST_LOG`) is
//! set. Output goes to stderr so it never mixes with reports on stdout.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "NATIVIZE_LOG";

/// `NATIVIZE_LOG` takes precedence over `RUST_LOG`.
fn build_filter() -> Option<EnvFilter> {
    if let Ok(val) = std::env::var(LOG_ENV) {
        Some(EnvFilter::builder().parse_lossy(val))
    } else if std::env::var("RUST_LOG").is_ok() {
        Some(EnvFilter::from_default_env())
    } else {
        None
    }
}

pub fn init_tracing() {
    let Some(filter) = build_filter() else {
        return;
    };

    let use_ansi = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
    // A second initialisation (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init();
}
