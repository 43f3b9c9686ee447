use std::process::ExitCode;

use clap::Parser;
use nativize::{
    cli::{Arguments, ExitStatus},
    logging::init_tracing,
};

fn main() -> ExitCode {
    init_tracing();
    let args = Arguments::parse();

    match nativize::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}
