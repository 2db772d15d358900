//! Generates the dynamic model description from an SCL file.

use clap::Parser;
use genmodel_cli::{normalize_args, run_genconfig, GenConfigArgs};
use std::env;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = GenConfigArgs::parse_from(normalize_args(env::args_os()));
    match run_genconfig(&args, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("genconfig: {}", e);
            ExitCode::FAILURE
        }
    }
}
