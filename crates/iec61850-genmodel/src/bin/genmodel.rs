//! Generates `static_model.c` / `static_model.h` from an SCL file.

use clap::Parser;
use genmodel_cli::{normalize_args, run_genmodel, GenModelArgs};
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = GenModelArgs::parse_from(normalize_args(env::args_os()));
    match run_genmodel(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("genmodel: {}", e);
            ExitCode::FAILURE
        }
    }
}
