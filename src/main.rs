use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    ExitCode::from(boletim::cli::run_with_args(&args) as u8)
}
