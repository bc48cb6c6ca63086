use std::process::ExitCode;

use clap::Parser;
use textbook_rsa::cli::Cli;

fn main() -> ExitCode {
    match textbook_rsa::app::execute(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error running textbook-rsa: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
