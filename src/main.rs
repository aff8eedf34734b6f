//! Binary entrypoint for the `taskrank` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    taskrank::config::load_dotenv();
    match taskrank::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
