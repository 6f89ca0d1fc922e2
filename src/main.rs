use clap::Parser;
use std::process::ExitCode;
use tessy::cli;
use tracing::error;

fn main() -> ExitCode {
    let args = cli::Args::parse();
    match cli::dispatch(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Config and logging failures happen before any subscriber exists.
            if tracing::dispatcher::has_been_set() {
                error!("{err:#}");
            } else {
                eprintln!("tessy: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
