//! magic-commit - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use tracing_subscriber::EnvFilter;

use magic_commit::cli::{Cli, run, usage_error};
use magic_commit::config::{LOG_ENV_VAR, RunConfig};
use magic_commit::error::CliError;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => return fail(usage_error(e)),
    };

    let config = RunConfig::from_cli(cli);
    init_logging(config.log_level());

    // Output is only written once the whole pipeline has succeeded
    match run(&config) {
        Ok(message) => {
            println!("{}", message.format());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

/// Report an error on stderr as a single line and map it to an exit code.
fn fail(err: CliError) -> ExitCode {
    eprintln!("{err}");
    ExitCode::from(err.exit_code() as u8)
}

/// Install the stderr log subscriber. stdout carries only the message.
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
