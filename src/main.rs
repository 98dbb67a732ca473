mod cli;

use std::{io, process::ExitCode};

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli::diff::handle_diff_command(&cli) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    if let Err(e) = cli::report::print_report(&mut io::stdout().lock(), &result, &cli.dir_a, &cli.dir_b) {
        eprintln!("Error: failed to print report: {e}");
        return ExitCode::from(2);
    }

    if result.has_differences() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
