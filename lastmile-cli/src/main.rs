//! Entry point for the `lastmile` command-line interface.
#![forbid(unsafe_code)]

use lastmile_cli::CliError;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

fn main() {
    init_logging();
    match lastmile_cli::run() {
        Ok(()) => {}
        // Help and version requests also arrive here; clap prints and exits.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("lastmile: {err}");
            std::process::exit(1);
        }
    }
}

/// Send `tracing` and `log` records to stderr, filtered by `RUST_LOG`.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("lastmile: logging disabled: {err}");
    }
}
