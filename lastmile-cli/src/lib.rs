//! Command-line interface for planning delivery routes offline.
//!
//! `lastmile optimize` reads a dispatch request, resolves its orders from an
//! exported orders file or the platform's order API, and prints the planned
//! route as JSON on stdout.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod optimize;

pub use error::CliError;

use optimize::OptimizeArgs;

pub(crate) const ARG_REQUEST: &str = "request";
pub(crate) const ARG_ORDERS: &str = "orders";
pub(crate) const ARG_ORDER_API_URL: &str = "order-api-url";
pub(crate) const ARG_API_TOKEN: &str = "api-token";
pub(crate) const ARG_MAX_ITERATIONS: &str = "max-iterations";
pub(crate) const ARG_TIME_BUDGET_MS: &str = "time-budget-ms";
pub(crate) const ENV_REQUEST: &str = "LASTMILE_CMDS_OPTIMIZE_REQUEST_PATH";

/// Run the lastmile CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, when an
/// input cannot be read, or when the route cannot be planned.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Optimize(args) => optimize::run_optimize(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "lastmile",
    about = "Plan delivery routes for the order-management platform",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan one driver's route over a batch of orders.
    Optimize(OptimizeArgs),
}

#[cfg(test)]
mod tests;
