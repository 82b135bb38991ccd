//! climecon CLI - Climate-economic projection engine
//!
//! Command-line interface for projections, scenarios and sensitivity.

use std::process::ExitCode;

use climecon::cli::{run_cli, Args};
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber so stdout carries only results.
///
/// Respects the `CLIMECON_LOG` environment variable for filtering and
/// defaults to `info`.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("CLIMECON_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    run_cli(Args::parse())
}
