//! edusim CLI - headless classroom simulations
//!
//! Logs go to stderr (filter with `RUST_LOG`); frames go to stdout as JSON.

use std::process::ExitCode;

use edusim::cli::{run_cli, Args};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if args.verbose {
            EnvFilter::new("edusim=debug")
        } else {
            EnvFilter::new("edusim=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run_cli(args)
}
