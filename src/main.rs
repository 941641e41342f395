//! SchemaForge
//!
//! Validates entity schemas and compiles them into SQL, SeaORM, Axum and
//! Dioxus sources.

use std::process::ExitCode;

use clap::Parser;
use schemaforge_cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise -v raises the default level
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    schemaforge_cli::run(cli)
}
