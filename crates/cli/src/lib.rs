//! # SchemaForge CLI
//!
//! Command-line interface for SchemaForge.
//!
//! ## Commands
//!
//! - `check` - Validate a schema file
//! - `compile` - Validate and compile a schema file into its artifacts
//! - `example` - Print an example schema file
//! - `demo` - Run the interactive flow end to end with the offline interpreter
//!

pub mod args;
pub mod commands;
pub mod settings;

pub use args::{Cli, Commands};
pub use settings::Settings;

use std::process::ExitCode;

use anyhow::Context;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Execute a parsed command line
pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = Settings::load_or_default(cli.config.as_deref()).with_context(|| {
        format!(
            "failed to load settings from {}",
            cli.config
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        )
    })?;

    tracing::debug!(command = ?cli.command, "running command");

    match cli.command {
        Commands::Check { schema, json } => commands::check(&schema, json, &settings),
        Commands::Compile {
            schema,
            target,
            out,
            json,
        } => commands::compile(
            &schema,
            target.map(Into::into),
            out.as_deref(),
            json,
            &settings,
        ),
        Commands::Example { entity } => commands::example(entity.as_deref()),
        Commands::Demo {
            prompt,
            entity,
            operations,
        } => commands::demo(
            &prompt,
            entity.as_deref(),
            operations.into_iter().map(Into::into).collect(),
            &settings,
        ),
    }
}
