//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};
use schemaforge_codegen::ArtifactTarget;
use schemaforge_core::Operation;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "schemaforge")]
#[command(about = "Validate entity schemas and compile them into SQL, SeaORM, Axum and Dioxus sources")]
#[command(version)]
pub struct Cli {
    /// Settings file (TOML) with [validation] and [generator] sections
    #[arg(long, global = true, env = "SCHEMAFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a schema file and print its diagnostics
    Check {
        /// Schema file (JSON)
        schema: PathBuf,

        /// Print diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate and compile a schema file
    Compile {
        /// Schema file (JSON)
        schema: PathBuf,

        /// Only emit one artifact
        #[arg(long, short, value_enum)]
        target: Option<TargetArg>,

        /// Write files under this directory instead of printing them
        #[arg(long, short)]
        out: Option<PathBuf>,

        /// Print the full result as JSON
        #[arg(long, conflicts_with = "out")]
        json: bool,
    },

    /// Print an example schema file
    Example {
        /// Entity name to use instead of "Book"
        #[arg(long)]
        entity: Option<String>,
    },

    /// Run the prompt → mockup → report flow with the offline interpreter
    Demo {
        /// Natural-language description of the entity
        prompt: String,

        /// Preferred entity name
        #[arg(long)]
        entity: Option<String>,

        /// Operations to enable (defaults to all)
        #[arg(long, value_enum, value_delimiter = ',')]
        operations: Vec<OperationArg>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    Sql,
    Orm,
    Api,
    Frontend,
}

impl From<TargetArg> for ArtifactTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Sql => ArtifactTarget::Sql,
            TargetArg::Orm => ArtifactTarget::Orm,
            TargetArg::Api => ArtifactTarget::Api,
            TargetArg::Frontend => ArtifactTarget::Frontend,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OperationArg {
    Create,
    Read,
    Update,
    Delete,
}

impl From<OperationArg> for Operation {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Create => Operation::Create,
            OperationArg::Read => Operation::Read,
            OperationArg::Update => Operation::Update,
            OperationArg::Delete => Operation::Delete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compile() {
        let cli = Cli::try_parse_from([
            "schemaforge",
            "--config",
            "forge.toml",
            "compile",
            "book.json",
            "--target",
            "api",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("forge.toml")));
        match cli.command {
            Commands::Compile { target, json, .. } => {
                assert_eq!(target, Some(TargetArg::Api));
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_demo_operations() {
        let cli = Cli::try_parse_from([
            "schemaforge",
            "demo",
            "a library",
            "--operations",
            "create,read",
        ])
        .unwrap();

        match cli.command {
            Commands::Demo { operations, .. } => {
                assert_eq!(operations, vec![OperationArg::Create, OperationArg::Read]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_json_conflicts_with_out() {
        let result = Cli::try_parse_from([
            "schemaforge", "compile", "book.json", "--json", "--out", "gen",
        ]);
        assert!(result.is_err());
    }
}
